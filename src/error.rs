//! Error taxonomy shared by the lifecycle, store, gateway and renderer.
//!
//! Every variant maps to the uniform `{"success": false, "reason": ...}`
//! envelope at the HTTP boundary; none of them should ever take the
//! process down.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown match / player / guild id.
    #[error("{0}")]
    NotFound(String),

    /// The external chess service was unreachable or returned garbage.
    #[error("external chess service unavailable: {0}")]
    ExternalService(String),

    /// Negative preview move index, rejected before any gateway call.
    #[error("invalid move number")]
    InvalidMoveIndex,

    /// Board or move data could not be turned into a preview image.
    #[error("could not render preview: {0}")]
    Render(String),

    /// Store transaction failed; the operation was aborted without
    /// partial writes.
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidMoveIndex => StatusCode::BAD_REQUEST,
            Error::ExternalService(_) | Error::Render(_) => StatusCode::BAD_GATEWAY,
            Error::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Error::Persistence(e) = self {
            log::error!("store error: {e}");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "reason": self.to_string(),
        }))
    }
}
