pub mod health;
pub mod matches;
pub mod players;
pub mod preview;
pub mod routes;

use crate::config::settings;
use actix_web::{
    dev::Payload, error::ErrorForbidden, FromRequest, HttpRequest, Result as ActixResult,
};
use futures_util::future::{ready, Ready};

/// Request guard for the host allowlist. An empty allowlist leaves the
/// API open; otherwise the `Host` header (minus port) must match one of
/// the configured entries.
#[derive(Debug, Clone, Copy)]
pub struct AllowedHost;

impl FromRequest for AllowedHost {
    type Error = actix_web::Error;
    type Future = Ready<ActixResult<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        let allowed = &settings().allowed_hosts;
        if allowed.is_empty() {
            return ready(Ok(AllowedHost));
        }
        let info = req.connection_info();
        let host = info.host().split(':').next().unwrap_or("");
        let res = if allowed.iter().any(|h| h == host) {
            Ok(AllowedHost)
        } else {
            Err(ErrorForbidden("host not allowed"))
        };
        ready(res)
    }
}
