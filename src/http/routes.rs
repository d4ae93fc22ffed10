use crate::http;
use actix_web::web;

/// Mount every HTTP sub-module under `/dchess/api`.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dchess/api")
            .configure(http::matches::init_routes)
            .configure(http::players::init_routes)
            .configure(http::preview::init_routes)
            .configure(http::health::init_routes),
    );
}
