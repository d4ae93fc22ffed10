//! Board-position preview endpoint.

use crate::error::Error;
use crate::gateway::GameDataGateway;
use crate::http::AllowedHost;
use crate::render;
use actix_web::{get, web, HttpResponse};

/// The literal `last` path segment: an index safely past any real game.
const LAST_MOVE: usize = 999;

/// GET /dchess/api/get_match_preview/{game_id}/{move}
///
/// The move segment is a non-negative index (an optional `.png` suffix is
/// accepted) or the literal `last` for the final position. Validation
/// happens before any gateway call.
#[get("/get_match_preview/{game_id}/{move}")]
pub async fn get_match_preview(
    _host: AllowedHost,
    path: web::Path<(String, String)>,
    gateway: web::Data<dyn GameDataGateway>,
) -> Result<HttpResponse, Error> {
    let (game_id, move_seg) = path.into_inner();
    let move_seg = move_seg.strip_suffix(".png").unwrap_or(&move_seg);

    let target = if move_seg == "last" {
        LAST_MOVE
    } else {
        let n: i64 = move_seg.parse().map_err(|_| Error::InvalidMoveIndex)?;
        if n < 0 {
            return Err(Error::InvalidMoveIndex);
        }
        n as usize
    };

    let moves = gateway
        .fetch_pgn_moves(&game_id)
        .await?
        .ok_or_else(|| Error::NotFound("invalid match id".into()))?;

    let png = render::render_preview(&moves, target)?;
    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_match_preview);
}
