//! Player & guild statistics endpoints.

use crate::error::Error;
use crate::http::AllowedHost;
use crate::lifecycle::MatchLifecycle;
use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct PlayerStatsRequest {
    pub player_id: String,
    pub guild_id: Option<String>,
}

#[derive(Deserialize)]
pub struct GuildStatsRequest {
    pub guild_id: String,
}

/// POST /dchess/api/get_player
#[post("/get_player")]
pub async fn get_player(
    _host: AllowedHost,
    info: web::Json<PlayerStatsRequest>,
    lifecycle: web::Data<MatchLifecycle>,
) -> Result<HttpResponse, Error> {
    let stats = lifecycle
        .player_stats(&info.player_id, info.guild_id.as_deref())
        .await?;
    let body = match info.guild_id {
        Some(_) => json!({
            "success": true,
            "player": stats.player,
            "guild_player": stats.guild_player,
        }),
        None => json!({
            "success": true,
            "player": stats.player,
        }),
    };
    Ok(HttpResponse::Ok().json(body))
}

/// POST /dchess/api/get_guild
#[post("/get_guild")]
pub async fn get_guild(
    _host: AllowedHost,
    info: web::Json<GuildStatsRequest>,
    lifecycle: web::Data<MatchLifecycle>,
) -> Result<HttpResponse, Error> {
    let members = lifecycle.guild_stats(&info.guild_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "guild": members,
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_player).service(get_guild);
}
