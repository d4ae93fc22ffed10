//! Match lifecycle endpoints.

use crate::error::Error;
use crate::http::AllowedHost;
use crate::lifecycle::{CreateMatch, MatchLifecycle};
use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct CreateMatchRequest {
    pub user_id: String,
    pub user_nick: String,
    pub opponent_id: String,
    pub opponent_nick: String,
    pub guild_id: String,
    pub clock_minutes: Option<u32>,
    pub clock_increment: Option<u32>,
}

#[derive(Deserialize)]
pub struct MatchIdRequest {
    pub match_id: String,
}

#[derive(Deserialize)]
pub struct UpdateMatchRequest {
    pub match_id: String,
    pub match_result: String,
    pub white_id: Option<String>,
    pub black_id: Option<String>,
}

/// POST /dchess/api/create_match
#[post("/create_match")]
pub async fn create_match(
    _host: AllowedHost,
    info: web::Json<CreateMatchRequest>,
    lifecycle: web::Data<MatchLifecycle>,
) -> Result<HttpResponse, Error> {
    let req = CreateMatch {
        user_id: info.user_id.clone(),
        user_nick: info.user_nick.clone(),
        opponent_id: info.opponent_id.clone(),
        opponent_nick: info.opponent_nick.clone(),
        guild_id: info.guild_id.clone(),
        clock_limit: info.clock_minutes.map(|m| m * 60),
        clock_increment: info.clock_increment,
    };
    let (challenge, record) = lifecycle.create_match(&req).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "match": challenge,
        "db_match": record,
    })))
}

/// POST /dchess/api/update_match
#[post("/update_match")]
pub async fn update_match(
    _host: AllowedHost,
    info: web::Json<UpdateMatchRequest>,
    lifecycle: web::Data<MatchLifecycle>,
) -> Result<HttpResponse, Error> {
    let record = lifecycle
        .ingest_result(
            &info.match_id,
            &info.match_result,
            info.white_id.as_deref(),
            info.black_id.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "db_match": record,
    })))
}

/// POST /dchess/api/update_match_end
#[post("/update_match_end")]
pub async fn update_match_end(
    _host: AllowedHost,
    info: web::Json<MatchIdRequest>,
    lifecycle: web::Data<MatchLifecycle>,
) -> Result<HttpResponse, Error> {
    let outcome = lifecycle.finalize_match(&info.match_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": outcome,
    })))
}

/// POST /dchess/api/get_match
#[post("/get_match")]
pub async fn get_match(
    _host: AllowedHost,
    info: web::Json<MatchIdRequest>,
    lifecycle: web::Data<MatchLifecycle>,
) -> Result<HttpResponse, Error> {
    let (record, game) = lifecycle.match_overview(&info.match_id).await?;
    match game {
        Some(game) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "match": game,
            "db_match": record,
        }))),
        None => Ok(HttpResponse::Ok().json(json!({
            "success": false,
            "reason": "match didn't start",
        }))),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_match)
        .service(update_match)
        .service(update_match_end)
        .service(get_match);
}
