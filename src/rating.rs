//! Elo math plus the transactional commit applied when a match finishes.
//!
//! Global and guild-scoped ratings are independent spaces: each uses its
//! own pair of pre-update ratings and never reads the other.

use crate::db::models::Match;
use crate::db::{guild_repo, player_repo};
use crate::error::{Error, Result};
use sqlx::SqliteConnection;

/// Expected score of the first player against the second.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_a - rating_b) / 400.0))
}

/// New ratings for both players. Both formulas read the pre-update pair;
/// feeding an already-updated rating into the second one skews the exchange.
pub fn update_ratings(r1: f64, r2: f64, score1: f64, score2: f64, k: f64) -> (f64, f64) {
    let new1 = r1 + k * (score1 - expected_score(r1, r2));
    let new2 = r2 + k * (score2 - expected_score(r2, r1));
    (new1, new2)
}

/// (white, black) score pair for a terminal result code.
pub fn scores_for(result_code: &str) -> Option<(f64, f64)> {
    match result_code {
        "1-0" => Some((1.0, 0.0)),
        "0-1" => Some((0.0, 1.0)),
        "1/2-1/2" => Some((0.5, 0.5)),
        _ => None,
    }
}

/// Commit counters and rating updates for both sides of a finished match.
///
/// Runs inside the caller's transaction: either every row (two players,
/// and both guild rows when a guild is set) lands, or none do. Callers
/// guard that both player ids are known and the result code is terminal.
pub async fn apply_match(conn: &mut SqliteConnection, m: &Match, k: f64) -> Result<()> {
    let (white_score, black_score) = scores_for(&m.result_code)
        .ok_or_else(|| Error::NotFound(format!("no terminal result for match {}", m.id)))?;

    let mut white = player_repo::get_tx(conn, &m.white_player_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("unknown player {}", m.white_player_id)))?;
    let mut black = player_repo::get_tx(conn, &m.black_player_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("unknown player {}", m.black_player_id)))?;

    white.matches += 1;
    black.matches += 1;
    white.last_match_id = m.id.clone();
    black.last_match_id = m.id.clone();
    white.last_match_date = m.match_date;
    black.last_match_date = m.match_date;
    match m.result_code.as_str() {
        "1-0" => {
            white.wins += 1;
            black.loses += 1;
        }
        "0-1" => {
            white.loses += 1;
            black.wins += 1;
        }
        _ => {
            white.draws += 1;
            black.draws += 1;
        }
    }

    let (new_white, new_black) = update_ratings(white.elo, black.elo, white_score, black_score, k);
    white.elo = new_white;
    black.elo = new_black;

    player_repo::store_result(conn, &white).await?;
    player_repo::store_result(conn, &black).await?;

    if !m.guild_id.is_empty() {
        let wg = guild_repo::get_member_tx(conn, &m.guild_id, &m.white_player_id).await?;
        let bg = guild_repo::get_member_tx(conn, &m.guild_id, &m.black_player_id).await?;
        if let (Some(wg), Some(bg)) = (wg, bg) {
            let (new_wg, new_bg) = update_ratings(wg.elo, bg.elo, white_score, black_score, k);
            guild_repo::set_member_elo(conn, &m.guild_id, &m.white_player_id, new_wg).await?;
            guild_repo::set_member_elo(conn, &m.guild_id, &m.black_player_id, new_bg).await?;
        }
    }

    Ok(())
}
