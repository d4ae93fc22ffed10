//! Match lifecycle orchestration: creation, result ingestion and
//! finalization, including the one-shot rating commit.

use crate::config::settings;
use crate::db::models::{GuildPlayer, Match, Player};
use crate::db::{guild_repo, match_repo, player_repo};
use crate::error::{Error, Result};
use crate::gateway::{ChallengeRecord, GameDataGateway, GameRecord};
use crate::rating;
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct MatchLifecycle {
    db: SqlitePool,
    gateway: Arc<dyn GameDataGateway>,
}

#[derive(Debug, Clone)]
pub struct CreateMatch {
    pub user_id: String,
    pub user_nick: String,
    pub opponent_id: String,
    pub opponent_nick: String,
    pub guild_id: String,
    pub clock_limit: Option<u32>,
    pub clock_increment: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct FinalizationOutcome {
    pub record: Match,
    /// False when the match was already terminal or a side is still unknown.
    pub ratings_applied: bool,
}

#[derive(Debug, Serialize)]
pub struct PlayerStats {
    pub player: Player,
    pub guild_player: Option<GuildPlayer>,
}

impl MatchLifecycle {
    pub fn new(db: SqlitePool, gateway: Arc<dyn GameDataGateway>) -> Self {
        Self { db, gateway }
    }

    /// Ensure guild/player rows, open a challenge on the external service
    /// and persist the pending match. No row is written when the challenge
    /// cannot be created.
    pub async fn create_match(&self, req: &CreateMatch) -> Result<(ChallengeRecord, Match)> {
        guild_repo::ensure(&self.db, &req.guild_id).await?;

        player_repo::ensure(&self.db, &req.user_id, &req.user_nick).await?;
        guild_repo::ensure_member(&self.db, &req.guild_id, &req.user_id).await?;

        player_repo::ensure(&self.db, &req.opponent_id, &req.opponent_nick).await?;
        guild_repo::ensure_member(&self.db, &req.guild_id, &req.opponent_id).await?;

        let limit = req.clock_limit.unwrap_or(settings().clock_limit);
        let increment = req.clock_increment.unwrap_or(settings().clock_increment);

        let challenge = self.gateway.create_open_challenge(limit, increment).await?;
        let record = match_repo::insert(&self.db, &challenge.id, &req.guild_id).await?;
        log::info!("match {} created for guild {}", record.id, record.guild_id);
        Ok((challenge, record))
    }

    /// Update the free-text result, and the player ids when BOTH are
    /// supplied. A half-supplied pair is ignored so a match can never end
    /// up with one known and one unknown side.
    pub async fn ingest_result(
        &self,
        match_id: &str,
        result: &str,
        white_id: Option<&str>,
        black_id: Option<&str>,
    ) -> Result<Match> {
        let mut tx = self.db.begin().await?;

        match_repo::get_tx(&mut tx, match_id)
            .await?
            .ok_or_else(|| Error::NotFound("invalid match id".into()))?;

        match_repo::set_result(&mut tx, match_id, result).await?;
        if let (Some(white), Some(black)) = (white_id, black_id) {
            match_repo::set_players(&mut tx, match_id, white, black).await?;
        }

        let updated = match_repo::get_tx(&mut tx, match_id)
            .await?
            .ok_or_else(|| Error::NotFound("invalid match id".into()))?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Drive the pending → terminal transition. Exactly one call applies
    /// the rating update; later (or concurrent) calls are no-ops.
    pub async fn finalize_match(&self, match_id: &str) -> Result<FinalizationOutcome> {
        let existing = match_repo::get(&self.db, match_id)
            .await?
            .ok_or_else(|| Error::NotFound("invalid match id".into()))?;

        if existing.is_finalized() {
            return Ok(FinalizationOutcome {
                record: existing,
                ratings_applied: false,
            });
        }

        let game = self
            .gateway
            .fetch_game_data(match_id)
            .await?
            .ok_or_else(|| Error::ExternalService("game not available yet".into()))?;
        let result_code = derive_result_code(&game)?;

        let mut tx = self.db.begin().await?;
        let claimed = match_repo::claim_finalize(&mut tx, match_id, &game.status, &result_code).await?;
        if !claimed {
            // lost the race; the winning call did all the work
            tx.rollback().await?;
            let record = match_repo::get(&self.db, match_id)
                .await?
                .ok_or_else(|| Error::NotFound("invalid match id".into()))?;
            return Ok(FinalizationOutcome {
                record,
                ratings_applied: false,
            });
        }

        let record = match_repo::get_tx(&mut tx, match_id)
            .await?
            .ok_or_else(|| Error::NotFound("invalid match id".into()))?;

        let mut ratings_applied = false;
        if record.players_known() {
            rating::apply_match(&mut tx, &record, settings().elo_k).await?;
            ratings_applied = true;
        }
        tx.commit().await?;

        log::info!(
            "match {} finalized as {} (ratings applied: {ratings_applied})",
            record.id,
            record.result_code
        );
        Ok(FinalizationOutcome {
            record,
            ratings_applied,
        })
    }

    /// Stored record plus the live view from the external service (absent
    /// while the game has not started).
    pub async fn match_overview(&self, match_id: &str) -> Result<(Match, Option<GameRecord>)> {
        let record = match_repo::get(&self.db, match_id)
            .await?
            .ok_or_else(|| Error::NotFound("invalid match id".into()))?;
        let game = self.gateway.fetch_game_data(match_id).await?;
        Ok((record, game))
    }

    pub async fn player_stats(
        &self,
        player_id: &str,
        guild_id: Option<&str>,
    ) -> Result<PlayerStats> {
        let player = player_repo::get(&self.db, player_id)
            .await?
            .ok_or_else(|| Error::NotFound("invalid player id".into()))?;
        let guild_player = match guild_id {
            Some(guild) => guild_repo::get_member(&self.db, guild, player_id).await?,
            None => None,
        };
        Ok(PlayerStats {
            player,
            guild_player,
        })
    }

    /// Guild rating rows, best first.
    pub async fn guild_stats(&self, guild_id: &str) -> Result<Vec<GuildPlayer>> {
        guild_repo::get(&self.db, guild_id)
            .await?
            .ok_or_else(|| Error::NotFound("invalid guild id".into()))?;
        guild_repo::members(&self.db, guild_id).await
    }
}

/// Canonical result code from the authoritative status/winner pair.
pub fn derive_result_code(game: &GameRecord) -> Result<String> {
    if game.status == "draw" {
        return Ok("1/2-1/2".into());
    }
    match game.winner.as_deref() {
        Some("white") => Ok("1-0".into()),
        Some("black") => Ok("0-1".into()),
        _ => Err(Error::ExternalService(format!(
            "finished game {} has no winner",
            game.id
        ))),
    }
}
