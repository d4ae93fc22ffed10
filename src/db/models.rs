use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Placeholder for a match side whose player has not accepted yet.
pub const UNKNOWN_PLAYER: &str = "unknown";

/// Rating every new player (global or guild-scoped) starts from.
pub const INITIAL_ELO: f64 = 1500.0;

/// `result_code` value of a match that has not finished.
pub const RESULT_PENDING: &str = "?";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Player {
    pub id: String,
    pub nickname: String,
    pub matches: i64,
    pub wins: i64,
    pub loses: i64,
    pub draws: i64,
    pub last_match_id: String,
    pub last_match_date: DateTime<Utc>,
    pub elo: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Match {
    pub id: String,
    pub guild_id: String,
    pub white_player_id: String,
    pub black_player_id: String,
    pub match_date: DateTime<Utc>,
    pub result: String,
    pub result_code: String,
}

impl Match {
    /// Both sides accepted, so rating updates may apply.
    pub fn players_known(&self) -> bool {
        self.white_player_id != UNKNOWN_PLAYER && self.black_player_id != UNKNOWN_PLAYER
    }

    pub fn is_finalized(&self) -> bool {
        self.result_code != RESULT_PENDING
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Guild {
    pub id: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GuildPlayer {
    pub guild_id: String,
    pub player_id: String,
    pub elo: f64,
}
