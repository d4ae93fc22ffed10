//! External chess-service access.
//!
//! The service is an opaque, failure-prone collaborator: every call may
//! come back empty or fail, and callers treat that as "unavailable",
//! never as a crash.

pub mod pgn;

use crate::config::settings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Authoritative final/game state as exported by the chess service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub winner: Option<String>,
}

/// Freshly created open challenge.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeRecord {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait GameDataGateway: Send + Sync {
    /// Export one game; `None` when the service does not know the id yet.
    async fn fetch_game_data(&self, game_id: &str) -> Result<Option<GameRecord>>;

    /// SAN move sequence of one game; `None` when the game is unknown.
    async fn fetch_pgn_moves(&self, game_id: &str) -> Result<Option<Vec<String>>>;

    /// Open challenge anyone can accept, with the given clock settings.
    async fn create_open_challenge(
        &self,
        clock_limit: u32,
        clock_increment: u32,
    ) -> Result<ChallengeRecord>;
}

/// Lichess-style HTTP implementation.
pub struct LichessGateway {
    client: reqwest::Client,
    base: String,
    token: String,
}

impl LichessGateway {
    pub fn from_settings() -> Self {
        let s = settings();
        Self::new(&s.chess_api_base, &s.chess_api_token, s.gateway_timeout)
    }

    pub fn new(base: &str, token: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("http client");
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn unavailable(e: reqwest::Error) -> Error {
        Error::ExternalService(e.to_string())
    }
}

#[async_trait]
impl GameDataGateway for LichessGateway {
    async fn fetch_game_data(&self, game_id: &str) -> Result<Option<GameRecord>> {
        let resp = self
            .client
            .get(format!("{}/game/export/{game_id}", self.base))
            .header("Accept", "application/json")
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(Self::unavailable)?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Error::ExternalService(format!(
                "game export returned {}",
                resp.status()
            )));
        }
        let record = resp.json::<GameRecord>().await.map_err(Self::unavailable)?;
        Ok(Some(record))
    }

    async fn fetch_pgn_moves(&self, game_id: &str) -> Result<Option<Vec<String>>> {
        let resp = self
            .client
            .get(format!("{}/game/export/{game_id}", self.base))
            .query(&[("clocks", "false")])
            .header("Accept", "application/x-chess-pgn")
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(Self::unavailable)?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Error::ExternalService(format!(
                "pgn export returned {}",
                resp.status()
            )));
        }
        let text = resp.text().await.map_err(Self::unavailable)?;
        Ok(Some(pgn::san_moves(&text)))
    }

    async fn create_open_challenge(
        &self,
        clock_limit: u32,
        clock_increment: u32,
    ) -> Result<ChallengeRecord> {
        let resp = self
            .client
            .post(format!("{}/api/challenge/open", self.base))
            .bearer_auth(&self.token)
            .form(&[
                ("clock.limit", clock_limit.to_string()),
                ("clock.increment", clock_increment.to_string()),
            ])
            .send()
            .await
            .map_err(Self::unavailable)?;

        if !resp.status().is_success() {
            return Err(Error::ExternalService(format!(
                "challenge creation returned {}",
                resp.status()
            )));
        }

        let body = resp
            .json::<serde_json::Value>()
            .await
            .map_err(Self::unavailable)?;
        // Some API versions nest the challenge object, some return it flat.
        let challenge = body.get("challenge").unwrap_or(&body);
        let id = challenge
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::ExternalService("challenge response missing id".into()))?;
        let url = challenge
            .get("url")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        Ok(ChallengeRecord {
            id: id.to_string(),
            url: url.to_string(),
        })
    }
}
