//! Runtime configuration for the dchess API server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Default open-challenge clock limit (seconds).
    pub clock_limit: u32,
    /// Default open-challenge clock increment (seconds).
    pub clock_increment: u32,
    /// Elo K-factor applied on match finalization.
    pub elo_k: f64,
    /// Timeout for calls to the external chess service (seconds).
    pub gateway_timeout: u64,
    /// Base URL of the external chess service.
    pub chess_api_base: String,
    /// API token for the external chess service.
    pub chess_api_token: String,
    /// Hosts allowed to reach the API. Empty list = no restriction.
    pub allowed_hosts: Vec<String>,
}

impl Settings {
    fn from_env() -> Self {
        let clock_limit = env::var("CLOCK_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(300); // 5+3 blitz default

        let clock_increment = env::var("CLOCK_INCREMENT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let elo_k = env::var("ELO_K")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(32.0);

        let gateway_timeout = env::var("GATEWAY_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        let chess_api_base =
            env::var("CHESS_API_BASE").unwrap_or_else(|_| "https://lichess.org".into());

        let chess_api_token = env::var("CHESS_API_TOKEN").unwrap_or_default();

        let allowed_hosts = env::var("ALLOWED_HOSTS")
            .map(|v| {
                v.split(',')
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Settings {
            clock_limit,
            clock_increment,
            elo_k,
            gateway_timeout,
            chess_api_base,
            chess_api_token,
            allowed_hosts,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
