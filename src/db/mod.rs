pub mod guild_repo;
pub mod match_repo;
pub mod models;
pub mod player_repo;

use crate::error::Result;
use sqlx::SqlitePool;

/// Create every table if missing. Idempotent, called once at start-up.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS players (
            id              TEXT PRIMARY KEY,
            nickname        TEXT NOT NULL,
            matches         INTEGER NOT NULL DEFAULT 0,
            wins            INTEGER NOT NULL DEFAULT 0,
            loses           INTEGER NOT NULL DEFAULT 0,
            draws           INTEGER NOT NULL DEFAULT 0,
            last_match_id   TEXT NOT NULL DEFAULT '',
            last_match_date TEXT NOT NULL,
            elo             REAL NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE TABLE IF NOT EXISTS guilds (id TEXT PRIMARY KEY)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS guild_players (
            guild_id  TEXT NOT NULL,
            player_id TEXT NOT NULL,
            elo       REAL NOT NULL,
            PRIMARY KEY (guild_id, player_id)
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS matches (
            id              TEXT PRIMARY KEY,
            guild_id        TEXT NOT NULL,
            white_player_id TEXT NOT NULL,
            black_player_id TEXT NOT NULL,
            match_date      TEXT NOT NULL,
            result          TEXT NOT NULL,
            result_code     TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
