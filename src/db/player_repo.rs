use crate::db::models::{Player, INITIAL_ELO};
use crate::error::Result;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn get(db: &SqlitePool, player_id: &str) -> Result<Option<Player>> {
    Ok(sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = ?")
        .bind(player_id)
        .fetch_optional(db)
        .await?)
}

/// Same point-lookup, usable inside an open transaction.
pub async fn get_tx(conn: &mut SqliteConnection, player_id: &str) -> Result<Option<Player>> {
    Ok(sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = ?")
        .bind(player_id)
        .fetch_optional(conn)
        .await?)
}

/// Insert the player if absent; an existing row is left untouched.
pub async fn ensure(db: &SqlitePool, player_id: &str, nickname: &str) -> Result<()> {
    sqlx::query(
        r#"INSERT INTO players (id, nickname, matches, wins, loses, draws,
                                last_match_id, last_match_date, elo)
           VALUES (?, ?, 0, 0, 0, 0, '', ?, ?)
           ON CONFLICT (id) DO NOTHING"#,
    )
    .bind(player_id)
    .bind(nickname)
    .bind(Utc::now())
    .bind(INITIAL_ELO)
    .execute(db)
    .await?;
    Ok(())
}

/// Write back the post-match state of one player: counters, last-match
/// bookkeeping and the new global rating.
pub async fn store_result(conn: &mut SqliteConnection, player: &Player) -> Result<()> {
    sqlx::query(
        r#"UPDATE players
              SET matches = ?, wins = ?, loses = ?, draws = ?,
                  last_match_id = ?, last_match_date = ?, elo = ?
            WHERE id = ?"#,
    )
    .bind(player.matches)
    .bind(player.wins)
    .bind(player.loses)
    .bind(player.draws)
    .bind(&player.last_match_id)
    .bind(player.last_match_date)
    .bind(player.elo)
    .bind(&player.id)
    .execute(conn)
    .await?;
    Ok(())
}
