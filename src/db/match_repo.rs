use crate::db::models::{Match, RESULT_PENDING, UNKNOWN_PLAYER};
use crate::error::Result;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn get(db: &SqlitePool, match_id: &str) -> Result<Option<Match>> {
    Ok(sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = ?")
        .bind(match_id)
        .fetch_optional(db)
        .await?)
}

pub async fn get_tx(conn: &mut SqliteConnection, match_id: &str) -> Result<Option<Match>> {
    Ok(sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = ?")
        .bind(match_id)
        .fetch_optional(conn)
        .await?)
}

/// New match row. Player ids stay at the sentinel until both challengers
/// accept on the external service.
pub async fn insert(db: &SqlitePool, match_id: &str, guild_id: &str) -> Result<Match> {
    Ok(sqlx::query_as::<_, Match>(
        r#"INSERT INTO matches (id, guild_id, white_player_id, black_player_id,
                                match_date, result, result_code)
           VALUES (?, ?, ?, ?, ?, 'unfinished', ?)
           RETURNING *"#,
    )
    .bind(match_id)
    .bind(guild_id)
    .bind(UNKNOWN_PLAYER)
    .bind(UNKNOWN_PLAYER)
    .bind(Utc::now())
    .bind(RESULT_PENDING)
    .fetch_one(db)
    .await?)
}

pub async fn set_result(conn: &mut SqliteConnection, match_id: &str, result: &str) -> Result<()> {
    sqlx::query("UPDATE matches SET result = ? WHERE id = ?")
        .bind(result)
        .bind(match_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Assign both sides at once. Callers must never set one side alone.
pub async fn set_players(
    conn: &mut SqliteConnection,
    match_id: &str,
    white_id: &str,
    black_id: &str,
) -> Result<()> {
    sqlx::query("UPDATE matches SET white_player_id = ?, black_player_id = ? WHERE id = ?")
        .bind(white_id)
        .bind(black_id)
        .bind(match_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Guarded pending → terminal transition. Returns true when this call won
/// the claim; false means another finalization already landed.
pub async fn claim_finalize(
    conn: &mut SqliteConnection,
    match_id: &str,
    result: &str,
    result_code: &str,
) -> Result<bool> {
    let rows = sqlx::query(
        "UPDATE matches SET result = ?, result_code = ? WHERE id = ? AND result_code = ?",
    )
    .bind(result)
    .bind(result_code)
    .bind(match_id)
    .bind(RESULT_PENDING)
    .execute(conn)
    .await?
    .rows_affected();
    Ok(rows == 1)
}
