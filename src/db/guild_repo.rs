use crate::db::models::{Guild, GuildPlayer, INITIAL_ELO};
use crate::error::Result;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn get(db: &SqlitePool, guild_id: &str) -> Result<Option<Guild>> {
    Ok(sqlx::query_as::<_, Guild>("SELECT * FROM guilds WHERE id = ?")
        .bind(guild_id)
        .fetch_optional(db)
        .await?)
}

/// Lazily create the guild on first reference.
pub async fn ensure(db: &SqlitePool, guild_id: &str) -> Result<()> {
    sqlx::query("INSERT INTO guilds (id) VALUES (?) ON CONFLICT (id) DO NOTHING")
        .bind(guild_id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn get_member(
    db: &SqlitePool,
    guild_id: &str,
    player_id: &str,
) -> Result<Option<GuildPlayer>> {
    Ok(sqlx::query_as::<_, GuildPlayer>(
        "SELECT * FROM guild_players WHERE guild_id = ? AND player_id = ?",
    )
    .bind(guild_id)
    .bind(player_id)
    .fetch_optional(db)
    .await?)
}

pub async fn get_member_tx(
    conn: &mut SqliteConnection,
    guild_id: &str,
    player_id: &str,
) -> Result<Option<GuildPlayer>> {
    Ok(sqlx::query_as::<_, GuildPlayer>(
        "SELECT * FROM guild_players WHERE guild_id = ? AND player_id = ?",
    )
    .bind(guild_id)
    .bind(player_id)
    .fetch_optional(conn)
    .await?)
}

/// Lazily create the guild-scoped rating row for a player.
pub async fn ensure_member(db: &SqlitePool, guild_id: &str, player_id: &str) -> Result<()> {
    sqlx::query(
        r#"INSERT INTO guild_players (guild_id, player_id, elo)
           VALUES (?, ?, ?)
           ON CONFLICT (guild_id, player_id) DO NOTHING"#,
    )
    .bind(guild_id)
    .bind(player_id)
    .bind(INITIAL_ELO)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn set_member_elo(
    conn: &mut SqliteConnection,
    guild_id: &str,
    player_id: &str,
    elo: f64,
) -> Result<()> {
    sqlx::query("UPDATE guild_players SET elo = ? WHERE guild_id = ? AND player_id = ?")
        .bind(elo)
        .bind(guild_id)
        .bind(player_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Every rating row of a guild, best first.
pub async fn members(db: &SqlitePool, guild_id: &str) -> Result<Vec<GuildPlayer>> {
    Ok(sqlx::query_as::<_, GuildPlayer>(
        "SELECT * FROM guild_players WHERE guild_id = ? ORDER BY elo DESC, player_id",
    )
    .bind(guild_id)
    .fetch_all(db)
    .await?)
}
