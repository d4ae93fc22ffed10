//! End-to-end lifecycle tests against an in-memory store and a stubbed
//! external chess service.

use async_trait::async_trait;
use dchess_server::db::models::{RESULT_PENDING, UNKNOWN_PLAYER};
use dchess_server::db::{self, guild_repo, match_repo, player_repo};
use dchess_server::error::{Error, Result};
use dchess_server::gateway::{ChallengeRecord, GameDataGateway, GameRecord};
use dchess_server::lifecycle::{CreateMatch, MatchLifecycle};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

const EPS: f64 = 1e-9;

struct StubGateway {
    /// Returned by `fetch_game_data`; `None` simulates an unknown game.
    game: Option<GameRecord>,
    /// `None` simulates the service refusing to open a challenge.
    challenge: Option<ChallengeRecord>,
}

impl StubGateway {
    fn with_challenge(id: &str) -> Self {
        Self {
            game: None,
            challenge: Some(ChallengeRecord {
                id: id.to_string(),
                url: format!("https://chess.example/{id}"),
            }),
        }
    }

    fn finished(id: &str, status: &str, winner: Option<&str>) -> Self {
        Self {
            game: Some(GameRecord {
                id: id.to_string(),
                status: status.to_string(),
                winner: winner.map(str::to_string),
            }),
            challenge: Some(ChallengeRecord {
                id: id.to_string(),
                url: String::new(),
            }),
        }
    }
}

#[async_trait]
impl GameDataGateway for StubGateway {
    async fn fetch_game_data(&self, _game_id: &str) -> Result<Option<GameRecord>> {
        Ok(self.game.clone())
    }

    async fn fetch_pgn_moves(&self, _game_id: &str) -> Result<Option<Vec<String>>> {
        Ok(None)
    }

    async fn create_open_challenge(
        &self,
        _clock_limit: u32,
        _clock_increment: u32,
    ) -> Result<ChallengeRecord> {
        self.challenge
            .clone()
            .ok_or_else(|| Error::ExternalService("challenge refused".into()))
    }
}

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    db::init_tables(&pool).await.expect("schema");
    pool
}

fn create_req(guild: &str) -> CreateMatch {
    CreateMatch {
        user_id: "u1".into(),
        user_nick: "alice".into(),
        opponent_id: "u2".into(),
        opponent_nick: "bob".into(),
        guild_id: guild.into(),
        clock_limit: None,
        clock_increment: None,
    }
}

async fn match_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM matches")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[actix_rt::test]
async fn create_match_persists_guild_players_and_pending_match() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(pool.clone(), Arc::new(StubGateway::with_challenge("g1")));

    let (challenge, record) = lc.create_match(&create_req("guild9")).await.unwrap();
    assert_eq!(challenge.id, "g1");
    assert_eq!(record.id, "g1");
    assert_eq!(record.guild_id, "guild9");
    assert_eq!(record.result, "unfinished");
    assert_eq!(record.result_code, RESULT_PENDING);
    assert_eq!(record.white_player_id, UNKNOWN_PLAYER);
    assert_eq!(record.black_player_id, UNKNOWN_PLAYER);

    let alice = player_repo::get(&pool, "u1").await.unwrap().unwrap();
    assert_eq!(alice.nickname, "alice");
    assert!((alice.elo - 1500.0).abs() < EPS);
    assert_eq!(alice.matches, 0);

    assert!(guild_repo::get(&pool, "guild9").await.unwrap().is_some());
    let member = guild_repo::get_member(&pool, "guild9", "u2")
        .await
        .unwrap()
        .unwrap();
    assert!((member.elo - 1500.0).abs() < EPS);

    // re-creating with the same participants must not duplicate or reset
    lc.create_match(&create_req("guild9")).await.ok();
    let alice_again = player_repo::get(&pool, "u1").await.unwrap().unwrap();
    assert_eq!(alice_again.nickname, "alice");
}

#[actix_rt::test]
async fn refused_challenge_leaves_no_match_row() {
    let pool = test_pool().await;
    let gateway = StubGateway {
        game: None,
        challenge: None,
    };
    let lc = MatchLifecycle::new(pool.clone(), Arc::new(gateway));

    let err = lc.create_match(&create_req("guild9")).await.unwrap_err();
    assert!(matches!(err, Error::ExternalService(_)));
    assert_eq!(match_count(&pool).await, 0);
    // the player upserts themselves are fine to keep
    assert!(player_repo::get(&pool, "u1").await.unwrap().is_some());
}

#[actix_rt::test]
async fn ingest_with_partial_ids_leaves_both_sides_unchanged() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(pool.clone(), Arc::new(StubGateway::with_challenge("g1")));
    lc.create_match(&create_req("guild9")).await.unwrap();

    let record = lc
        .ingest_result("g1", "started", Some("u1"), None)
        .await
        .unwrap();
    assert_eq!(record.result, "started");
    assert_eq!(record.white_player_id, UNKNOWN_PLAYER);
    assert_eq!(record.black_player_id, UNKNOWN_PLAYER);
}

#[actix_rt::test]
async fn ingest_with_both_ids_assigns_both_sides() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(pool.clone(), Arc::new(StubGateway::with_challenge("g1")));
    lc.create_match(&create_req("guild9")).await.unwrap();

    let record = lc
        .ingest_result("g1", "started", Some("u1"), Some("u2"))
        .await
        .unwrap();
    assert_eq!(record.white_player_id, "u1");
    assert_eq!(record.black_player_id, "u2");
}

#[actix_rt::test]
async fn ingest_unknown_match_is_not_found() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(pool.clone(), Arc::new(StubGateway::with_challenge("g1")));

    let err = lc
        .ingest_result("missing", "started", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[actix_rt::test]
async fn finalize_applies_ratings_and_counters_once() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(
        pool.clone(),
        Arc::new(StubGateway::finished("g1", "mate", Some("white"))),
    );
    lc.create_match(&create_req("guild9")).await.unwrap();
    lc.ingest_result("g1", "started", Some("u1"), Some("u2"))
        .await
        .unwrap();

    let outcome = lc.finalize_match("g1").await.unwrap();
    assert!(outcome.ratings_applied);
    assert_eq!(outcome.record.result_code, "1-0");
    assert_eq!(outcome.record.result, "mate");

    let white = player_repo::get(&pool, "u1").await.unwrap().unwrap();
    let black = player_repo::get(&pool, "u2").await.unwrap().unwrap();
    assert!((white.elo - 1516.0).abs() < EPS);
    assert!((black.elo - 1484.0).abs() < EPS);
    assert_eq!((white.matches, white.wins, white.loses, white.draws), (1, 1, 0, 0));
    assert_eq!((black.matches, black.wins, black.loses, black.draws), (1, 0, 1, 0));
    assert_eq!(white.last_match_id, "g1");

    let wg = guild_repo::get_member(&pool, "guild9", "u1")
        .await
        .unwrap()
        .unwrap();
    let bg = guild_repo::get_member(&pool, "guild9", "u2")
        .await
        .unwrap()
        .unwrap();
    assert!((wg.elo - 1516.0).abs() < EPS);
    assert!((bg.elo - 1484.0).abs() < EPS);

    // second call: terminal state, pure no-op
    let again = lc.finalize_match("g1").await.unwrap();
    assert!(!again.ratings_applied);
    assert_eq!(again.record.result_code, "1-0");
    let white_again = player_repo::get(&pool, "u1").await.unwrap().unwrap();
    assert!((white_again.elo - 1516.0).abs() < EPS);
    assert_eq!(white_again.matches, 1);
}

#[actix_rt::test]
async fn finalize_with_unknown_players_updates_code_only() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(
        pool.clone(),
        Arc::new(StubGateway::finished("g1", "resign", Some("black"))),
    );
    lc.create_match(&create_req("guild9")).await.unwrap();

    let outcome = lc.finalize_match("g1").await.unwrap();
    assert!(!outcome.ratings_applied);
    assert_eq!(outcome.record.result_code, "0-1");

    let alice = player_repo::get(&pool, "u1").await.unwrap().unwrap();
    assert_eq!(alice.matches, 0);
    assert!((alice.elo - 1500.0).abs() < EPS);
    let member = guild_repo::get_member(&pool, "guild9", "u1")
        .await
        .unwrap()
        .unwrap();
    assert!((member.elo - 1500.0).abs() < EPS);
}

#[actix_rt::test]
async fn finalize_draw_counts_draws_and_keeps_equal_ratings() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(
        pool.clone(),
        Arc::new(StubGateway::finished("g1", "draw", None)),
    );
    lc.create_match(&create_req("guild9")).await.unwrap();
    lc.ingest_result("g1", "started", Some("u1"), Some("u2"))
        .await
        .unwrap();

    let outcome = lc.finalize_match("g1").await.unwrap();
    assert!(outcome.ratings_applied);
    assert_eq!(outcome.record.result_code, "1/2-1/2");

    let white = player_repo::get(&pool, "u1").await.unwrap().unwrap();
    assert_eq!((white.matches, white.draws), (1, 1));
    assert!((white.elo - 1500.0).abs() < EPS);
}

#[actix_rt::test]
async fn finalize_unknown_match_is_not_found() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(pool.clone(), Arc::new(StubGateway::with_challenge("g1")));

    let err = lc.finalize_match("missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[actix_rt::test]
async fn finalize_with_unavailable_game_data_is_external_failure() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(pool.clone(), Arc::new(StubGateway::with_challenge("g1")));
    lc.create_match(&create_req("guild9")).await.unwrap();

    let err = lc.finalize_match("g1").await.unwrap_err();
    assert!(matches!(err, Error::ExternalService(_)));
    // the match must still be pending
    let record = match_repo::get(&pool, "g1").await.unwrap().unwrap();
    assert_eq!(record.result_code, RESULT_PENDING);
}

#[actix_rt::test]
async fn stats_queries_cover_guild_scope() {
    let pool = test_pool().await;
    let lc = MatchLifecycle::new(pool.clone(), Arc::new(StubGateway::with_challenge("g1")));
    lc.create_match(&create_req("guild9")).await.unwrap();

    let stats = lc.player_stats("u1", Some("guild9")).await.unwrap();
    assert_eq!(stats.player.id, "u1");
    assert!(stats.guild_player.is_some());

    let global_only = lc.player_stats("u1", None).await.unwrap();
    assert!(global_only.guild_player.is_none());

    let members = lc.guild_stats("guild9").await.unwrap();
    assert_eq!(members.len(), 2);

    let err = lc.player_stats("ghost", None).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err = lc.guild_stats("ghost-guild").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
