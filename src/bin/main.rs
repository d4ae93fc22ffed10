use actix_web::{middleware::Logger, web, App, HttpServer};
use dchess_server::gateway::{GameDataGateway, LichessGateway};
use dchess_server::lifecycle::MatchLifecycle;
use dchess_server::{db, http, metrics};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://dchess.db?mode=rwc".into());
    let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:1338".into());

    // SQLite pool + schema
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create SQLite pool");
    db::init_tables(&db_pool).await.expect("Failed to init tables");

    // External chess-service gateway & lifecycle
    let gateway: Arc<dyn GameDataGateway> = Arc::new(LichessGateway::from_settings());
    let lifecycle = web::Data::new(MatchLifecycle::new(db_pool.clone(), gateway.clone()));
    let gateway_data: web::Data<dyn GameDataGateway> = web::Data::from(gateway);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(lifecycle.clone())
            .app_data(gateway_data.clone())
            .configure(http::routes::init_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
