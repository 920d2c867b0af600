use anyhow::{Context, Result};
use axum::Router;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use city_events_server::config::Config;
use city_events_server::routes::create_routes;
use city_events_server::seed;
use city_events_server::state::AppState;
use city_events_server::store::{MemoryStore, PgStore, TicketStore};

const DEFAULT_LOG_FILTER: &str = "city_events_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn TicketStore> = match &config.database_url {
        Some(database_url) => {
            let store = PgStore::connect(database_url, config.max_connections)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Successfully connected to database");

            store.migrate().await.context("Failed to run migrations")?;
            tracing::info!("Migrations run successfully");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, orders are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_demo_data {
        seed::apply(store.as_ref(), seed::demo_fixture()?)
            .await
            .context("Failed to seed demo data")?;
    }

    let app: Router = create_routes(AppState::new(store), &config.static_dir);

    tracing::info!("Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .context("Failed to bind address")?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
