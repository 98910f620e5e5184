/**
 * Server Initialization
 *
 * Builds the Axum application from a loaded configuration:
 *
 * 1. Pick the store: PostgreSQL when `database_url` is set, otherwise memory
 * 2. Create the broadcast channel and the board service
 * 3. Create the router with all routes and layers
 */
use axum::Router;
use std::sync::Arc;

use crate::backend::routes::create_router;
use crate::backend::server::config::connect_database;
use crate::backend::server::state::AppState;
use crate::backend::store::{BoardStore, MemoryBoardStore, PgBoardStore};
use crate::shared::config::AppConfig;

/// Create the application, connecting to PostgreSQL when configured.
pub async fn create_app(config: AppConfig) -> Result<Router<()>, sqlx::Error> {
    let store: Arc<dyn BoardStore> = match &config.database_url {
        Some(url) => {
            let pool = connect_database(url).await?;
            tracing::info!("[Server] Using PostgreSQL board store");
            Arc::new(PgBoardStore::new(pool))
        }
        None => {
            tracing::warn!("[Server] DATABASE_URL not set, boards are kept in memory");
            Arc::new(MemoryBoardStore::new())
        }
    };
    Ok(create_app_with_store(config, store))
}

/// Create the application on top of an existing store.
pub fn create_app_with_store(config: AppConfig, store: Arc<dyn BoardStore>) -> Router<()> {
    let app_state = AppState::new(config, store);
    tracing::info!(
        "[Server] Router configured (broadcast capacity {})",
        app_state.config.broadcast_capacity
    );
    create_router(app_state)
}
