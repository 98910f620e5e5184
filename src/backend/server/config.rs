/**
 * Server Configuration
 *
 * Loads `AppConfig` for the binary and opens the optional PostgreSQL pool.
 *
 * # Configuration Sources
 *
 * 1. Built-in defaults
 * 2. TOML file named by `BOARDSYNC_CONFIG`, when set
 * 3. Environment variables (`.env` is loaded first with `dotenv`)
 *
 * # Database
 *
 * When `database_url` is set the pool is created and migrations run. A
 * failed migration is logged and startup continues, since the schema may
 * already be in place.
 */
use sqlx::PgPool;

use crate::shared::config::{AppConfig, ConfigError};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "BOARDSYNC_CONFIG";

/// Load the configuration from defaults, file and environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenv::dotenv().ok();

    let mut config = AppConfig::default();
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let source = std::fs::read_to_string(&path).map_err(|err| ConfigError::Read {
            path: path.clone(),
            message: err.to_string(),
        })?;
        config = config.merge_toml(&source)?;
    }

    let config = config.merge_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Create a PostgreSQL connection pool and run migrations.
pub async fn connect_database(database_url: &str) -> Result<PgPool, sqlx::Error> {
    tracing::info!("[Server] Connecting to database...");
    let pool = PgPool::connect(database_url).await?;
    tracing::info!("[Server] Database connection pool created");

    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("[Server] Database migrations completed"),
        Err(e) => {
            tracing::error!("[Server] Failed to run database migrations: {}", e);
            tracing::warn!("[Server] Continuing without migrations");
        }
    }

    Ok(pool)
}
