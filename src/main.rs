#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wellness_buddy::{
    api::{self, AppState},
    bot::{self, BotData},
    config::{database, defaults, server::ServiceConfig},
    core::lookup::FoodLookup,
    errors::{Error, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Service and dashboard configuration
    let service_config = ServiceConfig::from_env()
        .inspect_err(|e| error!("Invalid service configuration: {e}"))?;
    let dashboard_defaults = defaults::load_default_config()
        .inspect_err(|e| error!("Invalid config.toml: {e}"))?;
    info!(
        "Loaded configuration: port {}, default goal {} kcal, {} seed categories",
        service_config.port,
        dashboard_defaults.daily_kcal_goal,
        dashboard_defaults.categories.len()
    );

    // 4. Database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. HTTP API
    let state = AppState::from_config(&service_config)?;
    let api_config = service_config.clone();
    let api = tokio::spawn(async move { api::serve(&api_config, state).await });

    // 6. Discord bot, when a token is configured
    let token = match env::var("DISCORD_BOT_TOKEN") {
        Ok(token) => Some(token),
        Err(env::VarError::NotPresent) => {
            warn!("DISCORD_BOT_TOKEN not set, running the HTTP API only");
            None
        }
        Err(e) => return Err(Error::EnvVar(e)),
    };

    let Some(token) = token else {
        return api.await.map_err(|e| Error::Config {
            message: format!("API task failed: {e}"),
        })?;
    };

    let data = BotData::new(
        db,
        FoodLookup::from_config(&service_config)?,
        dashboard_defaults,
    );

    tokio::select! {
        result = api => result.map_err(|e| Error::Config {
            message: format!("API task failed: {e}"),
        })?,
        result = bot::run_bot(token, data) => result,
    }
}
