use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use bodega_api::{config, db, events, logging, AppState};

/// Boots the warehouse services: configuration, tracing, database pool,
/// migrations, and the domain event loop.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    logging::init_tracing(&cfg.log_level, cfg.is_production());

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;
    if cfg.auto_migrate {
        db::run_migrations(&pool)
            .await
            .context("failed to apply migrations")?;
    }

    let (event_sender, event_receiver) = events::event_channel(cfg.event_buffer_size);
    let state = AppState::new(Arc::new(pool), cfg, Arc::new(event_sender));

    info!(
        environment = %state.config.environment,
        "warehouse services ready"
    );

    events::process_events(event_receiver).await;
    Ok(())
}
