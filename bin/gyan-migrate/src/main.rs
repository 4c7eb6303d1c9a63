use gyan_adaptive::AdaptiveEngine;
use gyan_learning::{LearningConfig, tracing::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = LearningConfig::from_env()?;

    init_tracing(&config.env);

    // Fail before touching the database when the tuning file is broken
    let engine = AdaptiveEngine::new(config.load_adaptive_config()?)?;
    tracing::info!(
        target_score = engine.config().difficulty.target_score,
        history_window = engine.config().difficulty.history_window,
        "Adaptive configuration loaded"
    );

    // The pool can only connect once the database exists
    if gyan_db::ensure_database(&config.database_url).await? {
        tracing::info!("Created database");
    }
    let pool = gyan_db::create_pool(&config.database_url, config.db_max_connections).await?;
    gyan_db::migrate(&pool).await?;

    tracing::info!("Database is up to date");
    Ok(())
}
