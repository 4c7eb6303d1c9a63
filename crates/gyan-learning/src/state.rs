use gyan_adaptive::AdaptiveEngine;

use crate::{
    config::{Environment, LearningConfig},
    store::{PgProfileStore, ProfileStore},
};

/// Shared state handed to every service call.
#[derive(Clone, Debug)]
pub struct LearningState<S> {
    pub engine: AdaptiveEngine,
    pub store: S,
    pub environment: Environment,
    /// Seconds assumed for submissions that omit `timeTaken`
    pub default_time_taken_secs: f64,
}

impl<S: ProfileStore> LearningState<S> {
    pub fn new(engine: AdaptiveEngine, store: S, environment: Environment) -> Self {
        Self {
            engine,
            store,
            environment,
            default_time_taken_secs: 60.0,
        }
    }

    pub fn with_default_time_taken(mut self, secs: f64) -> Self {
        self.default_time_taken_secs = secs;
        self
    }
}

impl LearningState<PgProfileStore> {
    /// Connect to Postgres and build the engine from `config`.
    ///
    /// Does not create the database or run migrations; see
    /// `gyan_db::connect_and_migrate`.
    pub async fn from_config(config: &LearningConfig) -> anyhow::Result<Self> {
        let engine = AdaptiveEngine::new(config.load_adaptive_config()?)?;
        let pool = gyan_db::create_pool(&config.database_url, config.db_max_connections).await?;

        Ok(Self::new(engine, PgProfileStore::new(pool), config.env)
            .with_default_time_taken(config.default_time_taken_secs))
    }
}
