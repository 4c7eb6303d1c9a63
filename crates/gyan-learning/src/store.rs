//! Where adaptive profiles live between submissions.

use std::{collections::HashMap, future::Future, sync::Arc, time::Instant};

use gyan_adaptive::AdaptiveProfile;
use gyan_db::repositories::profile;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::{error::LearningError, metrics};

/// Storage seam for per-student adaptive state.
///
/// `update_profile` is the read-modify-write primitive: `apply` runs against
/// the current profile (the default profile for unknown students) and the
/// result is written back only when it returns `Ok`. Implementations serialize
/// concurrent updates of the same student.
pub trait ProfileStore: Send + Sync {
    fn load_profile(
        &self,
        student_id: &str,
    ) -> impl Future<Output = Result<Option<AdaptiveProfile>, LearningError>> + Send;

    fn update_profile<F, T>(
        &self,
        student_id: &str,
        apply: F,
    ) -> impl Future<Output = Result<T, LearningError>> + Send
    where
        F: FnOnce(&mut AdaptiveProfile) -> Result<T, LearningError> + Send,
        T: Send;
}

/// Postgres-backed store over the `adaptive_profiles` table.
#[derive(Clone, Debug)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl ProfileStore for PgProfileStore {
    async fn load_profile(&self, student_id: &str) -> Result<Option<AdaptiveProfile>, LearningError> {
        let started = Instant::now();
        let result = profile::get_adaptive_profile(&self.pool, student_id).await;
        metrics::record_store_operation(
            "load_profile",
            started.elapsed().as_secs_f64(),
            result.is_ok(),
        );

        Ok(result?.map(AdaptiveProfile::from))
    }

    async fn update_profile<F, T>(&self, student_id: &str, apply: F) -> Result<T, LearningError>
    where
        F: FnOnce(&mut AdaptiveProfile) -> Result<T, LearningError> + Send,
        T: Send,
    {
        let started = Instant::now();

        let result = async move {
            // Single transaction, row locked until commit
            let mut tx = self.pool.begin().await?;

            let mut current = profile::get_adaptive_profile_for_update(&mut *tx, student_id)
                .await?
                .map(AdaptiveProfile::from)
                .unwrap_or_default();

            // Dropping `tx` on error rolls back
            let output = apply(&mut current)?;

            profile::upsert_adaptive_profile(&mut *tx, student_id, &current).await?;
            tx.commit().await?;
            Ok::<T, LearningError>(output)
        }
        .await;

        metrics::record_store_operation(
            "update_profile",
            started.elapsed().as_secs_f64(),
            !matches!(result, Err(LearningError::Database(_))),
        );
        result
    }
}

/// In-process store, used by tests and single-node tooling.
#[derive(Clone, Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<RwLock<HashMap<String, AdaptiveProfile>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of students with a stored profile
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

impl ProfileStore for MemoryProfileStore {
    async fn load_profile(&self, student_id: &str) -> Result<Option<AdaptiveProfile>, LearningError> {
        Ok(self.profiles.read().await.get(student_id).cloned())
    }

    async fn update_profile<F, T>(&self, student_id: &str, apply: F) -> Result<T, LearningError>
    where
        F: FnOnce(&mut AdaptiveProfile) -> Result<T, LearningError> + Send,
        T: Send,
    {
        let mut profiles = self.profiles.write().await;

        // Work on a copy so a failed update leaves the stored profile intact
        let mut working = profiles.get(student_id).cloned().unwrap_or_default();
        let output = apply(&mut working)?;
        profiles.insert(student_id.to_string(), working);

        Ok(output)
    }
}
