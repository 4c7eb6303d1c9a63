use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gyan_adaptive::{AdaptiveProfile, MasteryRecord, WeaknessRecord};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

/// Row of `adaptive_profiles`.
///
/// The JSONB columns are decoded into the engine's typed records here and
/// nowhere else.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdaptiveProfileRow {
    /// Student identifier (owned by the school schema)
    pub student_id: String,
    /// Mastery per topic
    pub performance_data: Json<BTreeMap<String, MasteryRecord>>,
    /// Detected knowledge gaps, oldest first
    pub weakness_history: Json<Vec<WeaknessRecord>>,
    /// When the profile was first written
    pub created_at: DateTime<Utc>,
    /// When the profile was last written
    pub updated_at: DateTime<Utc>,
}

impl From<AdaptiveProfileRow> for AdaptiveProfile {
    fn from(row: AdaptiveProfileRow) -> Self {
        Self {
            performance_data: row.performance_data.0,
            weakness_history: row.weakness_history.0,
        }
    }
}
