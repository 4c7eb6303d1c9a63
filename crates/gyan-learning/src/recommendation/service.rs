use chrono::Utc;
use gyan_adaptive::Recommendation;
use serde::Serialize;

use crate::{
    error::LearningError, metrics, state::LearningState, store::ProfileStore, validation,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationList {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
}

/// Rank what the student should do next.
///
/// Students with no stored profile get the new-topic suggestion. Read only.
pub async fn recommendations<S: ProfileStore>(
    state: &LearningState<S>,
    student_id: &str,
) -> Result<RecommendationList, LearningError> {
    validation::validate_student_id(student_id)?;

    let profile = state
        .store
        .load_profile(student_id)
        .await?
        .unwrap_or_default();

    let recommendations = state.engine.recommend(
        &profile.performance_data,
        &profile.weakness_history,
        Utc::now(),
    );

    metrics::record_recommendations(recommendations.len());
    tracing::debug!(
        student_id = %student_id,
        count = recommendations.len(),
        "Served recommendations"
    );

    Ok(RecommendationList {
        success: true,
        recommendations,
    })
}
