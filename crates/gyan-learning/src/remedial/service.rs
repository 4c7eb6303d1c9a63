use chrono::Utc;
use gyan_adaptive::Resolution;
use validator::Validate;

use crate::{
    error::LearningError,
    metrics,
    remedial::model::{GapResolutionOutcome, GapResolutionRequest},
    state::LearningState,
    store::ProfileStore,
    validation,
};

/// Close a knowledge gap when the remedial score clears the resolution
/// threshold.
///
/// A score below the threshold leaves the profile untouched. Unknown gaps are
/// `NotFound`, including every gap of a student without a stored profile. A
/// gap that was already closed reports `resolved` and keeps its original
/// `resolved_at`.
pub async fn resolve_gap<S: ProfileStore>(
    state: &LearningState<S>,
    request: GapResolutionRequest,
) -> Result<GapResolutionOutcome, LearningError> {
    request.validate()?;
    validation::validate_student_id(&request.student_id)?;
    validation::validate_score(request.score, request.total_questions)?;

    let selector = request.selector();
    let has_pair = selector.topic.is_some() && selector.sub_topic.is_some();
    if selector.gap_id.is_none() && !has_pair {
        return Err(LearningError::Validation(
            "Either gapId or both topic and subTopic are required".to_string(),
        ));
    }

    let total = f64::from(request.total_questions);
    let percentage = (request.score / total * 100.0).round() as u32;

    if !state.engine.qualifies_for_resolution(request.score, total) {
        tracing::debug!(
            student_id = %request.student_id,
            percentage,
            "Remedial score below resolution threshold"
        );
        return Ok(GapResolutionOutcome {
            success: true,
            resolved: false,
            percentage,
            gap: None,
        });
    }

    let now = Utc::now();
    let engine = &state.engine;
    let resolution = state
        .store
        .update_profile(&request.student_id, |profile| {
            match engine.resolve_gap(&mut profile.weakness_history, &selector, now) {
                // Aborting the update keeps the stored profile as is
                Resolution::NotFound => Err(LearningError::NotFound("Gap not found".to_string())),
                resolution => Ok(resolution),
            }
        })
        .await?;

    let gap = match resolution {
        Resolution::Resolved(gap) => {
            metrics::record_gap_event("resolved", 1);
            tracing::info!(
                student_id = %request.student_id,
                gap_id = %gap.id,
                topic = %gap.topic,
                sub_topic = %gap.sub_topic,
                percentage,
                "Knowledge gap resolved"
            );
            gap
        }
        Resolution::AlreadyResolved(gap) => {
            tracing::debug!(gap_id = %gap.id, "Gap was already resolved");
            gap
        }
        Resolution::NotFound => {
            return Err(LearningError::NotFound("Gap not found".to_string()));
        }
    };

    Ok(GapResolutionOutcome {
        success: true,
        resolved: true,
        percentage,
        gap: Some(gap),
    })
}
