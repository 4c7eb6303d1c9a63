use chrono::Utc;
use gyan_adaptive::{DetectedGap, Interaction};
use validator::Validate;

use crate::{
    error::LearningError,
    metrics,
    state::LearningState,
    store::ProfileStore,
    submission::model::{GapReport, QuizSubmission, SubmissionOutcome},
    validation,
};

/// Fold a graded quiz into the student's profile and persist the result.
///
/// Runs inside a single store update, so concurrent submissions for the same
/// student are applied one after the other.
pub async fn submit_quiz<S: ProfileStore>(
    state: &LearningState<S>,
    submission: QuizSubmission,
) -> Result<SubmissionOutcome, LearningError> {
    submission.validate()?;
    validation::validate_student_id(&submission.student_id)?;
    validation::validate_score(submission.score, submission.total_questions)?;
    validation::validate_duration("timeTaken", submission.time_taken)?;

    let topic = submission.topic.trim().to_string();
    if topic.is_empty() {
        return Err(LearningError::Validation("Topic cannot be empty".to_string()));
    }

    let interaction = Interaction {
        score: submission.score,
        max_score: f64::from(submission.total_questions),
        time_taken: submission
            .time_taken
            .unwrap_or(state.default_time_taken_secs),
        // Non-positive ideal times carry no pacing signal; the engine ignores them
        ideal_time: submission.ideal_time,
        sentiment: submission.sentiment,
    };
    let gaps = detected_gaps(state, &submission.gaps);

    tracing::debug!(
        student_id = %submission.student_id,
        topic = %topic,
        score = submission.score,
        total_questions = submission.total_questions,
        gaps = gaps.len(),
        "Processing quiz submission"
    );

    let now = Utc::now();
    let engine = &state.engine;
    let (result, first_attempt) = state
        .store
        .update_profile(&submission.student_id, |profile| {
            let first_attempt = !profile.performance_data.contains_key(&topic);
            let result = engine.apply_submission(profile, &topic, &interaction, &gaps, now)?;
            Ok((result, first_attempt))
        })
        .await?;

    metrics::record_submission(first_attempt);
    metrics::record_gap_event("created", result.new_gaps.len());
    metrics::record_gap_event("recurred", result.updated_gaps.len());

    if result.difficulty_changed() {
        metrics::record_difficulty_change(result.previous_level, result.difficulty);
        tracing::info!(
            student_id = %submission.student_id,
            topic = %topic,
            from = %result.previous_level,
            to = %result.difficulty,
            "Difficulty adjusted"
        );
    }

    for gap in &result.new_gaps {
        tracing::info!(
            student_id = %submission.student_id,
            gap_id = %gap.id,
            sub_topic = %gap.sub_topic,
            "New knowledge gap recorded"
        );
    }

    tracing::info!(
        student_id = %submission.student_id,
        topic = %topic,
        mastery = result.mastery.score,
        stability = result.mastery.stability,
        difficulty = %result.difficulty,
        "Adaptive profile updated"
    );

    Ok(result.into())
}

/// Drop non-academic labels and cap the batch, keeping each gap's type.
fn detected_gaps<S>(state: &LearningState<S>, reports: &[GapReport]) -> Vec<DetectedGap> {
    let labels: Vec<String> = reports.iter().map(|r| r.atomic_topic.clone()).collect();

    state
        .engine
        .sanitize_gap_labels(&labels)
        .into_iter()
        .filter_map(|label| {
            reports
                .iter()
                .find(|r| r.atomic_topic.trim() == label)
                .map(|r| DetectedGap {
                    sub_topic: label,
                    gap_type: r.gap_type,
                })
        })
        .collect()
}
