//! Mastery estimation.
//!
//! Folds one graded interaction into a topic's mastery score. The prior score
//! decays along a forgetting curve whose time constant is the record's
//! stability, then blends with a performance signal built from accuracy, time
//! efficiency and sentiment.

use chrono::{DateTime, Utc};

use crate::{
    config::MasteryConfig,
    error::{AdaptiveError, Result},
    types::{Interaction, MasteryRecord, Sentiment},
};

/// Compute the next mastery record for a topic.
///
/// # Arguments
///
/// * `config` - Weights and thresholds of the estimator
/// * `current` - Stored record for the topic (use `MasteryRecord::default()` on first contact)
/// * `interaction` - The graded attempt
/// * `now` - Time of the attempt, becomes the new `last_practiced`
///
/// # Errors
///
/// `AdaptiveError::InvalidInput` when `max_score <= 0`, `time_taken <= 0`, or
/// any numeric input is not finite.
///
/// # Algorithm
///
/// * `decay = exp(-days_since / stability)`
/// * `time_factor = sigmoid(steepness * (min(ideal / taken, cap) - midpoint))`
/// * `performance = (w_acc * normalized + w_time * time_factor) * sentiment`
/// * `score = clamp((alpha * performance + (1 - alpha) * prior * decay) * consistency, 0, 1)`
///
/// The level and history are carried over untouched.
pub fn estimate_mastery(
    config: &MasteryConfig,
    current: &MasteryRecord,
    interaction: &Interaction,
    now: DateTime<Utc>,
) -> Result<MasteryRecord> {
    validate_interaction(interaction)?;

    let normalized = normalized_score(interaction);

    let stability = current.effective_stability().max(config.min_stability);
    let days_since = current.days_since_practice(now);
    let decay = (-days_since / stability).exp();

    let time_factor = time_factor(config, interaction);
    let performance = (config.accuracy_weight * normalized + config.time_weight * time_factor)
        * sentiment_multiplier(config, interaction.sentiment.unwrap_or_default());

    let consistency = consistency_multiplier(config, days_since);

    let prior = if current.score.is_finite() {
        current.score.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let alpha = config.learning_rate;
    let blended = alpha * performance + (1.0 - alpha) * prior * decay;
    let score = (blended * consistency).clamp(0.0, 1.0);

    Ok(MasteryRecord {
        score,
        stability: next_stability(config, stability, normalized),
        last_practiced: Some(now),
        level: current.level,
        history: current.history.clone(),
    })
}

/// `score / max_score` clamped to `[0, 1]`.
///
/// Assumes the interaction already passed validation.
pub fn normalized_score(interaction: &Interaction) -> f64 {
    (interaction.score / interaction.max_score).clamp(0.0, 1.0)
}

pub(crate) fn validate_interaction(interaction: &Interaction) -> Result<()> {
    if !interaction.score.is_finite() {
        return Err(AdaptiveError::InvalidInput(
            "score must be a finite number".to_string(),
        ));
    }
    if !interaction.max_score.is_finite() || interaction.max_score <= 0.0 {
        return Err(AdaptiveError::InvalidInput(format!(
            "maxScore must be greater than zero, got {}",
            interaction.max_score
        )));
    }
    if !interaction.time_taken.is_finite() || interaction.time_taken <= 0.0 {
        return Err(AdaptiveError::InvalidInput(format!(
            "timeTaken must be greater than zero, got {}",
            interaction.time_taken
        )));
    }
    if let Some(ideal) = interaction.ideal_time {
        if !ideal.is_finite() {
            return Err(AdaptiveError::InvalidInput(
                "idealTime must be a finite number".to_string(),
            ));
        }
    }
    Ok(())
}

fn time_factor(config: &MasteryConfig, interaction: &Interaction) -> f64 {
    let ratio = match interaction.ideal_time {
        // A zero or negative ideal time carries no signal
        Some(ideal) if ideal > 0.0 => (ideal / interaction.time_taken).min(config.max_time_ratio),
        _ => 1.0,
    };
    1.0 / (1.0 + (-config.time_sigmoid_steepness * (ratio - config.time_sigmoid_midpoint)).exp())
}

const fn sentiment_multiplier(config: &MasteryConfig, sentiment: Sentiment) -> f64 {
    match sentiment {
        Sentiment::Confident => config.confident_multiplier,
        Sentiment::Neutral => 1.0,
        Sentiment::Hesitant => config.hesitant_multiplier,
    }
}

fn consistency_multiplier(config: &MasteryConfig, days_since: f64) -> f64 {
    if days_since < config.recent_days {
        config.recency_bonus
    } else if days_since < config.steady_days {
        1.0
    } else {
        config.stale_penalty
    }
}

fn next_stability(config: &MasteryConfig, stability: f64, normalized: f64) -> f64 {
    if normalized > config.stability_threshold {
        stability + config.stability_gain
    } else {
        (stability - config.stability_loss).max(config.min_stability)
    }
}
