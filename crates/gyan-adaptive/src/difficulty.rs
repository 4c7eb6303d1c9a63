//! Dynamic difficulty adjustment.
//!
//! A discrete PID controller over the three-level scale. The error signal is
//! the distance of each recent normalized score from the flow-zone target.

use crate::{
    config::DifficultyConfig,
    error::{AdaptiveError, Result},
    types::Level,
};

/// Pick the next difficulty level from a window of recent normalized scores.
///
/// `history` is ordered oldest first. With fewer than `min_history` entries
/// (and never fewer than two, the derivative needs a previous error) the
/// current level is returned unchanged. Thresholds are strict: an
/// adjustment exactly equal to `step_threshold` keeps the level.
///
/// # Errors
///
/// `AdaptiveError::InvalidInput` when a history entry is outside `[0, 1]`.
pub fn adjust_difficulty(
    config: &DifficultyConfig,
    history: &[f64],
    current: Level,
) -> Result<Level> {
    if let Some(bad) = history.iter().find(|h| !(0.0..=1.0).contains(*h)) {
        return Err(AdaptiveError::InvalidInput(format!(
            "history values must be within [0, 1], got {bad}"
        )));
    }

    if history.len() < config.min_history.max(2) {
        return Ok(current);
    }

    let adjustment = control_signal(config, history);

    let next = if adjustment > config.step_threshold {
        current.step_up()
    } else if adjustment < -config.step_threshold {
        current.step_down()
    } else {
        None
    };

    Ok(next.unwrap_or(current))
}

/// `Kp * e(t) + Ki * sum(e) + Kd * (e(t) - e(t-1))`
///
/// Callers must pass at least two entries.
fn control_signal(config: &DifficultyConfig, history: &[f64]) -> f64 {
    let errors: Vec<f64> = history.iter().map(|h| h - config.target_score).collect();

    let latest = errors[errors.len() - 1];
    let previous = errors[errors.len() - 2];
    let integral: f64 = errors.iter().sum();
    let derivative = latest - previous;

    config.kp * latest + config.ki * integral + config.kd * derivative
}
