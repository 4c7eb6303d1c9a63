//! Counters and histograms for the adaptive pipeline.
//!
//! Emitted through the `metrics` facade; the hosting process decides which
//! recorder (if any) collects them.

use gyan_adaptive::Level;
use metrics::{counter, histogram};

/// Record a processed quiz submission
pub fn record_submission(topic_is_new: bool) {
    counter!(
        "adaptive_submissions_total",
        "first_attempt" => topic_is_new.to_string()
    )
    .increment(1);
}

/// Record a difficulty transition, ignoring submissions that kept the level
pub fn record_difficulty_change(from: Level, to: Level) {
    let Some(direction) = difficulty_direction(from, to) else {
        return;
    };

    counter!(
        "adaptive_difficulty_changes_total",
        "direction" => direction,
        "to" => to.as_str()
    )
    .increment(1);
}

/// Record knowledge-gap lifecycle events (`created`, `recurred`, `resolved`)
pub fn record_gap_event(event: &'static str, count: usize) {
    if count == 0 {
        return;
    }

    counter!("adaptive_gap_events_total", "event" => event).increment(count as u64);
}

/// Record a served recommendation list
pub fn record_recommendations(count: usize) {
    counter!("adaptive_recommendation_requests_total").increment(1);
    histogram!("adaptive_recommendations_per_request").record(count as f64);
}

/// Record profile store operation metrics
pub fn record_store_operation(operation: &'static str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        "profile_store_operations_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);

    histogram!(
        "profile_store_duration_seconds",
        "operation" => operation
    )
    .record(duration_secs);
}

fn difficulty_direction(from: Level, to: Level) -> Option<&'static str> {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => Some("up"),
        std::cmp::Ordering::Greater => Some("down"),
        std::cmp::Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_direction() {
        assert_eq!(difficulty_direction(Level::Easy, Level::Medium), Some("up"));
        assert_eq!(difficulty_direction(Level::Hard, Level::Medium), Some("down"));
        assert_eq!(difficulty_direction(Level::Medium, Level::Medium), None);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_submission(true);
        record_difficulty_change(Level::Medium, Level::Hard);
        record_gap_event("created", 2);
        record_recommendations(3);
        record_store_operation("load_profile", 0.01, true);
    }
}
