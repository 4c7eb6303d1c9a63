//! Next-best-action ranking.
//!
//! Triage order: critical open gaps first, then topics whose spaced-repetition
//! interval has elapsed, then a standing offer to move on to new material.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    config::RecommendationConfig,
    types::{
        MasteryRecord, Recommendation, RecommendationKind, RecommendedAction, WeaknessRecord,
        days_between,
    },
};

/// Label of the exploration entry that closes every list.
pub const NEW_TOPIC_LABEL: &str = "New Challenge";

/// Rank the next actions for a student.
///
/// Always returns between 1 and `max_results` entries. Entries with equal
/// priority keep their insertion order: gaps in history order, reviews by
/// topic name.
pub fn recommend(
    config: &RecommendationConfig,
    mastery: &BTreeMap<String, MasteryRecord>,
    weaknesses: &[WeaknessRecord],
    now: DateTime<Utc>,
) -> Vec<Recommendation> {
    let mut candidates: Vec<Recommendation> = weaknesses
        .iter()
        .filter(|gap| gap.is_critical())
        .map(|gap| remedial(config, gap))
        .collect();

    candidates.extend(
        mastery
            .iter()
            .filter_map(|(topic, record)| review_if_due(config, topic, record, now)),
    );

    candidates.push(new_topic(config));

    // `sort_by` is stable
    candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
    candidates.truncate(config.max_results.max(1));
    candidates
}

/// Whether a topic's review interval (`stability * factor` days) has elapsed.
///
/// Topics that were never practiced are not due.
pub fn is_due_for_review(
    config: &RecommendationConfig,
    record: &MasteryRecord,
    now: DateTime<Utc>,
) -> bool {
    review_overdue_days(config, record, now).is_some()
}

fn review_overdue_days(
    config: &RecommendationConfig,
    record: &MasteryRecord,
    now: DateTime<Utc>,
) -> Option<f64> {
    let last = record.last_practiced?;
    let days_since = days_between(last, now);
    let interval = record.effective_stability() * config.review_interval_factor;
    (days_since > interval).then_some(days_since)
}

fn remedial(config: &RecommendationConfig, gap: &WeaknessRecord) -> Recommendation {
    Recommendation {
        kind: RecommendationKind::Remedial,
        priority: config.remedial_priority,
        topic: gap.topic.clone(),
        sub_topic: Some(gap.sub_topic.clone()),
        reason: format!("High severity gap in {}.", gap.sub_topic),
        action: RecommendedAction {
            route: "/remedial".to_string(),
            params: BTreeMap::from([("gapId".to_string(), gap.id.clone())]),
        },
    }
}

fn review_if_due(
    config: &RecommendationConfig,
    topic: &str,
    record: &MasteryRecord,
    now: DateTime<Utc>,
) -> Option<Recommendation> {
    let days_since = review_overdue_days(config, record, now)?;
    Some(Recommendation {
        kind: RecommendationKind::Review,
        priority: config.review_priority,
        topic: topic.to_string(),
        sub_topic: None,
        reason: format!(
            "It's been {} days since you practiced {topic}.",
            days_since.floor() as i64
        ),
        action: RecommendedAction {
            route: "/quiz/generate".to_string(),
            params: BTreeMap::from([("topic".to_string(), topic.to_string())]),
        },
    })
}

fn new_topic(config: &RecommendationConfig) -> Recommendation {
    Recommendation {
        kind: RecommendationKind::NewTopic,
        priority: config.new_topic_priority,
        topic: NEW_TOPIC_LABEL.to_string(),
        sub_topic: None,
        reason: "Ready to expand your knowledge?".to_string(),
        action: RecommendedAction {
            route: "/study-plan".to_string(),
            params: BTreeMap::new(),
        },
    }
}
