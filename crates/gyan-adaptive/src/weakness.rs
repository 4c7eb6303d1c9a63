//! Knowledge-gap bookkeeping.
//!
//! Gaps recur instead of duplicating: a repeat of an open `(topic, sub_topic)`
//! pair bumps its occurrence count. Status only ever moves from open to
//! resolved.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    config::WeaknessConfig,
    types::{DetectedGap, GapStatus, Severity, WeaknessRecord},
};

/// Gap labels that describe the attempt rather than an academic concept.
const NON_ACADEMIC_MARKERS: &[&str] = &["quiz performance", "score", "%"];

/// Outcome of merging a batch of detected gaps into a student's history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapChanges {
    pub created: Vec<WeaknessRecord>,
    pub updated: Vec<WeaknessRecord>,
}

impl GapChanges {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty()
    }
}

/// Identifies the gap a remedial attempt targets.
///
/// The id wins when it matches; the `(topic, sub_topic)` pair is a fallback
/// for clients holding a stale id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GapSelector {
    pub gap_id: Option<String>,
    pub topic: Option<String>,
    pub sub_topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(WeaknessRecord),
    /// The gap was closed earlier; nothing changed
    AlreadyResolved(WeaknessRecord),
    NotFound,
}

/// Merge gaps detected for `topic` into `history`.
///
/// At most `max_gaps_per_quiz` gaps are taken from the batch. New gaps start
/// open with high severity and a single occurrence.
pub fn record_gaps(
    config: &WeaknessConfig,
    history: &mut Vec<WeaknessRecord>,
    topic: &str,
    gaps: &[DetectedGap],
    now: DateTime<Utc>,
) -> GapChanges {
    let mut created_ids: Vec<String> = Vec::new();
    let mut updated_ids: Vec<String> = Vec::new();

    for gap in gaps.iter().take(config.max_gaps_per_quiz) {
        let existing = history
            .iter_mut()
            .find(|w| w.is_open() && w.topic == topic && w.sub_topic == gap.sub_topic);

        match existing {
            Some(record) => {
                record.occurrences = record.occurrences.saturating_add(1);
                record.last_detected = now;
                if !created_ids.contains(&record.id) && !updated_ids.contains(&record.id) {
                    updated_ids.push(record.id.clone());
                }
            }
            None => {
                let record = WeaknessRecord {
                    id: new_gap_id(),
                    topic: topic.to_string(),
                    sub_topic: gap.sub_topic.clone(),
                    gap_type: gap.gap_type,
                    severity: Severity::High,
                    status: GapStatus::Open,
                    occurrences: 1,
                    detected_at: now,
                    last_detected: now,
                    resolved_at: None,
                };
                created_ids.push(record.id.clone());
                history.push(record);
            }
        }
    }

    let snapshot = |ids: &[String]| -> Vec<WeaknessRecord> {
        ids.iter()
            .filter_map(|id| history.iter().find(|w| &w.id == id).cloned())
            .collect()
    };

    GapChanges {
        created: snapshot(&created_ids),
        updated: snapshot(&updated_ids),
    }
}

/// Close the gap picked by `selector`.
///
/// Already-resolved gaps keep their original `resolved_at`.
pub fn resolve_gap(
    history: &mut [WeaknessRecord],
    selector: &GapSelector,
    now: DateTime<Utc>,
) -> Resolution {
    let Some(index) = find_gap(history, selector) else {
        return Resolution::NotFound;
    };

    let record = &mut history[index];
    if !record.is_open() {
        return Resolution::AlreadyResolved(record.clone());
    }

    record.status = GapStatus::Resolved;
    record.resolved_at = Some(now);
    Resolution::Resolved(record.clone())
}

fn find_gap(history: &[WeaknessRecord], selector: &GapSelector) -> Option<usize> {
    if let Some(id) = selector.gap_id.as_deref() {
        if let Some(index) = history.iter().position(|w| w.id == id) {
            return Some(index);
        }
    }

    let (Some(topic), Some(sub_topic)) = (selector.topic.as_deref(), selector.sub_topic.as_deref())
    else {
        return None;
    };
    let matches = |w: &&WeaknessRecord| w.topic == topic && w.sub_topic == sub_topic;

    // Prefer an open record so a stale resolved duplicate does not shadow it
    history
        .iter()
        .position(|w| w.is_open() && matches(&w))
        .or_else(|| history.iter().position(|w| matches(&w)))
}

/// Whether a remedial quiz result is strong enough to close a gap.
///
/// A `total` of zero never qualifies.
pub fn qualifies_for_resolution(config: &WeaknessConfig, score: f64, total: f64) -> bool {
    if !(total > 0.0) || !score.is_finite() {
        return false;
    }
    score / total >= config.resolution_threshold
}

/// Clean up gap labels produced by the answer-analysis step.
///
/// Drops blank labels, labels that describe the attempt itself (scores,
/// percentages) and case-insensitive duplicates, then keeps at most
/// `max_gaps_per_quiz`.
pub fn sanitize_gap_labels(config: &WeaknessConfig, labels: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    if config.max_gaps_per_quiz == 0 {
        return kept;
    }

    for label in labels {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lowered = trimmed.to_lowercase();
        if NON_ACADEMIC_MARKERS.iter().any(|m| lowered.contains(m)) {
            continue;
        }
        if kept.iter().any(|k| k.to_lowercase() == lowered) {
            continue;
        }
        kept.push(trimmed.to_string());
        if kept.len() >= config.max_gaps_per_quiz {
            break;
        }
    }

    kept
}

fn new_gap_id() -> String {
    format!("GAP-{}", Uuid::new_v4().simple())
}
