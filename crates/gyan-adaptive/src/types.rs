//! Records exchanged between the engine and its caller.
//!
//! Every record is a plain value: the engine takes the current state by
//! reference and hands back a new value for the caller to persist.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty setting of a topic, ordered from easiest to hardest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Level {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Level {
    /// One step harder, or `None` when already at the top.
    pub const fn step_up(self) -> Option<Self> {
        match self {
            Self::Easy => Some(Self::Medium),
            Self::Medium => Some(Self::Hard),
            Self::Hard => None,
        }
    }

    /// One step easier, or `None` when already at the bottom.
    pub const fn step_down(self) -> Option<Self> {
        match self {
            Self::Easy => None,
            Self::Medium => Some(Self::Easy),
            Self::Hard => Some(Self::Medium),
        }
    }

    /// Wire name, as stored in the JSON profile.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported (or voice-detected) confidence while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Confident,
    #[default]
    Neutral,
    Hesitant,
}

/// Estimated competence of one student in one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRecord {
    /// Current mastery estimate in `[0, 1]`
    #[serde(default)]
    pub score: f64,
    /// Forgetting-curve time constant in days, never below the configured minimum
    #[serde(default = "default_stability")]
    pub stability: f64,
    #[serde(default)]
    pub last_practiced: Option<DateTime<Utc>>,
    #[serde(default)]
    pub level: Level,
    /// Most recent normalized scores, oldest first
    #[serde(default)]
    pub history: VecDeque<f64>,
}

fn default_stability() -> f64 {
    1.0
}

impl Default for MasteryRecord {
    fn default() -> Self {
        Self {
            score: 0.0,
            stability: default_stability(),
            last_practiced: None,
            level: Level::Medium,
            history: VecDeque::new(),
        }
    }
}

impl MasteryRecord {
    /// Append a normalized score, evicting the oldest entries beyond `window`.
    pub fn push_history(&mut self, normalized_score: f64, window: usize) {
        self.history.push_back(normalized_score);
        while self.history.len() > window {
            self.history.pop_front();
        }
    }

    /// Stored stability, or `1.0` when the stored value is non-positive or
    /// non-finite.
    pub fn effective_stability(&self) -> f64 {
        if self.stability.is_finite() && self.stability > 0.0 {
            self.stability
        } else {
            1.0
        }
    }

    /// Fractional days elapsed since the last practice, `0.0` when unknown.
    ///
    /// A `last_practiced` in the future (clock skew between writers) counts as
    /// no time elapsed.
    pub fn days_since_practice(&self, now: DateTime<Utc>) -> f64 {
        self.last_practiced
            .map(|last| days_between(last, now))
            .unwrap_or(0.0)
    }
}

pub(crate) fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let millis = (later - earlier).num_milliseconds() as f64;
    (millis / 86_400_000.0).max(0.0)
}

/// A single graded quiz or exercise attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub score: f64,
    pub max_score: f64,
    /// Seconds spent on the attempt
    pub time_taken: f64,
    /// Expected seconds for the attempt, when the content defines one
    #[serde(default)]
    pub ideal_time: Option<f64>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

/// Kind of misunderstanding behind a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapType {
    Procedural,
    Factual,
    Conceptual,
}

/// How much a gap blocks progress. New gaps start at `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Lifecycle of a gap; it only ever moves from `Open` to `Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapStatus {
    Open,
    Resolved,
}

/// A detected knowledge gap, scoped to a topic and a sub-topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessRecord {
    pub id: String,
    pub topic: String,
    pub sub_topic: String,
    pub gap_type: GapType,
    pub severity: Severity,
    pub status: GapStatus,
    pub occurrences: u32,
    pub detected_at: DateTime<Utc>,
    pub last_detected: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl WeaknessRecord {
    /// Still waiting for a successful remedial attempt.
    pub fn is_open(&self) -> bool {
        self.status == GapStatus::Open
    }

    /// Open gaps that block progress: high severity or a conceptual misunderstanding.
    pub fn is_critical(&self) -> bool {
        self.is_open() && (self.severity == Severity::High || self.gap_type == GapType::Conceptual)
    }
}

/// A gap reported by the answer-analysis step, before it is merged into history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedGap {
    pub sub_topic: String,
    pub gap_type: GapType,
}

/// Category of a recommended next step, serialized as its `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationKind {
    Remedial,
    Review,
    NewTopic,
}

/// Client-side navigation target for a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub route: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

/// One ranked next step; higher `priority` comes first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: u32,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_topic: Option<String>,
    pub reason: String,
    pub action: RecommendedAction,
}

/// Everything the engine knows about one student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveProfile {
    /// Mastery per topic
    #[serde(default)]
    pub performance_data: BTreeMap<String, MasteryRecord>,
    #[serde(default)]
    pub weakness_history: Vec<WeaknessRecord>,
}
