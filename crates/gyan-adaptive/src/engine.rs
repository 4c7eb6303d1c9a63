//! The engine façade: a validated configuration plus the pure operations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    config::AdaptiveConfig,
    difficulty,
    error::Result,
    mastery,
    recommend,
    types::{
        AdaptiveProfile, DetectedGap, Interaction, Level, MasteryRecord, Recommendation,
        WeaknessRecord,
    },
    weakness::{self, GapChanges, GapSelector, Resolution},
};

/// Stateless scoring engine bound to one tuning.
///
/// Cheap to clone and safe to share between tasks; every operation works only
/// on its arguments.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveEngine {
    config: AdaptiveConfig,
}

/// Result of folding one quiz submission into a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub topic: String,
    pub mastery: MasteryRecord,
    pub previous_level: Level,
    pub difficulty: Level,
    pub new_gaps: Vec<WeaknessRecord>,
    pub updated_gaps: Vec<WeaknessRecord>,
}

impl SubmissionResult {
    /// Whether this submission moved the topic to another level.
    pub fn difficulty_changed(&self) -> bool {
        self.previous_level != self.difficulty
    }
}

impl AdaptiveEngine {
    /// Build an engine, rejecting unusable tunings up front.
    pub fn new(config: AdaptiveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Tuning this engine was built with.
    pub const fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    /// See [`mastery::estimate_mastery`].
    pub fn estimate_mastery(
        &self,
        current: &MasteryRecord,
        interaction: &Interaction,
        now: DateTime<Utc>,
    ) -> Result<MasteryRecord> {
        mastery::estimate_mastery(&self.config.mastery, current, interaction, now)
    }

    /// See [`difficulty::adjust_difficulty`].
    pub fn adjust_difficulty(&self, history: &[f64], current: Level) -> Result<Level> {
        difficulty::adjust_difficulty(&self.config.difficulty, history, current)
    }

    /// See [`recommend::recommend`].
    pub fn recommend(
        &self,
        mastery: &BTreeMap<String, MasteryRecord>,
        weaknesses: &[WeaknessRecord],
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        recommend::recommend(&self.config.recommendation, mastery, weaknesses, now)
    }

    /// See [`weakness::record_gaps`].
    pub fn record_gaps(
        &self,
        history: &mut Vec<WeaknessRecord>,
        topic: &str,
        gaps: &[DetectedGap],
        now: DateTime<Utc>,
    ) -> GapChanges {
        weakness::record_gaps(&self.config.weakness, history, topic, gaps, now)
    }

    /// See [`weakness::resolve_gap`].
    pub fn resolve_gap(
        &self,
        history: &mut [WeaknessRecord],
        selector: &GapSelector,
        now: DateTime<Utc>,
    ) -> Resolution {
        weakness::resolve_gap(history, selector, now)
    }

    /// Whether `score / total` clears the resolution threshold.
    pub fn qualifies_for_resolution(&self, score: f64, total: f64) -> bool {
        weakness::qualifies_for_resolution(&self.config.weakness, score, total)
    }

    /// See [`weakness::sanitize_gap_labels`].
    pub fn sanitize_gap_labels(&self, labels: &[String]) -> Vec<String> {
        weakness::sanitize_gap_labels(&self.config.weakness, labels)
    }

    /// Fold a quiz submission into `profile`.
    ///
    /// 1. Load the topic record, defaulting on first contact
    /// 2. Estimate the new mastery
    /// 3. Push the normalized score into the sliding history window
    /// 4. Adjust difficulty from the previous level over that window
    /// 5. Merge the detected gaps into the weakness history
    ///
    /// On error the profile is left untouched.
    pub fn apply_submission(
        &self,
        profile: &mut AdaptiveProfile,
        topic: &str,
        interaction: &Interaction,
        gaps: &[DetectedGap],
        now: DateTime<Utc>,
    ) -> Result<SubmissionResult> {
        let current = profile
            .performance_data
            .get(topic)
            .cloned()
            .unwrap_or_default();

        let mut next = self.estimate_mastery(&current, interaction, now)?;
        next.push_history(
            mastery::normalized_score(interaction),
            self.config.difficulty.history_window,
        );

        let history: Vec<f64> = next.history.iter().copied().collect();
        let previous_level = current.level;
        next.level = self.adjust_difficulty(&history, previous_level)?;

        let changes = self.record_gaps(&mut profile.weakness_history, topic, gaps, now);
        profile
            .performance_data
            .insert(topic.to_string(), next.clone());

        Ok(SubmissionResult {
            topic: topic.to_string(),
            difficulty: next.level,
            mastery: next,
            previous_level,
            new_gaps: changes.created,
            updated_gaps: changes.updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AdaptiveError,
        types::{GapType, Sentiment},
    };
    use chrono::Duration;

    fn quiz(score: f64) -> Interaction {
        Interaction {
            score,
            max_score: 10.0,
            time_taken: 60.0,
            ideal_time: Some(45.0),
            sentiment: Some(Sentiment::Neutral),
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = AdaptiveConfig::default();
        config.mastery.learning_rate = 2.0;
        assert!(matches!(
            AdaptiveEngine::new(config),
            Err(AdaptiveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_first_submission_creates_record() {
        let engine = AdaptiveEngine::default();
        let now = Utc::now();
        let mut profile = AdaptiveProfile::default();

        let result = engine
            .apply_submission(&mut profile, "Optics", &quiz(7.0), &[], now)
            .unwrap();

        let stored = &profile.performance_data["Optics"];
        assert_eq!(stored, &result.mastery);
        assert_eq!(stored.history.iter().copied().collect::<Vec<_>>(), vec![0.7]);
        assert_eq!(stored.last_practiced, Some(now));
        assert_eq!(result.previous_level, Level::Medium);
        assert_eq!(result.difficulty, Level::Medium);
        assert!(!result.difficulty_changed());
    }

    #[test]
    fn test_repeated_failures_lower_difficulty() {
        let engine = AdaptiveEngine::default();
        let start = Utc::now();
        let mut profile = AdaptiveProfile::default();

        let mut last = None;
        for i in 0..3 {
            let now = start + Duration::hours(i);
            last = Some(
                engine
                    .apply_submission(&mut profile, "Algebra", &quiz(1.0), &[], now)
                    .unwrap(),
            );
        }

        let result = last.unwrap();
        assert_eq!(result.previous_level, Level::Medium);
        assert_eq!(result.difficulty, Level::Easy);
        assert!(result.difficulty_changed());
        assert_eq!(profile.performance_data["Algebra"].level, Level::Easy);
    }

    #[test]
    fn test_history_window_is_bounded() {
        let engine = AdaptiveEngine::default();
        let now = Utc::now();
        let mut profile = AdaptiveProfile::default();

        for score in [8.0, 7.0, 9.0, 6.0, 8.0, 7.0, 7.0] {
            engine
                .apply_submission(&mut profile, "Waves", &quiz(score), &[], now)
                .unwrap();
        }

        let history: Vec<f64> = profile.performance_data["Waves"]
            .history
            .iter()
            .copied()
            .collect();
        assert_eq!(history, vec![0.9, 0.6, 0.8, 0.7, 0.7]);
    }

    #[test]
    fn test_gaps_are_recorded_with_submission() {
        let engine = AdaptiveEngine::default();
        let now = Utc::now();
        let mut profile = AdaptiveProfile::default();
        let gaps = vec![DetectedGap {
            sub_topic: "Refraction index".to_string(),
            gap_type: GapType::Conceptual,
        }];

        let first = engine
            .apply_submission(&mut profile, "Optics", &quiz(3.0), &gaps, now)
            .unwrap();
        assert_eq!(first.new_gaps.len(), 1);

        let second = engine
            .apply_submission(&mut profile, "Optics", &quiz(4.0), &gaps, now)
            .unwrap();
        assert!(second.new_gaps.is_empty());
        assert_eq!(second.updated_gaps[0].occurrences, 2);
        assert_eq!(profile.weakness_history.len(), 1);
    }

    #[test]
    fn test_invalid_submission_leaves_profile_untouched() {
        let engine = AdaptiveEngine::default();
        let now = Utc::now();
        let mut profile = AdaptiveProfile::default();
        let mut bad = quiz(5.0);
        bad.max_score = 0.0;

        let gaps = vec![DetectedGap {
            sub_topic: "Anything".to_string(),
            gap_type: GapType::Factual,
        }];
        assert!(
            engine
                .apply_submission(&mut profile, "Optics", &bad, &gaps, now)
                .is_err()
        );
        assert_eq!(profile, AdaptiveProfile::default());
    }
}
