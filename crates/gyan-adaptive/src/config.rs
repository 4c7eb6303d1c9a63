//! Tuning knobs for the adaptive engine.
//!
//! Every field has a default matching the production tuning, so a partial JSON
//! document only needs to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{AdaptiveError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdaptiveConfig {
    pub mastery: MasteryConfig,
    pub difficulty: DifficultyConfig,
    pub recommendation: RecommendationConfig,
    pub weakness: WeaknessConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MasteryConfig {
    pub accuracy_weight: f64,
    pub time_weight: f64,
    /// Share of the new performance in the recursive blend (alpha)
    pub learning_rate: f64,
    pub confident_multiplier: f64,
    pub hesitant_multiplier: f64,
    /// Cap on `ideal_time / time_taken`
    pub max_time_ratio: f64,
    pub time_sigmoid_steepness: f64,
    pub time_sigmoid_midpoint: f64,
    /// Practice within this many days earns `recency_bonus`
    pub recent_days: f64,
    /// Practice older than this many days takes `stale_penalty`
    pub steady_days: f64,
    pub recency_bonus: f64,
    pub stale_penalty: f64,
    /// Normalized score above which stability grows
    pub stability_threshold: f64,
    pub stability_gain: f64,
    pub stability_loss: f64,
    pub min_stability: f64,
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            accuracy_weight: 0.4,
            time_weight: 0.2,
            learning_rate: 0.3,
            confident_multiplier: 1.1,
            hesitant_multiplier: 0.9,
            max_time_ratio: 1.5,
            time_sigmoid_steepness: 4.0,
            time_sigmoid_midpoint: 0.5,
            recent_days: 3.0,
            steady_days: 7.0,
            recency_bonus: 1.1,
            stale_penalty: 0.9,
            stability_threshold: 0.8,
            stability_gain: 1.0,
            stability_loss: 0.2,
            min_stability: 0.5,
        }
    }
}

/// Gains of the discrete PID controller driving the difficulty level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DifficultyConfig {
    /// Flow-zone score the controller steers towards
    pub target_score: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub step_threshold: f64,
    pub min_history: usize,
    pub history_window: usize,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            target_score: 0.75,
            kp: 0.5,
            ki: 0.1,
            kd: 0.2,
            step_threshold: 0.25,
            min_history: 3,
            history_window: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecommendationConfig {
    pub max_results: usize,
    /// Review interval in days is `stability * review_interval_factor`
    pub review_interval_factor: f64,
    pub remedial_priority: u32,
    pub review_priority: u32,
    pub new_topic_priority: u32,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_results: 3,
            review_interval_factor: 3.0,
            remedial_priority: 10,
            review_priority: 8,
            new_topic_priority: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeaknessConfig {
    /// Fraction of a remedial quiz that must be correct to close a gap
    pub resolution_threshold: f64,
    pub max_gaps_per_quiz: usize,
}

impl Default for WeaknessConfig {
    fn default() -> Self {
        Self {
            resolution_threshold: 0.8,
            max_gaps_per_quiz: 3,
        }
    }
}

impl AdaptiveConfig {
    /// Reject tunings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let m = &self.mastery;
        let non_negative = [
            ("mastery.accuracyWeight", m.accuracy_weight),
            ("mastery.timeWeight", m.time_weight),
            ("mastery.confidentMultiplier", m.confident_multiplier),
            ("mastery.hesitantMultiplier", m.hesitant_multiplier),
            ("mastery.maxTimeRatio", m.max_time_ratio),
            ("mastery.recencyBonus", m.recency_bonus),
            ("mastery.stalePenalty", m.stale_penalty),
            ("mastery.stabilityGain", m.stability_gain),
            ("mastery.stabilityLoss", m.stability_loss),
            ("recommendation.reviewIntervalFactor", self.recommendation.review_interval_factor),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be a finite non-negative number")));
            }
        }

        if !(m.learning_rate > 0.0 && m.learning_rate <= 1.0) {
            return Err(invalid("mastery.learningRate must be in (0, 1]".to_string()));
        }
        if !m.min_stability.is_finite() || m.min_stability <= 0.0 {
            return Err(invalid("mastery.minStability must be positive".to_string()));
        }
        if m.recent_days > m.steady_days {
            return Err(invalid(
                "mastery.recentDays cannot exceed mastery.steadyDays".to_string(),
            ));
        }

        let d = &self.difficulty;
        for (name, value) in [
            ("difficulty.targetScore", d.target_score),
            ("difficulty.kp", d.kp),
            ("difficulty.ki", d.ki),
            ("difficulty.kd", d.kd),
            ("difficulty.stepThreshold", d.step_threshold),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite")));
            }
        }
        if d.min_history < 2 {
            // The derivative term needs two samples
            return Err(invalid("difficulty.minHistory must be at least 2".to_string()));
        }
        if d.history_window < d.min_history {
            return Err(invalid(
                "difficulty.historyWindow cannot be smaller than difficulty.minHistory".to_string(),
            ));
        }

        if self.recommendation.max_results == 0 {
            return Err(invalid("recommendation.maxResults must be at least 1".to_string()));
        }

        let threshold = self.weakness.resolution_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(invalid("weakness.resolutionThreshold must be in (0, 1]".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> AdaptiveError {
    AdaptiveError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AdaptiveConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AdaptiveConfig = serde_json::from_str(
            r#"{ "mastery": { "learningRate": 0.5 }, "difficulty": { "kp": 0.8 } }"#,
        )
        .unwrap();

        assert_eq!(config.mastery.learning_rate, 0.5);
        assert_eq!(config.mastery.accuracy_weight, 0.4);
        assert_eq!(config.difficulty.kp, 0.8);
        assert_eq!(config.difficulty.target_score, 0.75);
        assert_eq!(config.recommendation.max_results, 3);
        assert_eq!(config.weakness.resolution_threshold, 0.8);
    }

    #[test]
    fn test_validate_rejects_bad_tuning() {
        let mut config = AdaptiveConfig::default();
        config.mastery.learning_rate = 0.0;
        assert!(matches!(config.validate(), Err(AdaptiveError::InvalidConfig(_))));

        let mut config = AdaptiveConfig::default();
        config.mastery.time_weight = -0.1;
        assert!(config.validate().is_err());

        let mut config = AdaptiveConfig::default();
        config.mastery.min_stability = 0.0;
        assert!(config.validate().is_err());

        let mut config = AdaptiveConfig::default();
        config.difficulty.history_window = 2;
        assert!(config.validate().is_err());

        let mut config = AdaptiveConfig::default();
        config.difficulty.kd = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AdaptiveConfig::default();
        config.weakness.resolution_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = AdaptiveConfig::default();
        config.recommendation.max_results = 0;
        assert!(config.validate().is_err());
    }
}
