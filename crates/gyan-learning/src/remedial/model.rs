use gyan_adaptive::{GapSelector, WeaknessRecord};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Result of a remedial quiz aimed at one gap.
///
/// The gap is addressed by `gap_id`, or by `topic` plus `sub_topic` when the
/// client has no id.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GapResolutionRequest {
    #[validate(length(min = 1, max = 128))]
    pub student_id: String,
    #[serde(default)]
    pub gap_id: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub sub_topic: Option<String>,
    pub score: f64,
    #[validate(range(min = 1))]
    pub total_questions: u32,
}

impl GapResolutionRequest {
    pub fn selector(&self) -> GapSelector {
        GapSelector {
            gap_id: non_blank(self.gap_id.as_deref()),
            topic: non_blank(self.topic.as_deref()),
            sub_topic: non_blank(self.sub_topic.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapResolutionOutcome {
    pub success: bool,
    pub resolved: bool,
    /// Remedial score as a whole percentage
    pub percentage: u32,
    /// The gap after the attempt, absent when the score fell short
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<WeaknessRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_drops_blank_fields() {
        let request = GapResolutionRequest {
            student_id: "s1".into(),
            gap_id: Some("  ".into()),
            topic: Some(" Algebra ".into()),
            sub_topic: None,
            score: 4.0,
            total_questions: 5,
        };

        let selector = request.selector();
        assert_eq!(selector.gap_id, None);
        assert_eq!(selector.topic.as_deref(), Some("Algebra"));
        assert_eq!(selector.sub_topic, None);
    }
}
