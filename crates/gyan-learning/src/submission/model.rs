use gyan_adaptive::{GapType, Level, MasteryRecord, Sentiment, SubmissionResult, WeaknessRecord};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A graded quiz as reported by the client
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    /// Student who took the quiz
    #[validate(length(min = 1, max = 128))]
    pub student_id: String,
    /// Topic the quiz covered
    #[validate(length(min = 1, max = 255))]
    pub topic: String,
    /// Number of correct answers
    pub score: f64,
    /// Number of questions in the quiz
    #[validate(range(min = 1))]
    pub total_questions: u32,
    /// Seconds spent, the configured default when omitted
    #[serde(default)]
    pub time_taken: Option<f64>,
    /// Expected seconds for the quiz
    #[serde(default)]
    pub ideal_time: Option<f64>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    /// Gaps found by the answer analysis
    #[serde(default)]
    pub gaps: Vec<GapReport>,
}

/// One gap from the answer analysis
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    /// Smallest unit of knowledge the student got wrong
    pub atomic_topic: String,
    pub gap_type: GapType,
}

/// Updated adaptive state returned to the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub success: bool,
    pub topic: String,
    pub mastery: MasteryRecord,
    pub difficulty: Level,
    pub previous_difficulty: Level,
    pub new_gaps: Vec<WeaknessRecord>,
    pub updated_gaps: Vec<WeaknessRecord>,
    pub message: String,
}

impl From<SubmissionResult> for SubmissionOutcome {
    fn from(result: SubmissionResult) -> Self {
        let message = if result.new_gaps.is_empty() {
            "Adaptive profile updated".to_string()
        } else {
            "Adaptive profile updated. New gaps detected, check your Remedial Center.".to_string()
        };

        Self {
            success: true,
            topic: result.topic,
            mastery: result.mastery,
            difficulty: result.difficulty,
            previous_difficulty: result.previous_level,
            new_gaps: result.new_gaps,
            updated_gaps: result.updated_gaps,
            message,
        }
    }
}
