//! Quiz submission: folds a graded quiz into the student's adaptive profile.

pub mod model;
pub mod service;

pub use model::{GapReport, QuizSubmission, SubmissionOutcome};
pub use service::submit_quiz;
