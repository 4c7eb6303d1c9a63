//! Adaptive learning engine for Gyan
//!
//! This crate scores student progress per topic and decides what to practice
//! next. It is pure computation: callers load a student's [`AdaptiveProfile`],
//! hand it to an [`AdaptiveEngine`], and persist whatever comes back.
//!
//! * [`mastery`] - forgetting-curve mastery estimate
//! * [`difficulty`] - PID difficulty controller over Easy/Medium/Hard
//! * [`recommend`] - next-best-action ranking
//! * [`weakness`] - knowledge-gap tracking and resolution

pub mod config;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod mastery;
pub mod recommend;
pub mod types;
pub mod weakness;

pub use config::AdaptiveConfig;
pub use engine::{AdaptiveEngine, SubmissionResult};
pub use error::AdaptiveError;
pub use types::{
    AdaptiveProfile, DetectedGap, GapStatus, GapType, Interaction, Level, MasteryRecord,
    Recommendation, RecommendationKind, RecommendedAction, Sentiment, Severity, WeaknessRecord,
};
pub use weakness::{GapChanges, GapSelector, Resolution};
