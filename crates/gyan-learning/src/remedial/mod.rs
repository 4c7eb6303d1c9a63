//! Remedial attempts: closing knowledge gaps once the student shows mastery.

pub mod model;
pub mod service;

pub use model::{GapResolutionOutcome, GapResolutionRequest};
pub use service::resolve_gap;
