//! Next-step recommendations for a student.

pub mod service;

pub use service::{RecommendationList, recommendations};
