pub mod config;
pub mod error;
pub mod metrics;
pub mod recommendation;
pub mod remedial;
pub mod state;
pub mod store;
pub mod submission;
pub mod tracing;
pub mod validation;

pub use config::{Environment, LearningConfig};
pub use error::LearningError;
pub use state::LearningState;
pub use store::{MemoryProfileStore, PgProfileStore, ProfileStore};
