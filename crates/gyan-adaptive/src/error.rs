use thiserror::Error;

/// Errors raised by the adaptive engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdaptiveError {
    /// Caller-supplied values violate a precondition of the engine.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A tuning value is out of range; raised when an engine is built.
    #[error("Invalid adaptive configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = AdaptiveError> = std::result::Result<T, E>;
