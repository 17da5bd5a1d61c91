//! Engine error type.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised at the engine boundary.
///
/// Date computations themselves are total; everything here is either a
/// caller contract violation caught before computing, or a configuration
/// problem.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The job batch failed structural validation.
    #[error("invalid job spec: {}", join_messages(.0))]
    InvalidJobSpec(Vec<ValidationError>),

    /// An SLA value that is not a whole number of working days.
    #[error("invalid SLA value {0}: working days must be a whole number")]
    InvalidSla(f64),

    /// A serialized schedule whose jobs break the resolver's invariants.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// The weekend pattern leaves no working day in the week.
    #[error("work calendar has no working days")]
    NoWorkingDays,

    /// Engine configuration could not be parsed.
    #[error("failed to parse engine config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Engine configuration file could not be read.
    #[error("failed to read engine config: {0}")]
    ConfigIo(#[from] std::io::Error),
}

impl EngineError {
    /// Validation errors carried by an `InvalidJobSpec`, empty otherwise.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::InvalidJobSpec(errors) => errors,
            _ => &[],
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
