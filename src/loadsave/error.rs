//! Error types for the load/save tester

use crate::models::step::StepMetaError;

use super::report::RoundTripReport;

/// Error raised by the load/save tester
///
/// Attribute mismatches are not errors on their own; they are collected
/// in a [`RoundTripReport`] and surface together as
/// [`HarnessError::ValidationFailed`].
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Attribute table and validators do not fit together
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A generated value does not fit the attribute's accessor type
    #[error("Attribute '{attribute}' expects {expected} but was given {actual}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// The tester ran before the step metadata environment was set up
    #[error("Step metadata environment is not initialized; call environment::init() first")]
    EnvironmentNotInitialized,

    /// The step could not write its metadata
    #[error("Unable to serialize {step}: {source}")]
    Serialize {
        step: String,
        #[source]
        source: StepMetaError,
    },

    /// The step could not read back what it wrote
    #[error("Malformed input while loading {step}: {source}\n--- document ---\n{xml}")]
    MalformedInput {
        step: String,
        #[source]
        source: StepMetaError,
        xml: String,
    },

    /// One or more attributes did not survive clone or round trip
    #[error("{0}")]
    ValidationFailed(Box<RoundTripReport>),
}

/// Result type for tester operations
pub type HarnessResult<T> = Result<T, HarnessError>;

impl HarnessError {
    /// The failure report, when this error is a validation failure
    pub fn report(&self) -> Option<&RoundTripReport> {
        match self {
            HarnessError::ValidationFailed(report) => Some(report),
            _ => None,
        }
    }
}
