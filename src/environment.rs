//! Step metadata environment bootstrap
//!
//! Must run once before any load/save verification. It checks every static
//! enumeration table and records the step types this crate provides.
//! Calling [`init`] again returns the environment built by the first call.

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::models::enums::{DescribedEnum, SystemDataType, validate_enum_table};
use crate::models::{OraBulkLoaderMeta, StepMeta, SystemDataMeta};

static ENVIRONMENT: OnceCell<Environment> = OnceCell::new();

/// Error raised while bootstrapping the environment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvironmentError {
    /// An enumeration's description table is not a bijection
    #[error("Invalid enumeration table: {0}")]
    InvalidEnumeration(String),
}

/// Process-wide state shared by every verification run
#[derive(Debug)]
pub struct Environment {
    step_types: Vec<&'static str>,
}

impl Environment {
    /// Ids of the registered step types
    pub fn step_types(&self) -> &[&'static str] {
        &self.step_types
    }

    /// Whether a step type id is registered
    pub fn has_step_type(&self, id: &str) -> bool {
        self.step_types.iter().any(|t| t.eq_ignore_ascii_case(id))
    }
}

/// Initialize the environment, or return the already initialized one
pub fn init() -> Result<&'static Environment, EnvironmentError> {
    ENVIRONMENT.get_or_try_init(|| {
        check_enum::<SystemDataType>()?;

        let step_types = vec![
            SystemDataMeta::step_type_id(),
            OraBulkLoaderMeta::step_type_id(),
        ];
        info!("Step metadata environment ready: {:?}", step_types);
        Ok(Environment { step_types })
    })
}

/// Whether [`init`] has completed successfully
pub fn is_initialized() -> bool {
    ENVIRONMENT.get().is_some()
}

fn check_enum<E: DescribedEnum>() -> Result<(), EnvironmentError> {
    validate_enum_table::<E>().map_err(EnvironmentError::InvalidEnumeration)?;
    debug!("{} table: {} values", E::TYPE_NAME, E::values().len());
    Ok(())
}
