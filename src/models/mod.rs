//! Models module for the SDK
//!
//! Defines the step metadata objects and the shared entities they refer to.

pub mod database;
pub mod enums;
pub mod ora_bulk_loader;
pub mod step;
pub mod system_data;

pub use database::{DatabaseMeta, find_database};
pub use enums::{DescribedEnum, SystemDataType, validate_enum_table};
pub use ora_bulk_loader::OraBulkLoaderMeta;
pub use step::{StepMeta, StepMetaError};
pub use system_data::SystemDataMeta;
