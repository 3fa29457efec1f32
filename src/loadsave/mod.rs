//! Load/save round-trip verification
//!
//! A step type declares its attributes once in an [`AttributeRegistry`];
//! a [`ValidatorRegistry`] says how to generate and compare values for
//! them. [`LoadSaveTester`] then proves that clones and save/load cycles
//! keep every attribute, without per-step assertions.

pub mod attribute;
pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod report;
pub mod tester;
pub mod validator;
pub mod value;

pub use attribute::{AttributeDescriptor, AttributeRegistry};
pub use config::{GenerationSection, HarnessConfig};
pub use context::GenerationContext;
pub use error::{HarnessError, HarnessResult};
pub use registry::{DEFAULT_ARRAY_LENGTH, ValidatorRegistry};
pub use report::{AttributeFailure, RoundTripReport, Stage};
pub use tester::LoadSaveTester;
pub use validator::{
    ArrayValidator, BooleanValidator, DatabaseMetaValidator, EnumValidator, FieldValidator,
    IntegerValidator, OneOfValidator, StringValidator,
};
pub use value::{AttributeType, AttributeValue, ValueType};
