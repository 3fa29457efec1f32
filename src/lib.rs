//! Step Metadata SDK - load/save verification for pipeline step metadata
//!
//! Provides:
//! - Step metadata contracts and two concrete steps (system info, Oracle bulk loader)
//! - The tag-per-attribute XML format they are stored in
//! - A round-trip tester that generates random attribute values and checks
//!   them through clone and save/load
//! - One-time environment bootstrap

pub mod environment;
pub mod loadsave;
pub mod models;
pub mod xml;

// Re-export commonly used types
pub use environment::{Environment, EnvironmentError};
pub use loadsave::{
    AttributeRegistry, FieldValidator, HarnessConfig, HarnessError, HarnessResult, LoadSaveTester,
    RoundTripReport, Stage, ValidatorRegistry,
};
pub use models::{
    DatabaseMeta, DescribedEnum, OraBulkLoaderMeta, StepMeta, StepMetaError, SystemDataMeta,
    SystemDataType,
};
pub use xml::{XmlError, XmlNode};
