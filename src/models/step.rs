//! Step metadata contract
//!
//! Every pipeline step keeps its configuration in a metadata object that
//! can be created empty, copied, written to an XML fragment and read back
//! from one.

use crate::models::database::DatabaseMeta;
use crate::xml::{XmlError, XmlNode};

/// Error while saving or loading step metadata
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepMetaError {
    /// The document could not be parsed
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// An element held text that does not parse as the attribute's type
    #[error("Invalid value '{value}' for <{tag}>: {reason}")]
    InvalidValue {
        tag: String,
        value: String,
        reason: String,
    },

    /// The metadata is in a state that cannot be written
    #[error("Unable to write {step}: {reason}")]
    Inconsistent { step: String, reason: String },
}

/// Metadata object of a pipeline step
pub trait StepMeta: Default + Clone + Send + Sync + 'static {
    /// Plugin id of the step (e.g., "OraBulkLoader")
    fn step_type_id() -> &'static str;

    /// Reset every attribute to the step's defaults
    fn set_default(&mut self);

    /// Write the step's attributes as an XML fragment
    fn get_xml(&self) -> Result<String, StepMetaError>;

    /// Read the step's attributes from a parsed step node.
    ///
    /// `databases` holds the shared connections that named references
    /// resolve against.
    fn load_xml(
        &mut self,
        step_node: &XmlNode,
        databases: &[DatabaseMeta],
    ) -> Result<(), StepMetaError>;

    /// Parse `xml` and load it into a fresh instance
    fn from_xml(xml: &str, databases: &[DatabaseMeta]) -> Result<Self, StepMetaError> {
        let node = XmlNode::parse_fragment(xml)?;
        let mut meta = Self::default();
        meta.load_xml(&node, databases)?;
        Ok(meta)
    }
}

/// Read a `Y`/`N` flag; a missing or empty element yields `default`
pub fn parse_flag(node: &XmlNode, tag: &str, default: bool) -> Result<bool, StepMetaError> {
    match node.get_tag_value(tag).as_deref() {
        None | Some("") => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("y") || v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("n") || v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(StepMetaError::InvalidValue {
            tag: tag.to_string(),
            value: v.to_string(),
            reason: "expected Y or N".to_string(),
        }),
    }
}

/// Read an integer; a missing or empty element yields `default`
pub fn parse_int(node: &XmlNode, tag: &str, default: i32) -> Result<i32, StepMetaError> {
    match node.get_tag_value(tag) {
        None => Ok(default),
        Some(v) if v.trim().is_empty() => Ok(default),
        Some(v) => v.trim().parse().map_err(|e: std::num::ParseIntError| {
            StepMetaError::InvalidValue {
                tag: tag.to_string(),
                value: v.clone(),
                reason: e.to_string(),
            }
        }),
    }
}

/// Read a string; a missing element yields an empty string
pub fn parse_text(node: &XmlNode, tag: &str) -> String {
    node.get_tag_value(tag).unwrap_or_default()
}
