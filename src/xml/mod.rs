//! XML support for step metadata documents
//!
//! Step metadata is stored as a tag-per-attribute fragment:
//! - Scalar attributes: one flat element holding the textual value
//! - Array-of-struct attributes: a container element with one repeated
//!   child per entry, each child holding one sub-element per member field
//!
//! Whitespace between elements is not significant. Leaf element text is
//! kept exactly as written, so values containing line breaks survive a
//! save/load cycle.

pub mod compare;
pub mod node;
pub mod writer;

pub use compare::{documents_equivalent, normalize_document};
pub use node::XmlNode;
pub use writer::{XmlValue, add_tag_value, close_tag, open_tag};

/// Error while reading a step metadata document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    /// The text is not a well-formed XML fragment
    #[error("Malformed XML at byte {position}: {message}")]
    Malformed { message: String, position: u64 },
}

impl XmlError {
    pub(crate) fn malformed(message: impl Into<String>, position: u64) -> Self {
        XmlError::Malformed {
            message: message.into(),
            position,
        }
    }

    /// Byte offset into the parsed text where the problem was detected
    pub fn position(&self) -> u64 {
        match self {
            XmlError::Malformed { position, .. } => *position,
        }
    }
}
