//! Whole-document comparison
//!
//! Serialized step metadata is indented and line-broken for readability,
//! and line endings differ between platforms. Two documents are
//! equivalent when they match after line breaks and the indentation next
//! to them are removed.

/// Strip line breaks together with the indentation surrounding them.
///
/// # Example
///
/// ```rust
/// use step_metadata_sdk::xml::normalize_document;
///
/// assert_eq!(
///     normalize_document("  <a>\r\n    <b>x</b>\n  </a>\n"),
///     "<a><b>x</b></a>"
/// );
/// ```
pub fn normalize_document(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(|line| line.trim_matches([' ', '\t']))
        .collect()
}

/// Compare two serialized documents, ignoring line breaks and indentation
pub fn documents_equivalent(expected: &str, actual: &str) -> bool {
    normalize_document(expected) == normalize_document(actual)
}
