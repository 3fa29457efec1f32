//! Tag writers
//!
//! Produces the indented, one-element-per-line layout used by step
//! metadata. Empty values are written as self-closing elements.

use quick_xml::escape::escape;

/// Value that can be rendered as element text
pub trait XmlValue {
    /// Canonical textual form of the value
    fn to_xml_text(&self) -> String;
}

impl XmlValue for str {
    fn to_xml_text(&self) -> String {
        self.to_string()
    }
}

impl XmlValue for String {
    fn to_xml_text(&self) -> String {
        self.clone()
    }
}

impl XmlValue for bool {
    fn to_xml_text(&self) -> String {
        let flag = if *self { "Y" } else { "N" };
        flag.to_string()
    }
}

impl XmlValue for i32 {
    fn to_xml_text(&self) -> String {
        self.to_string()
    }
}

impl XmlValue for i64 {
    fn to_xml_text(&self) -> String {
        self.to_string()
    }
}

impl<T: XmlValue + ?Sized> XmlValue for &T {
    fn to_xml_text(&self) -> String {
        (**self).to_xml_text()
    }
}

/// Escape element text.
///
/// Carriage returns are written as character references, otherwise a
/// `\r\n` inside a value could not be told apart from platform line
/// endings after a reload.
pub fn escape_text(text: &str) -> String {
    escape(text).replace('\r', "&#13;")
}

/// Render `<tag>value</tag>` followed by a line break.
///
/// # Example
///
/// ```rust
/// use step_metadata_sdk::xml::add_tag_value;
///
/// assert_eq!(add_tag_value("name", "a<b"), "<name>a&lt;b</name>\n");
/// assert_eq!(add_tag_value("name", ""), "<name/>\n");
/// assert_eq!(add_tag_value("parallel", &true), "<parallel>Y</parallel>\n");
/// ```
pub fn add_tag_value<V: XmlValue + ?Sized>(tag: &str, value: &V) -> String {
    let text = value.to_xml_text();
    if text.is_empty() {
        format!("<{}/>\n", tag)
    } else {
        format!("<{}>{}</{}>\n", tag, escape_text(&text), tag)
    }
}

/// Render an opening tag followed by a line break
pub fn open_tag(tag: &str) -> String {
    format!("<{}>\n", tag)
}

/// Render a closing tag followed by a line break
pub fn close_tag(tag: &str) -> String {
    format!("</{}>\n", tag)
}
