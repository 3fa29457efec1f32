//! Parsed XML node tree
//!
//! A deliberately small DOM: element name, text and ordered children.
//! Attributes on elements are ignored since step metadata never uses them.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::XmlError;

/// Name given to the synthetic root that holds a parsed fragment
pub const FRAGMENT_ROOT: &str = "#fragment";

/// Element of a parsed step metadata document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Parse a fragment that may contain several top-level elements.
    ///
    /// The top-level elements become children of a synthetic root named
    /// [`FRAGMENT_ROOT`], so a step's serialized attributes can be handed
    /// straight to its `load_xml`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use step_metadata_sdk::xml::XmlNode;
    ///
    /// let root = XmlNode::parse_fragment("<schema>s</schema><table/>").unwrap();
    /// assert_eq!(root.get_tag_value("schema").as_deref(), Some("s"));
    /// assert_eq!(root.get_tag_value("table").as_deref(), Some(""));
    /// assert_eq!(root.get_tag_value("missing"), None);
    /// ```
    pub fn parse_fragment(text: &str) -> Result<XmlNode, XmlError> {
        let mut reader = Reader::from_str(text);
        let mut root = XmlNode::new(FRAGMENT_ROOT);
        let mut stack: Vec<XmlNode> = Vec::new();

        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = decode_name(e.name().as_ref(), position)?;
                    stack.push(XmlNode::new(name));
                }
                Ok(Event::Empty(e)) => {
                    let name = decode_name(e.name().as_ref(), position)?;
                    current(&mut root, &mut stack).children.push(XmlNode::new(name));
                }
                Ok(Event::End(e)) => {
                    let name = decode_name(e.name().as_ref(), position)?;
                    let Some(mut node) = stack.pop() else {
                        return Err(XmlError::malformed(
                            format!("unexpected closing tag </{}>", name),
                            position,
                        ));
                    };
                    if node.name != name {
                        return Err(XmlError::malformed(
                            format!("expected </{}> but found </{}>", node.name, name),
                            position,
                        ));
                    }
                    node.drop_layout_text();
                    current(&mut root, &mut stack).children.push(node);
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| XmlError::malformed(e.to_string(), position))?;
                    current(&mut root, &mut stack).text.push_str(&text);
                }
                Ok(Event::CData(c)) => {
                    let bytes = c.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| XmlError::malformed(e.to_string(), position))?;
                    current(&mut root, &mut stack).text.push_str(text);
                }
                Ok(Event::Eof) => break,
                // Declarations, comments, processing instructions
                Ok(_) => {}
                Err(e) => {
                    let position = reader.buffer_position() as u64;
                    return Err(XmlError::malformed(e.to_string(), position));
                }
            }
        }

        if !stack.is_empty() {
            let open = stack
                .iter()
                .map(|n| n.name.as_str())
                .collect::<Vec<_>>()
                .join(" > ");
            return Err(XmlError::malformed(
                format!("unclosed element(s): {}", open),
                text.len() as u64,
            ));
        }

        root.drop_layout_text();
        Ok(root)
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element text, exactly as written (unescaped)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Child elements in document order
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First child element with the given name
    pub fn sub_node(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == tag)
    }

    /// All child elements with the given name, in document order
    pub fn sub_nodes<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == tag)
    }

    /// Number of child elements with the given name
    pub fn count_nodes(&self, tag: &str) -> usize {
        self.sub_nodes(tag).count()
    }

    /// Text of the first child element with the given name.
    ///
    /// Returns `None` when the element is absent and `Some("")` when it is
    /// present but empty.
    pub fn get_tag_value(&self, tag: &str) -> Option<String> {
        self.sub_node(tag).map(|n| n.text.clone())
    }

    /// Whether an element with the given name exists anywhere below this node
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.children
            .iter()
            .any(|c| c.name == tag || c.contains_tag(tag))
    }

    // Whitespace between child elements is indentation, not content.
    fn drop_layout_text(&mut self) {
        if !self.children.is_empty() && self.text.trim().is_empty() {
            self.text.clear();
        }
    }
}

fn current<'a>(root: &'a mut XmlNode, stack: &'a mut [XmlNode]) -> &'a mut XmlNode {
    match stack.last_mut() {
        Some(node) => node,
        None => root,
    }
}

fn decode_name(bytes: &[u8], position: u64) -> Result<String, XmlError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| XmlError::malformed(format!("invalid element name: {}", e), position))
}
