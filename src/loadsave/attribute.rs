//! Attribute registry
//!
//! Each step type declares, once, the attributes the tester exercises:
//! a unique name, a getter and a setter. Accessors must not touch other
//! attributes; cross-attribute invariants belong in the repair hook.

use tracing::warn;

use super::error::{HarnessError, HarnessResult};
use super::value::{AttributeType, AttributeValue, ValueType};

type Getter<M> = Box<dyn Fn(&M) -> AttributeValue + Send + Sync>;
type Setter<M> = Box<dyn Fn(&mut M, AttributeValue) -> bool + Send + Sync>;

/// Name and accessor pair of one attribute of `M`
pub struct AttributeDescriptor<M> {
    name: String,
    value_type: ValueType,
    integer_range: Option<(i64, i64)>,
    xml_tag: Option<String>,
    getter: Getter<M>,
    setter: Setter<M>,
}

impl<M: 'static> AttributeDescriptor<M> {
    /// Bind a typed getter and setter under `name`.
    ///
    /// The declared value type is taken from the accessor type.
    pub fn new<T, G, S>(name: impl Into<String>, getter: G, setter: S) -> Self
    where
        T: AttributeType + 'static,
        G: Fn(&M) -> T + Send + Sync + 'static,
        S: Fn(&mut M, T) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            value_type: T::value_type(),
            integer_range: T::integer_range(),
            xml_tag: None,
            getter: Box::new(move |meta| getter(meta).into_value()),
            setter: Box::new(move |meta, value| match T::from_value(value) {
                Some(typed) => {
                    setter(meta, typed);
                    true
                }
                None => false,
            }),
        }
    }

    /// Element that must appear in the serialized document for this attribute
    pub fn with_xml_tag(mut self, tag: impl Into<String>) -> Self {
        self.xml_tag = Some(tag.into());
        self
    }
}

impl<M> AttributeDescriptor<M> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Bounds of the integers the accessor type can hold
    pub fn integer_range(&self) -> Option<(i64, i64)> {
        self.integer_range
    }

    pub fn xml_tag(&self) -> Option<&str> {
        self.xml_tag.as_deref()
    }

    /// Read the attribute's current value
    pub fn get(&self, meta: &M) -> AttributeValue {
        (self.getter)(meta)
    }

    /// Replace the attribute's value
    pub fn set(&self, meta: &mut M, value: AttributeValue) -> HarnessResult<()> {
        let shown = value.to_string();
        if (self.setter)(meta, value) {
            Ok(())
        } else {
            Err(HarnessError::TypeMismatch {
                attribute: self.name.clone(),
                expected: self.value_type.to_string(),
                actual: shown,
            })
        }
    }
}

impl<M> std::fmt::Debug for AttributeDescriptor<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("xml_tag", &self.xml_tag)
            .finish_non_exhaustive()
    }
}

/// Ordered attribute table of one step type
///
/// # Example
///
/// ```rust
/// use step_metadata_sdk::loadsave::AttributeRegistry;
/// use step_metadata_sdk::models::OraBulkLoaderMeta;
///
/// let registry = AttributeRegistry::<OraBulkLoaderMeta>::new()
///     .attribute("schemaName", |m| m.schema_name().clone(), |m, v| m.set_schema_name(v))
///     .xml_tag("schema")
///     .attribute("parallel", |m| m.is_parallel(), |m, v| m.set_parallel(v));
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.get("schemaName").unwrap().xml_tag(), Some("schema"));
/// ```
#[derive(Debug)]
pub struct AttributeRegistry<M> {
    attributes: Vec<AttributeDescriptor<M>>,
}

impl<M> Default for AttributeRegistry<M> {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }
}

impl<M: 'static> AttributeRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor
    pub fn register(mut self, descriptor: AttributeDescriptor<M>) -> Self {
        self.attributes.push(descriptor);
        self
    }

    /// Add an attribute from a getter and setter
    pub fn attribute<T, G, S>(self, name: impl Into<String>, getter: G, setter: S) -> Self
    where
        T: AttributeType + 'static,
        G: Fn(&M) -> T + Send + Sync + 'static,
        S: Fn(&mut M, T) + Send + Sync + 'static,
    {
        self.register(AttributeDescriptor::new(name, getter, setter))
    }

    /// Set the XML tag of the most recently added attribute
    pub fn xml_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        match self.attributes.pop() {
            Some(last) => self.attributes.push(last.with_xml_tag(tag)),
            None => warn!("XML tag '{}' given before any attribute; ignored", tag),
        }
        self
    }
}

impl<M> AttributeRegistry<M> {
    pub fn get(&self, name: &str) -> Option<&AttributeDescriptor<M>> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub(crate) fn at(&self, index: usize) -> &AttributeDescriptor<M> {
        &self.attributes[index]
    }

    /// Attribute names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDescriptor<M>> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        name: String,
        sizes: Vec<i32>,
    }

    fn registry() -> AttributeRegistry<Sample> {
        AttributeRegistry::new()
            .attribute("name", |s: &Sample| s.name.clone(), |s, v| s.name = v)
            .xml_tag("name")
            .attribute("sizes", |s: &Sample| s.sizes.clone(), |s, v| s.sizes = v)
    }

    #[test]
    fn test_descriptors_keep_declared_types() {
        let registry = registry();
        assert_eq!(registry.get("name").unwrap().value_type(), &ValueType::Text);
        assert_eq!(
            registry.get("sizes").unwrap().value_type(),
            &ValueType::array_of(ValueType::Integer)
        );
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["name", "sizes"]);
        assert_eq!(registry.get("sizes").unwrap().xml_tag(), None);
    }

    #[test]
    fn test_set_and_get() {
        let registry = registry();
        let mut sample = Sample::default();
        let sizes = registry.get("sizes").unwrap();
        let value = AttributeValue::Array(vec![AttributeValue::Integer(3)]);
        sizes.set(&mut sample, value.clone()).unwrap();
        assert_eq!(sample.sizes, vec![3]);
        assert_eq!(sizes.get(&sample), value);
    }

    #[test]
    fn test_set_with_wrong_shape_is_a_type_mismatch() {
        let registry = registry();
        let mut sample = Sample::default();
        let err = registry
            .get("name")
            .unwrap()
            .set(&mut sample, AttributeValue::Boolean(true))
            .unwrap_err();
        assert!(matches!(
            err,
            HarnessError::TypeMismatch { ref attribute, .. } if attribute == "name"
        ));
    }

    #[test]
    fn test_xml_tag_without_attribute_is_ignored() {
        let registry = AttributeRegistry::<Sample>::new()
            .xml_tag("orphan")
            .attribute("name", |s: &Sample| s.name.clone(), |s, v| s.name = v);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("name").unwrap().xml_tag(), None);
    }

    #[test]
    fn test_descriptor_records_integer_width() {
        let registry = registry();
        assert_eq!(
            registry.get("sizes").unwrap().integer_range(),
            Some((i64::from(i32::MIN), i64::from(i32::MAX)))
        );
        assert_eq!(registry.get("name").unwrap().integer_range(), None);
    }
}
