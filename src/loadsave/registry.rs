//! Validator registry
//!
//! Validators are looked up by attribute name first, then by the
//! attribute's declared value type.

use std::collections::HashMap;
use std::sync::Arc;

use super::validator::{
    ArrayValidator, BooleanValidator, DatabaseMetaValidator, EnumValidator, FieldValidator,
    IntegerValidator, StringValidator,
};
use super::value::ValueType;
use crate::models::enums::DescribedEnum;

/// Default length of generated arrays
pub const DEFAULT_ARRAY_LENGTH: usize = 5;

/// Validators keyed by attribute name and by value type
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    by_attribute: HashMap<String, Arc<dyn FieldValidator>>,
    by_type: HashMap<ValueType, Arc<dyn FieldValidator>>,
}

impl ValidatorRegistry {
    /// Registry without any validators
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with fallbacks for strings, booleans, integers and
    /// connections, plus arrays of the scalar types of `array_length`
    pub fn with_defaults(array_length: usize) -> Self {
        Self::scalar_defaults(|scalar| ArrayValidator::shared(scalar, array_length))
    }

    /// Like [`ValidatorRegistry::with_defaults`], with array fallbacks
    /// sized by the run's `generation.array_length`
    pub fn configured() -> Self {
        Self::scalar_defaults(ArrayValidator::configured_shared)
    }

    fn scalar_defaults(array: impl Fn(Arc<dyn FieldValidator>) -> ArrayValidator) -> Self {
        let string: Arc<dyn FieldValidator> = Arc::new(StringValidator::new());
        let boolean: Arc<dyn FieldValidator> = Arc::new(BooleanValidator);
        let integer: Arc<dyn FieldValidator> = Arc::new(IntegerValidator::new());

        let mut registry = Self::new();
        for scalar in [string, boolean, integer] {
            registry = registry
                .for_type_shared(Arc::new(array(scalar.clone())))
                .for_type_shared(scalar);
        }
        registry.for_type(DatabaseMetaValidator)
    }

    /// Add fallbacks for the enumeration `E` and arrays of it
    pub fn with_enum<E: DescribedEnum>(self, array_length: usize) -> Self {
        let validator: Arc<dyn FieldValidator> = Arc::new(EnumValidator::<E>::new());
        let array = ArrayValidator::shared(validator.clone(), array_length);
        self.for_type_shared(Arc::new(array))
            .for_type_shared(validator)
    }

    /// Add fallbacks for `E` and arrays of it sized by the run
    pub fn with_configured_enum<E: DescribedEnum>(self) -> Self {
        let validator: Arc<dyn FieldValidator> = Arc::new(EnumValidator::<E>::new());
        let array = ArrayValidator::configured_shared(validator.clone());
        self.for_type_shared(Arc::new(array))
            .for_type_shared(validator)
    }

    /// Use `validator` for the named attribute
    pub fn for_attribute(
        mut self,
        name: impl Into<String>,
        validator: impl FieldValidator + 'static,
    ) -> Self {
        self.by_attribute.insert(name.into(), Arc::new(validator));
        self
    }

    /// Use `validator` for every attribute of its value type that has no
    /// attribute-specific validator
    pub fn for_type(self, validator: impl FieldValidator + 'static) -> Self {
        self.for_type_shared(Arc::new(validator))
    }

    fn for_type_shared(mut self, validator: Arc<dyn FieldValidator>) -> Self {
        self.by_type.insert(validator.value_type(), validator);
        self
    }

    /// Validator for an attribute: by name, else by declared type
    pub fn resolve(&self, name: &str, value_type: &ValueType) -> Option<Arc<dyn FieldValidator>> {
        self.by_attribute
            .get(name)
            .or_else(|| self.by_type.get(value_type))
            .cloned()
    }

    /// Validator registered for `name` itself, ignoring type fallbacks
    pub fn attribute_validator(&self, name: &str) -> Option<&Arc<dyn FieldValidator>> {
        self.by_attribute.get(name)
    }

    /// Names with an attribute-specific validator, sorted
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_attribute.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<String> = self.by_type.keys().map(ToString::to_string).collect();
        types.sort_unstable();
        f.debug_struct("ValidatorRegistry")
            .field("attributes", &self.attribute_names())
            .field("types", &types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::SystemDataType;

    #[test]
    fn test_defaults_cover_scalars_and_arrays() {
        let registry = ValidatorRegistry::with_defaults(3);
        for ty in [
            ValueType::Text,
            ValueType::Boolean,
            ValueType::Integer,
            ValueType::Database,
            ValueType::array_of(ValueType::Text),
            ValueType::array_of(ValueType::Boolean),
            ValueType::array_of(ValueType::Integer),
        ] {
            let validator = registry.resolve("anything", &ty);
            assert!(validator.is_some(), "no fallback for {}", ty);
            assert_eq!(validator.unwrap().value_type(), ty);
        }
        assert!(
            registry
                .resolve("x", &ValueType::Enumeration(SystemDataType::TYPE_NAME))
                .is_none()
        );
    }

    #[test]
    fn test_attribute_validator_takes_precedence() {
        let single = StringValidator::alphanumeric().with_length(1, 1);
        let registry = ValidatorRegistry::with_defaults(5).for_attribute("commitSize", single);
        let mut ctx = crate::loadsave::GenerationContext::new(1);
        let specific = registry.resolve("commitSize", &ValueType::Text).unwrap();
        let value = specific.generate(&mut ctx).to_string();
        // quoted single character
        assert_eq!(value.chars().count(), 3);
        assert_eq!(registry.attribute_names(), vec!["commitSize"]);
    }

    #[test]
    fn test_with_enum_adds_scalar_and_array() {
        let registry = ValidatorRegistry::new().with_enum::<SystemDataType>(2);
        let ty = ValueType::Enumeration(SystemDataType::TYPE_NAME);
        assert!(registry.resolve("a", &ty).is_some());
        assert!(registry.resolve("a", &ValueType::array_of(ty)).is_some());
        assert!(registry.resolve("a", &ValueType::Text).is_none());
    }

    #[test]
    fn test_configured_arrays_are_sized_by_the_run() {
        let registry = ValidatorRegistry::configured().with_configured_enum::<SystemDataType>();
        let enum_array = ValueType::array_of(ValueType::Enumeration(SystemDataType::TYPE_NAME));
        for ty in [ValueType::array_of(ValueType::Text), enum_array] {
            let validator = registry.resolve("a", &ty).unwrap();
            let mut ctx = crate::loadsave::GenerationContext::new(8).with_array_length(2);
            match validator.generate(&mut ctx) {
                crate::loadsave::AttributeValue::Array(values) => assert_eq!(values.len(), 2),
                other => panic!("expected an array, got {}", other),
            }
        }
    }
}
