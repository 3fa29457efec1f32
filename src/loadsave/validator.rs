//! Field validators
//!
//! A validator produces a test value for an attribute and decides whether
//! a value read back from a clone or a reloaded step is equivalent to it.
//! Generation is randomized on purpose: a serializer that only works for
//! one hard-coded example is caught after a few seeds.
//!
//! `validate` never panics and never errors. A value of the wrong shape is
//! simply not equivalent, so the tester can keep collecting failures.

use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use std::marker::PhantomData;
use std::sync::Arc;

use super::context::GenerationContext;
use super::value::{AttributeValue, ValueType, enum_value};
use crate::models::database::DatabaseMeta;
use crate::models::enums::DescribedEnum;

/// Generates and compares values of one attribute type
pub trait FieldValidator: Send + Sync {
    /// Type of the values this validator produces
    fn value_type(&self) -> ValueType;

    /// Produce a representative test value
    fn generate(&self, ctx: &mut GenerationContext) -> AttributeValue;

    /// Whether `actual` is equivalent to `expected`
    fn validate(&self, expected: &AttributeValue, actual: &AttributeValue) -> bool;

    /// Inclusive bounds of generated integers, for integer validators
    fn integer_range(&self) -> Option<(i64, i64)> {
        None
    }
}

/// Characters that need escaping or are easily lost by a serializer
const AWKWARD_CHARS: &[char] = &['\n', '\r', '\t', '<', '>', '&', '"', '\'', ' ', 'é', 'ß'];

/// Random strings, mixing in characters that need escaping
#[derive(Debug, Clone)]
pub struct StringValidator {
    min_len: usize,
    max_len: usize,
    awkward_ratio: f64,
}

impl Default for StringValidator {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: 24,
            awkward_ratio: 0.15,
        }
    }
}

impl StringValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain alphanumeric strings only
    pub fn alphanumeric() -> Self {
        Self {
            awkward_ratio: 0.0,
            ..Self::default()
        }
    }

    /// Restrict generated lengths to `min_len..=max_len`
    pub fn with_length(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len.max(min_len);
        self
    }
}

impl FieldValidator for StringValidator {
    fn value_type(&self) -> ValueType {
        ValueType::Text
    }

    fn generate(&self, ctx: &mut GenerationContext) -> AttributeValue {
        let rng = ctx.rng();
        let len = rng.gen_range(self.min_len..=self.max_len);
        let text: String = (0..len)
            .map(|_| {
                if self.awkward_ratio > 0.0 && rng.gen_bool(self.awkward_ratio) {
                    *AWKWARD_CHARS.choose(rng).unwrap_or(&'_')
                } else {
                    rng.sample(Alphanumeric) as char
                }
            })
            .collect();
        AttributeValue::Text(text)
    }

    fn validate(&self, expected: &AttributeValue, actual: &AttributeValue) -> bool {
        matches!(
            (expected, actual),
            (AttributeValue::Text(e), AttributeValue::Text(a)) if e == a
        )
    }
}

/// Random booleans
#[derive(Debug, Clone, Default)]
pub struct BooleanValidator;

impl FieldValidator for BooleanValidator {
    fn value_type(&self) -> ValueType {
        ValueType::Boolean
    }

    fn generate(&self, ctx: &mut GenerationContext) -> AttributeValue {
        AttributeValue::Boolean(ctx.rng().gen_bool(0.5))
    }

    fn validate(&self, expected: &AttributeValue, actual: &AttributeValue) -> bool {
        matches!(
            (expected, actual),
            (AttributeValue::Boolean(e), AttributeValue::Boolean(a)) if e == a
        )
    }
}

/// Random integers from an inclusive range (the full `i32` range by default)
#[derive(Debug, Clone)]
pub struct IntegerValidator {
    min: i64,
    max: i64,
}

impl Default for IntegerValidator {
    fn default() -> Self {
        Self {
            min: i64::from(i32::MIN),
            max: i64::from(i32::MAX),
        }
    }
}

impl IntegerValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(min: i64, max: i64) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }
}

impl FieldValidator for IntegerValidator {
    fn value_type(&self) -> ValueType {
        ValueType::Integer
    }

    fn generate(&self, ctx: &mut GenerationContext) -> AttributeValue {
        AttributeValue::Integer(ctx.rng().gen_range(self.min..=self.max))
    }

    fn validate(&self, expected: &AttributeValue, actual: &AttributeValue) -> bool {
        matches!(
            (expected, actual),
            (AttributeValue::Integer(e), AttributeValue::Integer(a)) if e == a
        )
    }

    fn integer_range(&self) -> Option<(i64, i64)> {
        Some((self.min, self.max))
    }
}

/// Strings picked from a fixed list (e.g., date masks)
#[derive(Debug, Clone)]
pub struct OneOfValidator {
    choices: Vec<String>,
}

impl OneOfValidator {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl FieldValidator for OneOfValidator {
    fn value_type(&self) -> ValueType {
        ValueType::Text
    }

    fn generate(&self, ctx: &mut GenerationContext) -> AttributeValue {
        AttributeValue::Text(self.choices.choose(ctx.rng()).cloned().unwrap_or_default())
    }

    fn validate(&self, expected: &AttributeValue, actual: &AttributeValue) -> bool {
        matches!(
            (expected, actual),
            (AttributeValue::Text(e), AttributeValue::Text(a)) if e == a
        )
    }
}

/// Random values of a described enumeration, compared by description
pub struct EnumValidator<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E: DescribedEnum> EnumValidator<E> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E: DescribedEnum> Default for EnumValidator<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DescribedEnum> FieldValidator for EnumValidator<E> {
    fn value_type(&self) -> ValueType {
        ValueType::Enumeration(E::TYPE_NAME)
    }

    fn generate(&self, ctx: &mut GenerationContext) -> AttributeValue {
        let values = E::values();
        let index = ctx.rng().gen_range(0..values.len());
        enum_value(values[index])
    }

    fn validate(&self, expected: &AttributeValue, actual: &AttributeValue) -> bool {
        match (expected, actual) {
            (
                AttributeValue::Enumeration {
                    type_name: et,
                    description: ed,
                },
                AttributeValue::Enumeration {
                    type_name: at,
                    description: ad,
                },
            ) => et == at && ed == ad,
            _ => false,
        }
    }
}

/// Fixed-length arrays of values from an inner validator.
///
/// The length is part of the contract: a reloaded array that is longer or
/// shorter fails even when the common prefix matches. A validator built
/// with [`ArrayValidator::configured`] takes its length from the run's
/// [`GenerationContext`], so `generation.array_length` applies to it.
#[derive(Clone)]
pub struct ArrayValidator {
    inner: Arc<dyn FieldValidator>,
    length: Option<usize>,
}

impl ArrayValidator {
    pub fn new(inner: impl FieldValidator + 'static, length: usize) -> Self {
        Self::shared(Arc::new(inner), length)
    }

    /// Wrap an inner validator that is also used elsewhere
    pub fn shared(inner: Arc<dyn FieldValidator>, length: usize) -> Self {
        Self {
            inner,
            length: Some(length),
        }
    }

    /// Arrays as long as the run's configured array length
    pub fn configured(inner: impl FieldValidator + 'static) -> Self {
        Self::configured_shared(Arc::new(inner))
    }

    pub fn configured_shared(inner: Arc<dyn FieldValidator>) -> Self {
        Self {
            inner,
            length: None,
        }
    }

    /// Fixed length, or `None` when the run decides
    pub fn length(&self) -> Option<usize> {
        self.length
    }
}

impl FieldValidator for ArrayValidator {
    fn value_type(&self) -> ValueType {
        ValueType::array_of(self.inner.value_type())
    }

    fn generate(&self, ctx: &mut GenerationContext) -> AttributeValue {
        let length = self.length.unwrap_or_else(|| ctx.array_length());
        AttributeValue::Array((0..length).map(|_| self.inner.generate(ctx)).collect())
    }

    fn validate(&self, expected: &AttributeValue, actual: &AttributeValue) -> bool {
        match (expected, actual) {
            (AttributeValue::Array(e), AttributeValue::Array(a)) => {
                e.len() == a.len()
                    && e.iter()
                        .zip(a.iter())
                        .all(|(e, a)| self.inner.validate(e, a))
            }
            _ => false,
        }
    }

    fn integer_range(&self) -> Option<(i64, i64)> {
        self.inner.integer_range()
    }
}

/// Shared connection references, compared by connection name.
///
/// A step stores only the connection's name, so the rest of the
/// definition is not expected to survive on its own.
#[derive(Debug, Clone, Default)]
pub struct DatabaseMetaValidator;

impl FieldValidator for DatabaseMetaValidator {
    fn value_type(&self) -> ValueType {
        ValueType::Database
    }

    fn generate(&self, ctx: &mut GenerationContext) -> AttributeValue {
        let rng = ctx.rng();
        let suffix: String = (0..10).map(|_| rng.sample(Alphanumeric) as char).collect();
        let port = rng.gen_range(1024..65535).to_string();
        let database = DatabaseMeta::new(
            format!("db_{}", suffix),
            "ORACLE",
            format!("host-{}", suffix.to_lowercase()),
            "ORCL",
            port,
            "loader",
        );
        ctx.add_database(database.clone());
        AttributeValue::Database(Some(database))
    }

    fn validate(&self, expected: &AttributeValue, actual: &AttributeValue) -> bool {
        match (expected, actual) {
            (AttributeValue::Database(Some(e)), AttributeValue::Database(Some(a))) => {
                e.name == a.name
            }
            (AttributeValue::Database(None), AttributeValue::Database(None)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::SystemDataType;

    fn reflexive(validator: &dyn FieldValidator, seeds: std::ops::Range<u64>) {
        for seed in seeds {
            let mut ctx = GenerationContext::new(seed);
            let value = validator.generate(&mut ctx);
            assert!(
                validator.validate(&value, &value.clone()),
                "not reflexive for {} (seed {})",
                value,
                seed
            );
        }
    }

    #[test]
    fn test_every_builtin_validator_is_reflexive() {
        reflexive(&StringValidator::new(), 0..50);
        reflexive(&BooleanValidator, 0..10);
        reflexive(&IntegerValidator::new(), 0..10);
        reflexive(&OneOfValidator::new(["DATE", "DATETIME"]), 0..10);
        reflexive(&EnumValidator::<SystemDataType>::new(), 0..20);
        reflexive(&ArrayValidator::new(StringValidator::new(), 5), 0..20);
        reflexive(&ArrayValidator::new(BooleanValidator, 0), 0..2);
        reflexive(&DatabaseMetaValidator, 0..5);
    }

    #[test]
    fn test_type_mismatch_is_false_not_a_panic() {
        let text = AttributeValue::Text("1".into());
        let int = AttributeValue::Integer(1);
        assert!(!StringValidator::new().validate(&text, &int));
        assert!(!IntegerValidator::new().validate(&int, &text));
        assert!(!BooleanValidator.validate(&AttributeValue::Boolean(true), &text));
        assert!(!EnumValidator::<SystemDataType>::new().validate(&text, &text));
        assert!(!ArrayValidator::new(StringValidator::new(), 1).validate(&text, &text));
        assert!(!DatabaseMetaValidator.validate(&AttributeValue::Database(None), &text));
    }

    #[test]
    fn test_array_length_is_part_of_the_contract() {
        let validator = ArrayValidator::new(StringValidator::new(), 2);
        let a = AttributeValue::Text("a".into());
        let two = AttributeValue::Array(vec![a.clone(), a.clone()]);
        let three = AttributeValue::Array(vec![a.clone(), a.clone(), a.clone()]);
        let empty = AttributeValue::Array(vec![]);
        assert!(!validator.validate(&two, &three));
        assert!(!validator.validate(&three, &two));
        assert!(!validator.validate(&empty, &two));
        assert!(validator.validate(&empty, &empty));
    }

    #[test]
    fn test_array_generates_requested_length() {
        let mut ctx = GenerationContext::new(3);
        let validator = ArrayValidator::new(IntegerValidator::new(), 5);
        let AttributeValue::Array(values) = validator.generate(&mut ctx) else {
            panic!("array validator must produce an array");
        };
        assert_eq!(values.len(), 5);
    }

    #[test]
    fn test_configured_array_follows_context_length() {
        let validator = ArrayValidator::configured(BooleanValidator);
        assert_eq!(validator.length(), None);
        for length in [0, 2, 7] {
            let mut ctx = GenerationContext::new(5).with_array_length(length);
            let AttributeValue::Array(values) = validator.generate(&mut ctx) else {
                panic!("array validator must produce an array");
            };
            assert_eq!(values.len(), length);
        }

        let fixed = ArrayValidator::new(BooleanValidator, 3);
        let mut ctx = GenerationContext::new(5).with_array_length(9);
        let AttributeValue::Array(values) = fixed.generate(&mut ctx) else {
            panic!("array validator must produce an array");
        };
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_integer_range_is_reported_through_arrays() {
        let reversed = IntegerValidator::with_range(9, 1);
        assert_eq!(reversed.integer_range(), Some((1, 9)));
        let array = ArrayValidator::new(IntegerValidator::with_range(0, 4), 2);
        assert_eq!(array.integer_range(), Some((0, 4)));
        assert_eq!(StringValidator::new().integer_range(), None);
    }

    #[test]
    fn test_generation_varies_between_seeds() {
        let validator = StringValidator::new();
        let mut values = std::collections::HashSet::new();
        for seed in 0..20 {
            let mut ctx = GenerationContext::new(seed);
            values.insert(validator.generate(&mut ctx).to_string());
        }
        assert!(values.len() > 1);
    }

    #[test]
    fn test_database_validator_registers_connection_and_compares_names() {
        let mut ctx = GenerationContext::new(11);
        let generated = DatabaseMetaValidator.generate(&mut ctx);
        assert_eq!(ctx.databases().len(), 1);

        let AttributeValue::Database(Some(db)) = &generated else {
            panic!("expected a connection");
        };
        let mut moved = db.clone();
        moved.host_name = "elsewhere".into();
        let moved = AttributeValue::Database(Some(moved));
        assert!(DatabaseMetaValidator.validate(&generated, &moved));

        let mut renamed = db.clone();
        renamed.name = "other".into();
        let renamed = AttributeValue::Database(Some(renamed));
        assert!(!DatabaseMetaValidator.validate(&generated, &renamed));
        let missing = AttributeValue::Database(None);
        assert!(!DatabaseMetaValidator.validate(&generated, &missing));
    }
}
