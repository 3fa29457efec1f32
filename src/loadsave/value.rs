//! Attribute values as seen by the load/save tester
//!
//! Accessors are typed; the tester works on [`AttributeValue`] so that one
//! validator framework can handle every attribute of every step.

use std::fmt;

use crate::models::database::DatabaseMeta;
use crate::models::enums::{DescribedEnum, SystemDataType};

/// Value of a single step attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Boolean(bool),
    Integer(i64),
    /// Enumeration value, identified by its description
    Enumeration {
        type_name: &'static str,
        description: &'static str,
    },
    /// Reference to a shared connection (or none)
    Database(Option<DatabaseMeta>),
    Array(Vec<AttributeValue>),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{:?}", s),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Enumeration {
                type_name,
                description,
            } => write!(f, "{}({:?})", type_name, description),
            AttributeValue::Database(Some(db)) => write!(f, "connection {:?}", db.name),
            AttributeValue::Database(None) => write!(f, "no connection"),
            AttributeValue::Array(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Declared type of an attribute, used to pick fallback validators
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Text,
    Boolean,
    Integer,
    Enumeration(&'static str),
    Database,
    Array(Box<ValueType>),
}

impl ValueType {
    /// Array of `inner`
    pub fn array_of(inner: ValueType) -> Self {
        ValueType::Array(Box::new(inner))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Text => write!(f, "String"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Integer => write!(f, "int"),
            ValueType::Enumeration(name) => write!(f, "{}", name),
            ValueType::Database => write!(f, "DatabaseMeta"),
            ValueType::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

/// Rust type that an attribute accessor can exchange with the tester
pub trait AttributeType: Sized {
    fn value_type() -> ValueType;

    fn into_value(self) -> AttributeValue;

    /// Convert back, or `None` when `value` has a different shape
    fn from_value(value: AttributeValue) -> Option<Self>;

    /// Inclusive bounds of the integers this type can hold, if it holds any
    fn integer_range() -> Option<(i64, i64)> {
        None
    }
}

impl AttributeType for String {
    fn value_type() -> ValueType {
        ValueType::Text
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Text(self)
    }

    fn from_value(value: AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl AttributeType for bool {
    fn value_type() -> ValueType {
        ValueType::Boolean
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Boolean(self)
    }

    fn from_value(value: AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

impl AttributeType for i64 {
    fn value_type() -> ValueType {
        ValueType::Integer
    }

    fn integer_range() -> Option<(i64, i64)> {
        Some((i64::MIN, i64::MAX))
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Integer(self)
    }

    fn from_value(value: AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl AttributeType for i32 {
    fn value_type() -> ValueType {
        ValueType::Integer
    }

    fn integer_range() -> Option<(i64, i64)> {
        Some((i64::from(i32::MIN), i64::from(i32::MAX)))
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Integer(i64::from(self))
    }

    fn from_value(value: AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Integer(i) => i32::try_from(i).ok(),
            _ => None,
        }
    }
}

impl AttributeType for Option<DatabaseMeta> {
    fn value_type() -> ValueType {
        ValueType::Database
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Database(self)
    }

    fn from_value(value: AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Database(db) => Some(db),
            _ => None,
        }
    }
}

impl<T: AttributeType> AttributeType for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::array_of(T::value_type())
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Array(self.into_iter().map(T::into_value).collect())
    }

    fn from_value(value: AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Array(values) => values.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }

    fn integer_range() -> Option<(i64, i64)> {
        T::integer_range()
    }
}

/// Wrap an enumeration value
pub fn enum_value<E: DescribedEnum>(value: E) -> AttributeValue {
    AttributeValue::Enumeration {
        type_name: E::TYPE_NAME,
        description: value.description(),
    }
}

/// Unwrap an enumeration value of type `E`
pub fn enum_from_value<E: DescribedEnum>(value: &AttributeValue) -> Option<E> {
    match value {
        AttributeValue::Enumeration {
            type_name,
            description,
        } if *type_name == E::TYPE_NAME => E::from_description(description),
        _ => None,
    }
}

impl AttributeType for SystemDataType {
    fn value_type() -> ValueType {
        ValueType::Enumeration(Self::TYPE_NAME)
    }

    fn into_value(self) -> AttributeValue {
        enum_value(self)
    }

    fn from_value(value: AttributeValue) -> Option<Self> {
        enum_from_value(&value)
    }
}
