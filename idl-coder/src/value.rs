//! Dynamic values produced and consumed by the layout engine.
//!
//! Decoding yields one canonical form per type descriptor: unsigned integers
//! as [`Value::Uint`], signed as [`Value::Int`], `bytes` as [`Value::Bytes`],
//! fixed arrays and vecs as [`Value::Array`], structs with fields in declared
//! order.
//!
//! Floats are held as `f64`. An `f32` field round-trips only values an `f32`
//! can represent: finite values beyond `f32::MAX` are rejected on encode, and
//! other values are rounded to the nearest `f32`.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use solana_pubkey::Pubkey;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Uint(u128),
    Int(i128),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Pubkey(Pubkey),
    Option(Option<Box<Value>>),
    Array(Vec<Value>),
    Struct(Vec<(String, Value)>),
    Enum {
        variant: String,
        /// `Struct` for named variants, `Array` for tuple variants.
        fields: Option<Box<Value>>,
    },
}

impl Value {
    /// Build a struct value from `(field, value)` pairs.
    pub fn structure<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn none() -> Self {
        Value::Option(None)
    }

    pub fn some(value: Value) -> Self {
        Value::Option(Some(Box::new(value)))
    }

    pub fn unit_variant(variant: impl Into<String>) -> Self {
        Value::Enum {
            variant: variant.into(),
            fields: None,
        }
    }

    pub fn variant(variant: impl Into<String>, fields: Value) -> Self {
        Value::Enum {
            variant: variant.into(),
            fields: Some(Box::new(fields)),
        }
    }

    /// Field lookup on a struct value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.iter().find(|(k, _)| k == field).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(v) => u64::try_from(*v).ok(),
            Value::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Uint(_) => "unsigned integer",
            Value::Int(_) => "signed integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Pubkey(_) => "pubkey",
            Value::Option(_) => "option",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
            Value::Enum { .. } => "enum",
        }
    }
}

macro_rules! impl_from_uint {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(v as u128)
            }
        })*
    };
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i128)
            }
        })*
    };
}

impl_from_uint!(u8, u16, u32, u64, u128);
impl_from_int!(i8, i16, i32, i64, i128);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Pubkey> for Value {
    fn from(v: Pubkey) -> Self {
        Value::Pubkey(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Option(v.map(|inner| Box::new(inner.into())))
    }
}

/// Human-readable rendering used for decoded instruction fields.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => write!(f, "{v:?}"),
            Value::Pubkey(v) => write!(f, "{v}"),
            Value::Option(None) => f.write_str("None"),
            Value::Option(Some(v)) => write!(f, "Some({v})"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Struct(fields) => {
                if fields.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str(" }")
            }
            Value::Enum {
                variant,
                fields: None,
            } => f.write_str(variant),
            Value::Enum {
                variant,
                fields: Some(fields),
            } => match fields.as_ref() {
                Value::Array(items) => {
                    write!(f, "{variant}(")?;
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{item}")?;
                    }
                    f.write_str(")")
                }
                other => write!(f, "{variant} {other}"),
            },
        }
    }
}

/// JSON view: integers wider than 64 bits become strings, pubkeys base58,
/// unit variants a bare string and data-carrying variants `{"Variant": ...}`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Uint(v) => match u64::try_from(*v) {
                Ok(small) => serializer.serialize_u64(small),
                Err(_) => serializer.serialize_str(&v.to_string()),
            },
            Value::Int(v) => match i64::try_from(*v) {
                Ok(small) => serializer.serialize_i64(small),
                Err(_) => serializer.serialize_str(&v.to_string()),
            },
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::Bytes(bytes) => {
                let mut seq = serializer.serialize_seq(Some(bytes.len()))?;
                for b in bytes {
                    seq.serialize_element(b)?;
                }
                seq.end()
            }
            Value::Pubkey(v) => serializer.serialize_str(&v.to_string()),
            Value::Option(None) => serializer.serialize_none(),
            Value::Option(Some(v)) => serializer.serialize_some(v.as_ref()),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Value::Enum {
                variant,
                fields: None,
            } => serializer.serialize_str(variant),
            Value::Enum {
                variant,
                fields: Some(fields),
            } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(variant, fields.as_ref())?;
                map.end()
            }
        }
    }
}
