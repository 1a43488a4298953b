//! Argument values and their GraphQL literal rendering.

mod ser;

use crate::{Error, Result};
use indexmap::IndexMap;
use std::fmt::Write;

pub use ser::to_value;

/// A bare identifier emitted without quotes, e.g. an `orderBy` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub name: String,
}

impl Literal {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A reference to an operation variable, rendered as `$name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An argument payload.
///
/// Maps keep insertion order so rendering is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i128),
    Float(f64),
    String(String),
    Literal(Literal),
    /// Enum-like token rendered as its bare variant name.
    Enum(String),
    Variable(Variable),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Builds an enum-like value from a variant name.
    #[must_use]
    pub fn enumeration(variant: impl Into<String>) -> Self {
        Self::Enum(variant.into())
    }

    /// Renders this value as GraphQL literal text.
    pub fn to_graphql(&self) -> Result<String> {
        let mut out = String::new();
        write_value(&mut out, self)?;
        Ok(out)
    }
}

/// Renders a value as GraphQL literal text.
///
/// Fails with [`Error::InfinityNotSupported`] for non-finite floats.
pub fn serialize_arg(value: &Value) -> Result<String> {
    value.to_graphql()
}

fn write_value(out: &mut String, value: &Value) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Boolean(true) => out.push_str("true"),
        Value::Boolean(false) => out.push_str("false"),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(Error::InfinityNotSupported(*f));
            }
            // Debug keeps the fractional part: 10.0 stays "10.0"
            let _ = write!(out, "{f:?}");
        }
        Value::String(s) => write_string(out, s),
        Value::Literal(Literal { name }) | Value::Enum(name) => out.push_str(name),
        Value::Variable(Variable { name }) => {
            out.push('$');
            out.push_str(name);
        }
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        Value::Map(entries) => {
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                write_value(out, item)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{000C}' => out.push_str("\\f"),
            '\u{000B}' => {}
            '\t' => out.push('\t'),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(i128::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Self::Int(v as i128)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Int(v as i128)
    }
}

impl From<f32> for Value {
    /// Goes through the shortest decimal form so `0.1_f32` stays `0.1`.
    fn from(v: f32) -> Self {
        let widened = f64::from(v);
        if !v.is_finite() {
            return Self::Float(widened);
        }
        Self::Float(v.to_string().parse().unwrap_or(widened))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Literal> for Value {
    fn from(v: Literal) -> Self {
        Self::Literal(v)
    }
}

impl From<Variable> for Value {
    fn from(v: Variable) -> Self {
        Self::Variable(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    Self::Int(i128::from(u))
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}
