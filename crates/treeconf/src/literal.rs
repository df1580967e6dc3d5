//! The structural literal form trees are built from and encoded to.
//!
//! [`Literal`] is the closed input type of the tree builder: scalars,
//! ordered sequences and keyed mappings. Anything that wants to become part
//! of a tree goes through [`IntoLiteral`], which is where host values with no
//! node mapping (YAML aliases, bad values, non-scalar keys) are rejected.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use yaml_rust2::Yaml;

/// Literal encoding of a mandatory-missing value.
pub const MISSING: &str = "???";

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// A structural literal: the interchange form between trees, host values
/// and the text-format layer.
///
/// `Null` builds a missing value node; the string [`MISSING`] builds a
/// mandatory-missing one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Literal>),
    Mapping(IndexMap<String, Literal>),
}

/// A host value that has no node mapping.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unsupported value type: {type_name}")]
pub struct UnsupportedLiteral {
    /// Name of the offending value's type
    pub type_name: String,
}

impl UnsupportedLiteral {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl Scalar {
    /// Short name of the scalar's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            Scalar::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn into_literal(self) -> Literal {
        match self {
            Scalar::Bool(b) => Literal::Bool(b),
            Scalar::Int(i) => Literal::Int(i),
            Scalar::Float(f) => Literal::Float(f),
            Scalar::String(s) => Literal::String(s),
        }
    }
}

impl fmt::Display for Scalar {
    /// Plain string form, as spliced into interpolated text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl Literal {
    /// Build a mapping literal from key/value pairs. Later duplicates win.
    pub fn mapping<K, V, I>(entries: I) -> Literal
    where
        K: Into<String>,
        V: Into<Literal>,
        I: IntoIterator<Item = (K, V)>,
    {
        Literal::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence literal.
    pub fn sequence<V, I>(items: I) -> Literal
    where
        V: Into<Literal>,
        I: IntoIterator<Item = V>,
    {
        Literal::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::String(_) => "string",
            Literal::Sequence(_) => "sequence",
            Literal::Mapping(_) => "mapping",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Literal::Sequence(_) | Literal::Mapping(_))
    }

    /// Nesting depth: 0 for scalars, 1 for a flat container.
    pub fn depth(&self) -> usize {
        match self {
            Literal::Sequence(items) => 1 + items.iter().map(Literal::depth).max().unwrap_or(0),
            Literal::Mapping(entries) => {
                1 + entries.values().map(Literal::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// The scalar payload, if this is a non-null scalar.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Literal::Bool(b) => Some(Scalar::Bool(*b)),
            Literal::Int(i) => Some(Scalar::Int(*i)),
            Literal::Float(f) => Some(Scalar::Float(*f)),
            Literal::String(s) => Some(Scalar::String(s.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Literal]> {
        match self {
            Literal::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Literal>> {
        match self {
            Literal::Mapping(entries) => Some(entries),
            _ => None,
        }
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s != s.trim()
        || s.contains([',', ':', '[', ']', '{', '}', '\'', '"', '#'])
        || matches!(s, "null" | "true" | "false")
        || s.parse::<f64>().is_ok()
}

impl fmt::Display for Literal {
    /// Flow-style rendering: `[1, 2, 3]`, `{a: 1, b: [x, y]}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::String(s) if needs_quotes(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::String(s) => f.write_str(s),
            Literal::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Literal::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", Literal::String(key.clone()), value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<Scalar> for Literal {
    fn from(scalar: Scalar) -> Self {
        scalar.into_literal()
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident as $conv:ty),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(<$conv>::from(v))
                }
            }

            impl From<$ty> for Literal {
                fn from(v: $ty) -> Self {
                    Literal::$variant(<$conv>::from(v))
                }
            }

            impl IntoLiteral for $ty {
                fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
                    Ok(Literal::from(self))
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool as bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => Int as i64,
    u16 => Int as i64,
    u32 => Int as i64,
    f32 => Float as f64,
    f64 => Float as f64,
    String => String as String,
    &str => String as String,
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Literal::Null, Into::into)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(items: Vec<T>) -> Self {
        Literal::sequence(items)
    }
}

/// Conversion of host values into the structural literal form.
///
/// Fails for values that have no node mapping. Composite values are copied,
/// so the resulting tree never aliases caller-owned data.
pub trait IntoLiteral {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral>;
}

impl IntoLiteral for Literal {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        Ok(self)
    }
}

impl IntoLiteral for &Literal {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        Ok(self.clone())
    }
}

impl IntoLiteral for Scalar {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        Ok(Literal::from(self))
    }
}

impl IntoLiteral for () {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        Ok(Literal::Null)
    }
}

impl IntoLiteral for u64 {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        i64::try_from(self)
            .map(Literal::Int)
            .map_err(|_| UnsupportedLiteral::new("u64 out of i64 range"))
    }
}

impl IntoLiteral for usize {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        i64::try_from(self)
            .map(Literal::Int)
            .map_err(|_| UnsupportedLiteral::new("usize out of i64 range"))
    }
}

impl<T: IntoLiteral> IntoLiteral for Option<T> {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        match self {
            Some(v) => v.into_literal(),
            None => Ok(Literal::Null),
        }
    }
}

impl<T: IntoLiteral> IntoLiteral for Vec<T> {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        self.into_iter()
            .map(IntoLiteral::into_literal)
            .collect::<Result<Vec<_>, _>>()
            .map(Literal::Sequence)
    }
}

impl<T: IntoLiteral, const N: usize> IntoLiteral for [T; N] {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        self.into_iter()
            .map(IntoLiteral::into_literal)
            .collect::<Result<Vec<_>, _>>()
            .map(Literal::Sequence)
    }
}

impl<T: IntoLiteral + Clone> IntoLiteral for &[T] {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        self.iter()
            .cloned()
            .map(IntoLiteral::into_literal)
            .collect::<Result<Vec<_>, _>>()
            .map(Literal::Sequence)
    }
}

impl<K: Into<String>, T: IntoLiteral> IntoLiteral for IndexMap<K, T> {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        let mut entries = IndexMap::with_capacity(self.len());
        for (key, value) in self {
            entries.insert(key.into(), value.into_literal()?);
        }
        Ok(Literal::Mapping(entries))
    }
}

fn yaml_type_name(yaml: &Yaml) -> &'static str {
    match yaml {
        Yaml::Real(_) => "real",
        Yaml::Integer(_) => "integer",
        Yaml::String(_) => "string",
        Yaml::Boolean(_) => "boolean",
        Yaml::Array(_) => "array",
        Yaml::Hash(_) => "hash",
        Yaml::Alias(_) => "alias",
        Yaml::Null => "null",
        Yaml::BadValue => "bad value",
    }
}

/// Coerce a YAML mapping key to its string form.
fn yaml_key(key: &Yaml) -> Result<String, UnsupportedLiteral> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(r) => Ok(r.clone()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(UnsupportedLiteral::new(format!(
            "{} mapping key",
            yaml_type_name(other)
        ))),
    }
}

impl IntoLiteral for Yaml {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        (&self).into_literal()
    }
}

impl IntoLiteral for &Yaml {
    fn into_literal(self) -> Result<Literal, UnsupportedLiteral> {
        match self {
            Yaml::Null => Ok(Literal::Null),
            Yaml::Boolean(b) => Ok(Literal::Bool(*b)),
            Yaml::Integer(i) => Ok(Literal::Int(*i)),
            Yaml::Real(_) => self
                .as_f64()
                .map(Literal::Float)
                .ok_or_else(|| UnsupportedLiteral::new("malformed real")),
            Yaml::String(s) => Ok(Literal::String(s.clone())),
            Yaml::Array(items) => items
                .iter()
                .map(IntoLiteral::into_literal)
                .collect::<Result<Vec<_>, _>>()
                .map(Literal::Sequence),
            Yaml::Hash(hash) => {
                let mut entries = IndexMap::with_capacity(hash.len());
                for (key, value) in hash {
                    // Coerced keys may collide ("1" and 1); last one wins.
                    entries.insert(yaml_key(key)?, value.into_literal()?);
                }
                Ok(Literal::Mapping(entries))
            }
            Yaml::Alias(_) | Yaml::BadValue => {
                Err(UnsupportedLiteral::new(yaml_type_name(self)))
            }
        }
    }
}
