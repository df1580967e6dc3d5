//! Keys, node paths and dotted/bracketed path expressions.
//!
//! A path expression names a node relative to some starting point:
//!
//! - `a.b.c` - mapping keys
//! - `a[0].b`, `a.0.b` - sequence indices (digits after a dot address a
//!   sequence element when the container is a sequence)
//! - `a[some key]`, `a['x.y']` - bracketed keys that contain separators
//! - `.b`, `..b` - relative: each leading dot walks one container up from
//!   the node holding the expression

use crate::error::{ConfigError, Result};
use std::fmt;

/// A single step into a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(usize),
}

impl Key {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }

    /// The index this key addresses in a sequence, if any.
    ///
    /// Names made of digits count as indices, so `a.0` works like `a[0]`.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(name) => name.parse().ok(),
        }
    }

    /// The key this step addresses in a mapping.
    pub fn to_name(&self) -> String {
        match self {
            Key::Name(name) => name.clone(),
            Key::Index(i) => i.to_string(),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// The location of a node from the root of its tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<Key>);

impl KeyPath {
    pub fn root() -> Self {
        KeyPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn push(&mut self, key: Key) {
        self.0.push(key);
    }

    /// A new path with `key` appended.
    pub fn child(&self, key: Key) -> KeyPath {
        let mut keys = self.0.clone();
        keys.push(key);
        KeyPath(keys)
    }
}

impl From<Vec<Key>> for KeyPath {
    fn from(keys: Vec<Key>) -> Self {
        KeyPath(keys)
    }
}

impl fmt::Display for KeyPath {
    /// Renders as `a.b[0].c`; the root renders as `<root>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, key) in self.0.iter().enumerate() {
            match key {
                Key::Name(name) if i == 0 => f.write_str(name)?,
                Key::Name(name) => write!(f, ".{}", name)?,
                Key::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    /// Leading dots: 0 for an absolute path, otherwise how many containers
    /// to walk up from the node holding the expression.
    pub up: usize,
    /// Steps to follow from the starting node.
    pub steps: Vec<Key>,
}

impl PathExpr {
    pub fn is_relative(&self) -> bool {
        self.up > 0
    }

    /// Parse a path expression such as `a.b[0]` or `..sibling`.
    pub fn parse(expr: &str) -> Result<PathExpr> {
        let syntax = |message: &str| ConfigError::InterpolationSyntax {
            expression: expr.to_string(),
            message: message.to_string(),
        };

        let up = expr.chars().take_while(|c| *c == '.').count();
        let rest = &expr[up..];
        let mut steps = Vec::new();
        let mut chars = rest.char_indices().peekable();
        let mut expect_step = up == 0;

        while let Some((start, c)) = chars.next() {
            match c {
                '[' => {
                    let mut end = None;
                    for (i, c) in chars.by_ref() {
                        if c == ']' {
                            end = Some(i);
                            break;
                        }
                    }
                    let end = end.ok_or_else(|| syntax("unclosed '['"))?;
                    let inner = rest[start + 1..end].trim();
                    if inner.is_empty() {
                        return Err(syntax("empty brackets"));
                    }
                    steps.push(bracket_key(inner));
                    expect_step = false;
                }
                '.' => {
                    if expect_step {
                        return Err(syntax("empty path segment"));
                    }
                    expect_step = true;
                }
                ']' => return Err(syntax("unexpected ']'")),
                _ => {
                    let mut end = rest.len();
                    while let Some(&(i, c)) = chars.peek() {
                        if c == '.' || c == '[' || c == ']' {
                            end = i;
                            break;
                        }
                        chars.next();
                    }
                    if !expect_step && !steps.is_empty() {
                        return Err(syntax("missing '.' between segments"));
                    }
                    let name = rest[start..end].trim();
                    if name.is_empty() {
                        return Err(syntax("empty path segment"));
                    }
                    steps.push(Key::Name(name.to_string()));
                    expect_step = false;
                }
            }
        }

        if expect_step && (up == 0 || !steps.is_empty()) {
            return Err(syntax("path ends with '.'"));
        }
        Ok(PathExpr { up, steps })
    }
}

fn bracket_key(inner: &str) -> Key {
    if let Ok(index) = inner.parse::<usize>() {
        return Key::Index(index);
    }
    let unquoted = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(inner);
    Key::Name(unquoted.to_string())
}
