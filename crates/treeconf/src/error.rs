//! Error types for configuration tree operations.
//!
//! Every variant names the path of the node the failure is about, so a
//! failure deep inside a large tree can be located from the message alone.

use crate::path::KeyPath;
use thiserror::Error;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while building, reading, mutating or merging a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A literal has no node mapping.
    #[error("Unsupported value type '{type_name}' at {path}")]
    UnsupportedType { path: KeyPath, type_name: String },

    /// A value cannot be assigned to the target slot.
    #[error("Invalid assignment of '{type_name}' to key {path}")]
    InvalidAssignment { path: KeyPath, type_name: String },

    /// A mapping key is absent.
    #[error("Missing key {key} in {path}")]
    MissingKey { path: KeyPath, key: String },

    /// A sequence index is out of range.
    #[error("Index {index} out of range for {path} (length {len})")]
    Index {
        path: KeyPath,
        index: usize,
        len: usize,
    },

    /// A missing or mandatory-missing value was read without a default.
    #[error("{} value at {path}", missing_label(.mandatory))]
    MissingValue { path: KeyPath, mandatory: bool },

    /// An interpolation path step could not be resolved.
    #[error("Interpolation '{expression}' at {path}: {message}")]
    InterpolationKey {
        path: KeyPath,
        expression: String,
        message: String,
    },

    /// Interpolation resolution revisited a node.
    #[error("Interpolation cycle at {path}: {}", format_chain(.chain))]
    InterpolationCycle { path: KeyPath, chain: Vec<KeyPath> },

    /// A malformed `${...}` expression.
    #[error("Invalid interpolation '{expression}': {message}")]
    InterpolationSyntax { expression: String, message: String },

    /// A structural mutation was attempted on a read-only subtree.
    #[error("Cannot {operation} read-only node {path}")]
    ReadOnlyMutation { path: KeyPath, operation: String },

    /// A merge would have changed a read-only subtree.
    #[error("Cannot merge into read-only node {path}")]
    ReadOnlyMerge { path: KeyPath },

    /// An operation was invoked on the wrong kind of node.
    #[error("Operation '{operation}' is not supported on {kind} node {path}")]
    UnsupportedOperation {
        path: KeyPath,
        operation: String,
        kind: String,
    },

    /// Nesting exceeds the configured maximum depth.
    #[error("Config nesting too deep (max depth: {max_depth}) at {path}")]
    NestingTooDeep { max_depth: usize, path: KeyPath },
}

fn missing_label(mandatory: &bool) -> &'static str {
    if *mandatory { "Mandatory missing" } else { "Missing" }
}

fn format_chain(chain: &[KeyPath]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl ConfigError {
    /// The path of the node this error is about, if it names one.
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            ConfigError::UnsupportedType { path, .. }
            | ConfigError::InvalidAssignment { path, .. }
            | ConfigError::MissingKey { path, .. }
            | ConfigError::Index { path, .. }
            | ConfigError::MissingValue { path, .. }
            | ConfigError::InterpolationKey { path, .. }
            | ConfigError::InterpolationCycle { path, .. }
            | ConfigError::ReadOnlyMutation { path, .. }
            | ConfigError::ReadOnlyMerge { path }
            | ConfigError::UnsupportedOperation { path, .. }
            | ConfigError::NestingTooDeep { path, .. } => Some(path),
            ConfigError::InterpolationSyntax { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Key;

    fn path(keys: Vec<Key>) -> KeyPath {
        KeyPath::from(keys)
    }

    #[test]
    fn test_invalid_assignment_message_names_path() {
        let err = ConfigError::InvalidAssignment {
            path: path(vec![Key::Name("a".into()), Key::Index(0)]),
            type_name: "bad value".into(),
        };
        insta::assert_snapshot!(err.to_string(), @"Invalid assignment of 'bad value' to key a[0]");
    }

    #[test]
    fn test_missing_value_messages() {
        let p = path(vec![Key::Name("x".into())]);
        let err = ConfigError::MissingValue {
            path: p.clone(),
            mandatory: true,
        };
        assert_eq!(err.to_string(), "Mandatory missing value at x");
        let err = ConfigError::MissingValue {
            path: p,
            mandatory: false,
        };
        assert_eq!(err.to_string(), "Missing value at x");
    }

    #[test]
    fn test_cycle_message_lists_chain() {
        let a = path(vec![Key::Name("a".into())]);
        let b = path(vec![Key::Name("b".into())]);
        let err = ConfigError::InterpolationCycle {
            path: a.clone(),
            chain: vec![a.clone(), b, a],
        };
        insta::assert_snapshot!(err.to_string(), @"Interpolation cycle at a: a -> b -> a");
    }

    #[test]
    fn test_path_accessor() {
        let err = ConfigError::InterpolationSyntax {
            expression: "${".into(),
            message: "unterminated".into(),
        };
        assert!(err.path().is_none());
        let err = ConfigError::ReadOnlyMerge {
            path: KeyPath::root(),
        };
        assert_eq!(err.path(), Some(&KeyPath::root()));
    }
}
