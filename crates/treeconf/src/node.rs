//! Node data model and read-only node handles.
//!
//! Nodes live in the arena owned by [`Config`]. A container stores the ids
//! of the children it owns; each child stores its parent's id and its own
//! key within the parent. The back-reference is only ever used for path
//! computation and interpolation context.

use crate::error::{ConfigError, Result};
use crate::literal::{Literal, MISSING, Scalar};
use crate::mapping::MappingRef;
use crate::path::{Key, KeyPath};
use crate::sequence::SequenceRef;
use crate::tree::Config;
use indexmap::IndexMap;
use std::fmt;

/// Handle of a node within its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// The raw content of a value node.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueState {
    Present(Scalar),
    /// Not set yet (built from `null`).
    Missing,
    /// Must be assigned before it can be read (built from `"???"`).
    MandatoryMissing,
}

impl ValueState {
    /// Build the state a scalar literal maps to.
    ///
    /// Returns `None` for container literals.
    pub fn from_literal(literal: &Literal) -> Option<ValueState> {
        match literal {
            Literal::Null => Some(ValueState::Missing),
            Literal::String(s) if s == MISSING => Some(ValueState::MandatoryMissing),
            other => other.as_scalar().map(ValueState::Present),
        }
    }

    pub fn is_missing(&self) -> bool {
        !matches!(self, ValueState::Present(_))
    }

    /// Raw literal encoding, sentinels rendered as their tokens.
    pub fn to_literal(&self) -> Literal {
        match self {
            ValueState::Present(scalar) => scalar.clone().into_literal(),
            ValueState::Missing => Literal::Null,
            ValueState::MandatoryMissing => Literal::String(MISSING.to_string()),
        }
    }
}

/// The three node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Value,
    Mapping,
    Sequence,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Value => "value",
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
        })
    }
}

/// Arena payload of a node.
#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    Value(ValueState),
    Mapping(IndexMap<String, NodeId>),
    Sequence(Vec<NodeId>),
}

impl NodeData {
    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            NodeData::Value(_) => NodeKind::Value,
            NodeData::Mapping(_) => NodeKind::Mapping,
            NodeData::Sequence(_) => NodeKind::Sequence,
        }
    }

    pub(crate) fn children(&self) -> Vec<NodeId> {
        match self {
            NodeData::Value(_) => Vec::new(),
            NodeData::Mapping(entries) => entries.values().copied().collect(),
            NodeData::Sequence(items) => items.clone(),
        }
    }
}

/// A node slot in the arena.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    /// This node's key within its parent.
    pub(crate) key: Option<Key>,
    /// Read-only declaration; `None` inherits from the nearest ancestor.
    pub(crate) read_only: Option<bool>,
}

/// A resolved read of a node.
///
/// Value nodes resolve to their scalar (after interpolation); containers
/// resolve to a handle on the container.
#[derive(Debug, Clone)]
pub enum Item<'a> {
    Value(Scalar),
    Mapping(MappingRef<'a>),
    Sequence(SequenceRef<'a>),
}

impl<'a> Item<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Item::Value(_) => NodeKind::Value,
            Item::Mapping(_) => NodeKind::Mapping,
            Item::Sequence(_) => NodeKind::Sequence,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Item::Value(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn into_scalar(self) -> Option<Scalar> {
        match self {
            Item::Value(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Scalar::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Scalar::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Scalar::as_bool)
    }

    pub fn as_mapping(&self) -> Option<MappingRef<'a>> {
        match self {
            Item::Mapping(mapping) => Some(*mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<SequenceRef<'a>> {
        match self {
            Item::Sequence(sequence) => Some(*sequence),
            _ => None,
        }
    }

    /// Fully resolved literal form of this item.
    pub fn to_literal(&self) -> Result<Literal> {
        match self {
            Item::Value(scalar) => Ok(scalar.clone().into_literal()),
            Item::Mapping(mapping) => mapping.node().to_resolved_literal(),
            Item::Sequence(sequence) => sequence.node().to_resolved_literal(),
        }
    }
}

impl PartialEq<Literal> for Item<'_> {
    fn eq(&self, other: &Literal) -> bool {
        match self {
            Item::Value(scalar) => other.as_scalar().as_ref() == Some(scalar),
            Item::Mapping(mapping) => mapping.node().equals_literal(other),
            Item::Sequence(sequence) => sequence.node().equals_literal(other),
        }
    }
}

impl PartialEq<Scalar> for Item<'_> {
    fn eq(&self, other: &Scalar) -> bool {
        self.as_scalar() == Some(other)
    }
}

impl PartialEq<&str> for Item<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Item<'_> {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

/// A read-only handle on any node of a tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) config: &'a Config,
    pub(crate) id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(config: &'a Config, id: NodeId) -> Self {
        Self { config, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn kind(&self) -> NodeKind {
        self.config.node(self.id).data.kind()
    }

    /// Path of this node from the root.
    pub fn path(&self) -> KeyPath {
        self.config.path_of(self.id)
    }

    /// This node's key within its parent (`None` for the root).
    pub fn key(&self) -> Option<&'a Key> {
        self.config.node(self.id).key.as_ref()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.config
            .node(self.id)
            .parent
            .map(|id| NodeRef::new(self.config, id))
    }

    /// Whether this node sits in a read-only subtree.
    pub fn is_read_only(&self) -> bool {
        self.config.is_read_only(self.id)
    }

    /// Raw state of a value node (`None` for containers).
    pub fn raw_value(&self) -> Option<&'a ValueState> {
        match &self.config.node(self.id).data {
            NodeData::Value(state) => Some(state),
            _ => None,
        }
    }

    /// True for value nodes in the missing or mandatory-missing state.
    pub fn is_missing(&self) -> bool {
        self.raw_value().is_some_and(ValueState::is_missing)
    }

    /// True for value nodes whose raw string contains an interpolation.
    pub fn is_interpolation(&self) -> bool {
        matches!(
            self.raw_value(),
            Some(ValueState::Present(Scalar::String(s))) if crate::interpolation::is_interpolation(s)
        )
    }

    /// Resolve this node: interpolation and missing-value policy apply.
    pub fn value(&self) -> Result<Item<'a>> {
        self.config.resolve_item(self.id)
    }

    /// Number of children (0 for value nodes).
    pub fn len(&self) -> usize {
        match &self.config.node(self.id).data {
            NodeData::Value(_) => 0,
            NodeData::Mapping(entries) => entries.len(),
            NodeData::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_mapping(&self) -> Option<MappingRef<'a>> {
        (self.kind() == NodeKind::Mapping).then(|| MappingRef::new(*self))
    }

    pub fn as_sequence(&self) -> Option<SequenceRef<'a>> {
        (self.kind() == NodeKind::Sequence).then(|| SequenceRef::new(*self))
    }

    /// Key/value enumeration; only mappings support it.
    pub fn items(&self) -> Result<Vec<(&'a str, Item<'a>)>> {
        self.require_mapping("items")?.items().collect()
    }

    /// Keys in insertion order; only mappings support it.
    pub fn keys(&self) -> Result<Vec<&'a str>> {
        Ok(self.require_mapping("keys")?.keys().collect())
    }

    pub(crate) fn require_mapping(&self, operation: &str) -> Result<MappingRef<'a>> {
        self.as_mapping()
            .ok_or_else(|| self.unsupported(operation))
    }

    pub(crate) fn require_sequence(&self, operation: &str) -> Result<SequenceRef<'a>> {
        self.as_sequence()
            .ok_or_else(|| self.unsupported(operation))
    }

    pub(crate) fn unsupported(&self, operation: &str) -> ConfigError {
        ConfigError::UnsupportedOperation {
            path: self.path(),
            operation: operation.to_string(),
            kind: self.kind().to_string(),
        }
    }

    /// Value equality against a literal.
    ///
    /// Compares resolved values; a subtree that cannot be resolved (for
    /// instance a dangling interpolation) is compared by its raw form.
    pub fn equals_literal(&self, other: &Literal) -> bool {
        match self.to_resolved_literal() {
            Ok(resolved) => resolved == *other,
            Err(_) => self.to_literal() == *other,
        }
    }
}

impl PartialEq<Literal> for NodeRef<'_> {
    fn eq(&self, other: &Literal) -> bool {
        self.equals_literal(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_state_from_literal() {
        assert_eq!(
            ValueState::from_literal(&Literal::Null),
            Some(ValueState::Missing)
        );
        assert_eq!(
            ValueState::from_literal(&Literal::from("???")),
            Some(ValueState::MandatoryMissing)
        );
        assert_eq!(
            ValueState::from_literal(&Literal::from(3)),
            Some(ValueState::Present(Scalar::Int(3)))
        );
        assert_eq!(
            ValueState::from_literal(&Literal::sequence([1])),
            None
        );
    }

    #[test]
    fn test_value_state_encoding() {
        assert_eq!(ValueState::Missing.to_literal(), Literal::Null);
        assert_eq!(
            ValueState::MandatoryMissing.to_literal(),
            Literal::from("???")
        );
        assert!(ValueState::MandatoryMissing.is_missing());
        assert!(!ValueState::Present(Scalar::Bool(false)).is_missing());
    }

    #[test]
    fn test_node_ref_navigation() {
        let config = Config::create(Literal::mapping([(
            "a",
            Literal::mapping([("b", Literal::sequence([1, 2]))]),
        )]))
        .unwrap();
        let seq = config.node_at("a.b").unwrap();
        assert_eq!(seq.kind(), NodeKind::Sequence);
        assert_eq!(seq.path().to_string(), "a.b");
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.key(), Some(&Key::Name("b".into())));

        let parent = seq.parent().unwrap();
        assert_eq!(parent.kind(), NodeKind::Mapping);
        assert_eq!(parent.path().to_string(), "a");
        assert!(config.root().parent().is_none());
    }

    #[test]
    fn test_items_on_sequence_unsupported() {
        let config = Config::create(vec![1, 2]).unwrap();
        let err = config.root().items().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedOperation { ref operation, .. } if operation == "items"
        ));
        assert!(config.root().keys().is_err());
    }

    #[test]
    fn test_item_comparisons() {
        let config = Config::create(Literal::mapping([
            ("n", Literal::from(5)),
            ("s", Literal::from("x")),
            ("m", Literal::mapping([("k", 1)])),
        ]))
        .unwrap();
        let map = config.as_mapping().unwrap();
        assert!(map.get("n").unwrap() == 5);
        assert!(map.get("s").unwrap() == "x");
        assert!(map.get("m").unwrap() == Literal::mapping([("k", 1)]));
        assert_eq!(map.get("m").unwrap().kind(), NodeKind::Mapping);
    }
}
