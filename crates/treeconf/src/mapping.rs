//! Mapping nodes: ordered string keys to child nodes.

use crate::error::{ConfigError, Result};
use crate::literal::{IntoLiteral, Literal, Scalar};
use crate::node::{Item, NodeData, NodeId, NodeRef};
use crate::path::Key;
use crate::sequence::SequenceMut;
use crate::tree::Config;

/// Read handle on a mapping node.
#[derive(Debug, Clone, Copy)]
pub struct MappingRef<'a> {
    node: NodeRef<'a>,
}

impl<'a> MappingRef<'a> {
    pub(crate) fn new(node: NodeRef<'a>) -> Self {
        Self { node }
    }

    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    fn entries(&self) -> &'a indexmap::IndexMap<String, NodeId> {
        match &self.node.config.node(self.node.id).data {
            NodeData::Mapping(entries) => entries,
            _ => unreachable!("MappingRef always wraps a mapping node"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.entries().keys().map(String::as_str)
    }

    /// The child node at `key`, unresolved.
    pub fn child(&self, key: &str) -> Option<NodeRef<'a>> {
        self.entries()
            .get(key)
            .map(|&id| NodeRef::new(self.node.config, id))
    }

    /// Read `key`, resolving interpolations.
    ///
    /// Fails with `MissingKey` when the key is absent and with
    /// `MissingValue` when it holds a missing or mandatory-missing value.
    pub fn get(&self, key: &str) -> Result<Item<'a>> {
        self.child(key)
            .ok_or_else(|| ConfigError::MissingKey {
                path: self.node.path(),
                key: key.to_string(),
            })?
            .value()
    }

    /// Read `key`, returning `default` when the key is absent or its value
    /// is missing or mandatory-missing.
    pub fn get_or(&self, key: &str, default: impl Into<Scalar>) -> Result<Item<'a>> {
        match self.child(key) {
            None => Ok(Item::Value(default.into())),
            Some(child) if child.is_missing() => Ok(Item::Value(default.into())),
            Some(child) => child.value(),
        }
    }

    /// Resolved `(key, value)` pairs in insertion order.
    pub fn items(&self) -> impl Iterator<Item = Result<(&'a str, Item<'a>)>> + 'a {
        let config = self.node.config;
        self.entries()
            .iter()
            .map(move |(key, &id)| Ok((key.as_str(), NodeRef::new(config, id).value()?)))
    }

    /// Unresolved `(key, node)` pairs in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&'a str, NodeRef<'a>)> + 'a {
        let config = self.node.config;
        self.entries()
            .iter()
            .map(move |(key, &id)| (key.as_str(), NodeRef::new(config, id)))
    }
}

impl PartialEq<Literal> for MappingRef<'_> {
    fn eq(&self, other: &Literal) -> bool {
        self.node.equals_literal(other)
    }
}

/// Mutable handle on a mapping node.
#[derive(Debug)]
pub struct MappingMut<'a> {
    config: &'a mut Config,
    id: NodeId,
}

impl<'a> MappingMut<'a> {
    pub(crate) fn new(config: &'a mut Config, id: NodeId) -> Self {
        Self { config, id }
    }

    pub fn as_ref(&self) -> MappingRef<'_> {
        MappingRef::new(NodeRef::new(self.config, self.id))
    }

    /// Assign `value` to `key`.
    ///
    /// Scalars become value nodes, sequences and mappings are built into
    /// fresh container nodes. An existing entry keeps its position.
    pub fn set(&mut self, key: &str, value: impl IntoLiteral) -> Result<()> {
        let target = self.config.path_of(self.id).child(Key::Name(key.to_string()));
        let literal = self.config.assignable(value, target)?;
        self.config.mapping_set(self.id, key.to_string(), literal)
    }

    /// Remove `key`, failing with `MissingKey` when it is absent.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        self.config.mapping_remove(self.id, key).map(|_| ())
    }

    /// Remove `key` and return its value.
    pub fn remove(&mut self, key: &str) -> Result<Literal> {
        self.config.mapping_remove(self.id, key)
    }

    /// Mutable handle on the mapping stored at `key`.
    pub fn mapping_mut(&mut self, key: &str) -> Result<MappingMut<'_>> {
        let id = self.child_id(key)?;
        self.config.mapping_mut_by_id(id)
    }

    /// Mutable handle on the sequence stored at `key`.
    pub fn sequence_mut(&mut self, key: &str) -> Result<SequenceMut<'_>> {
        let id = self.child_id(key)?;
        self.config.sequence_mut_by_id(id)
    }

    fn child_id(&self, key: &str) -> Result<NodeId> {
        self.as_ref()
            .child(key)
            .map(|node| node.id())
            .ok_or_else(|| ConfigError::MissingKey {
                path: self.config.path_of(self.id),
                key: key.to_string(),
            })
    }
}
