//! The configuration tree: node arena, builder and structural mutation.
//!
//! All structural changes go through the primitives in this module, which
//! keep parent back-references and sequence indices consistent, enforce
//! read-only subtrees, and free detached subtrees. Every primitive validates
//! before it touches the arena, so a failed operation leaves the tree as it
//! was.

use crate::error::{ConfigError, Result};
use crate::literal::{IntoLiteral, Literal, Scalar};
use crate::mapping::{MappingMut, MappingRef};
use crate::node::{Item, Node, NodeData, NodeId, NodeKind, NodeRef, ValueState};
use crate::options::{ConfigOptions, EncodeOptions};
use crate::path::{Key, KeyPath, PathExpr};
use crate::sequence::{SequenceMut, SequenceRef};
use indexmap::IndexMap;
use std::fmt;

/// A hierarchical configuration tree.
///
/// The tree exclusively owns all of its nodes. Cloning a `Config` deep-copies
/// the tree; the clone shares nothing with the original.
#[derive(Debug, Clone)]
pub struct Config {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
    options: ConfigOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// An empty mapping tree.
    pub fn new() -> Self {
        Self::with_root(Literal::Mapping(IndexMap::new()), ConfigOptions::default())
    }

    /// Build a tree from any literal source.
    ///
    /// Scalars build a value node, sequences a sequence node and mappings a
    /// mapping node, recursively. Composite inputs are deep-copied.
    pub fn create(value: impl IntoLiteral) -> Result<Self> {
        Self::create_with_options(value, ConfigOptions::default())
    }

    pub fn create_with_options(value: impl IntoLiteral, options: ConfigOptions) -> Result<Self> {
        let literal = value
            .into_literal()
            .map_err(|e| ConfigError::UnsupportedType {
                path: KeyPath::root(),
                type_name: e.type_name,
            })?;
        if literal.depth() > options.max_depth {
            return Err(ConfigError::NestingTooDeep {
                max_depth: options.max_depth,
                path: KeyPath::root(),
            });
        }
        Ok(Self::with_root(literal, options))
    }

    fn with_root(literal: Literal, options: ConfigOptions) -> Self {
        let mut config = Config {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            options,
        };
        config.root = config.build(literal, None, None);
        config
    }

    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, self.root)
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self) -> NodeKind {
        self.root().kind()
    }

    /// Number of children of the root container.
    pub fn len(&self) -> usize {
        self.root().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root().is_empty()
    }

    /// The root as a mapping.
    pub fn as_mapping(&self) -> Result<MappingRef<'_>> {
        self.root().require_mapping("mapping access")
    }

    /// The root as a sequence.
    pub fn as_sequence(&self) -> Result<SequenceRef<'_>> {
        self.root().require_sequence("sequence access")
    }

    pub fn mapping_mut(&mut self) -> Result<MappingMut<'_>> {
        let id = self.root;
        self.mapping_mut_by_id(id)
    }

    pub fn sequence_mut(&mut self) -> Result<SequenceMut<'_>> {
        let id = self.root;
        self.sequence_mut_by_id(id)
    }

    /// Mutable handle on the mapping at `path`.
    pub fn mapping_mut_at(&mut self, path: &str) -> Result<MappingMut<'_>> {
        let id = self.node_at(path)?.id();
        self.mapping_mut_by_id(id)
    }

    /// Mutable handle on the sequence at `path`.
    pub fn sequence_mut_at(&mut self, path: &str) -> Result<SequenceMut<'_>> {
        let id = self.node_at(path)?.id();
        self.sequence_mut_by_id(id)
    }

    pub(crate) fn mapping_mut_by_id(&mut self, id: NodeId) -> Result<MappingMut<'_>> {
        NodeRef::new(self, id).require_mapping("mapping access")?;
        Ok(MappingMut::new(self, id))
    }

    pub(crate) fn sequence_mut_by_id(&mut self, id: NodeId) -> Result<SequenceMut<'_>> {
        NodeRef::new(self, id).require_sequence("sequence access")?;
        Ok(SequenceMut::new(self, id))
    }

    /// Locate the node at a path expression without resolving it.
    ///
    /// Intermediate interpolations that resolve to containers are followed.
    /// An empty path names the root.
    pub fn node_at(&self, path: &str) -> Result<NodeRef<'_>> {
        if path.trim().is_empty() {
            return Ok(self.root());
        }
        let expr = PathExpr::parse(path)?;
        if expr.is_relative() {
            return Err(ConfigError::InterpolationSyntax {
                expression: path.to_string(),
                message: "relative paths need a referencing node".to_string(),
            });
        }
        let mut current = self.root;
        for step in &expr.steps {
            current = self.step_into(current, step, &mut Vec::new())?;
        }
        Ok(NodeRef::new(self, current))
    }

    /// Read the node at a path expression, resolving interpolations.
    pub fn select(&self, path: &str) -> Result<Item<'_>> {
        self.node_at(path)?.value()
    }

    /// Read with a default for missing keys and missing values.
    pub fn select_or(&self, path: &str, default: impl Into<Scalar>) -> Result<Item<'_>> {
        match self.select(path) {
            Err(ConfigError::MissingKey { .. } | ConfigError::MissingValue { .. }) => {
                Ok(Item::Value(default.into()))
            }
            other => other,
        }
    }

    /// Whether the node at `path` is absent, missing or mandatory-missing.
    pub fn is_missing(&self, path: &str) -> Result<bool> {
        match self.node_at(path) {
            Ok(node) => Ok(node.is_missing()),
            Err(ConfigError::MissingKey { .. }) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Assign `value` at `path`, creating intermediate mappings as needed.
    pub fn update(&mut self, path: &str, value: impl IntoLiteral) -> Result<()> {
        let expr = PathExpr::parse(path)?;
        let Some((_, parents)) = expr.steps.split_last() else {
            return Err(ConfigError::InterpolationSyntax {
                expression: path.to_string(),
                message: "empty path".to_string(),
            });
        };
        if expr.is_relative() {
            return Err(ConfigError::InterpolationSyntax {
                expression: path.to_string(),
                message: "relative paths need a referencing node".to_string(),
            });
        }

        // Find the deepest existing container, then build the remainder as
        // one nested literal so that the whole update is a single assignment.
        let mut current = self.root;
        let mut consumed = 0;
        for step in parents {
            match self.child(current, step) {
                Some(child) if self.node(child).data.kind() != NodeKind::Value => {
                    current = child;
                    consumed += 1;
                }
                _ => break,
            }
        }

        let mut literal = value
            .into_literal()
            .map_err(|e| ConfigError::InvalidAssignment {
                path: KeyPath::from(expr.steps.clone()),
                type_name: e.type_name,
            })?;
        for step in expr.steps[consumed + 1..].iter().rev() {
            literal = Literal::mapping([(step.to_name(), literal)]);
        }
        let key = &expr.steps[consumed];
        let target = self.path_of(current).child(key.clone());
        self.check_depth(&literal, &target)?;
        tracing::trace!(path = %target, "Updating config value");

        match self.node(current).data.kind() {
            NodeKind::Mapping => self.mapping_set(current, key.to_name(), literal),
            NodeKind::Sequence => {
                let index = key.as_index().ok_or_else(|| ConfigError::MissingKey {
                    path: self.path_of(current),
                    key: key.to_name(),
                })?;
                self.sequence_set(current, index, literal)
            }
            NodeKind::Value => Err(NodeRef::new(self, current).unsupported("update")),
        }
    }

    /// Declare (or clear, with `None`) the read-only flag of the node at `path`.
    pub fn set_read_only(&mut self, path: &str, flag: Option<bool>) -> Result<()> {
        let id = self.node_at(path)?.id();
        self.node_mut(id).read_only = flag;
        Ok(())
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.0]
            .as_ref()
            .expect("node ids held by the tree are live")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.0]
            .as_mut()
            .expect("node ids held by the tree are live")
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Free a detached subtree.
    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes[id.0].take() {
                pending.extend(node.data.children());
                self.free.push(id.0);
            }
        }
    }

    /// Number of live nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Build a fresh subtree from a literal.
    fn build(&mut self, literal: Literal, parent: Option<NodeId>, key: Option<Key>) -> NodeId {
        let id = self.alloc(Node {
            data: NodeData::Value(ValueState::Missing),
            parent,
            key,
            read_only: None,
        });
        self.fill(id, literal);
        id
    }

    /// Set a node's payload from a literal, building its children.
    fn fill(&mut self, id: NodeId, literal: Literal) {
        let data = match literal {
            Literal::Sequence(items) => NodeData::Sequence(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| self.build(item, Some(id), Some(Key::Index(i))))
                    .collect(),
            ),
            Literal::Mapping(entries) => NodeData::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| {
                        let child = self.build(v, Some(id), Some(Key::Name(k.clone())));
                        (k, child)
                    })
                    .collect(),
            ),
            scalar => NodeData::Value(
                ValueState::from_literal(&scalar).unwrap_or(ValueState::Missing),
            ),
        };
        self.node_mut(id).data = data;
    }

    /// Replace a node's content in place, keeping its position and flags.
    pub(crate) fn replace_content(&mut self, id: NodeId, literal: Literal) {
        let old = std::mem::replace(&mut self.node_mut(id).data, NodeData::Sequence(Vec::new()));
        for child in old.children() {
            self.release(child);
        }
        self.fill(id, literal);
    }

    pub(crate) fn path_of(&self, id: NodeId) -> KeyPath {
        let mut keys = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if let Some(key) = &node.key {
                keys.push(key.clone());
            }
            current = node.parent;
        }
        keys.reverse();
        KeyPath::from(keys)
    }

    pub(crate) fn is_read_only(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if let Some(flag) = node.read_only {
                return flag;
            }
            current = node.parent;
        }
        false
    }

    pub(crate) fn check_writable(&self, id: NodeId, operation: &str) -> Result<()> {
        if self.is_read_only(id) {
            return Err(ConfigError::ReadOnlyMutation {
                path: self.path_of(id),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_depth(&self, literal: &Literal, at: &KeyPath) -> Result<()> {
        if at.keys().len() + literal.depth() > self.options.max_depth {
            return Err(ConfigError::NestingTooDeep {
                max_depth: self.options.max_depth,
                path: at.clone(),
            });
        }
        Ok(())
    }

    /// Convert an assigned value, naming the target slot on failure.
    pub(crate) fn assignable(&self, value: impl IntoLiteral, target: KeyPath) -> Result<Literal> {
        let literal = value
            .into_literal()
            .map_err(|e| ConfigError::InvalidAssignment {
                path: target.clone(),
                type_name: e.type_name,
            })?;
        self.check_depth(&literal, &target)?;
        Ok(literal)
    }

    /// Direct child of a container, without resolving anything.
    pub(crate) fn child(&self, id: NodeId, key: &Key) -> Option<NodeId> {
        match &self.node(id).data {
            NodeData::Mapping(entries) => entries.get(&key.to_name()).copied(),
            NodeData::Sequence(items) => key.as_index().and_then(|i| items.get(i).copied()),
            NodeData::Value(_) => None,
        }
    }

    /// Follow one path step, resolving a value node first if it is an
    /// interpolation that points at a container.
    pub(crate) fn step_into(&self, id: NodeId, key: &Key, stack: &mut Vec<NodeId>) -> Result<NodeId> {
        let container = match self.node(id).data.kind() {
            NodeKind::Value => self.follow(id, stack)?,
            _ => id,
        };
        match &self.node(container).data {
            NodeData::Mapping(_) => self.child(container, key).ok_or_else(|| ConfigError::MissingKey {
                path: self.path_of(container),
                key: key.to_name(),
            }),
            NodeData::Sequence(items) => {
                let index = key.as_index().ok_or_else(|| ConfigError::MissingKey {
                    path: self.path_of(container),
                    key: key.to_name(),
                })?;
                items.get(index).copied().ok_or_else(|| ConfigError::Index {
                    path: self.path_of(container),
                    index,
                    len: items.len(),
                })
            }
            NodeData::Value(_) => Err(NodeRef::new(self, container).unsupported("key access")),
        }
    }

    /// Assign a literal to a mapping key.
    ///
    /// An existing entry is detached and replaced at the same position; a new
    /// key is appended.
    pub(crate) fn mapping_set(&mut self, id: NodeId, key: String, literal: Literal) -> Result<()> {
        self.check_writable(id, "assign to")?;
        if let Some(existing) = self.child(id, &Key::Name(key.clone())) {
            self.check_writable(existing, "assign to")?;
        }
        tracing::trace!(path = %self.path_of(id), key = %key, "Assigning mapping entry");
        let child = self.build(literal, Some(id), Some(Key::Name(key.clone())));
        let previous = match &mut self.node_mut(id).data {
            NodeData::Mapping(entries) => entries.insert(key, child),
            _ => unreachable!("mapping_set called on a non-mapping node"),
        };
        if let Some(previous) = previous {
            self.release(previous);
        }
        Ok(())
    }

    /// Remove a mapping entry, returning its detached id's raw literal.
    pub(crate) fn mapping_remove(&mut self, id: NodeId, key: &str) -> Result<Literal> {
        let NodeData::Mapping(entries) = &self.node(id).data else {
            return Err(NodeRef::new(self, id).unsupported("delete"));
        };
        let Some(&child) = entries.get(key) else {
            return Err(ConfigError::MissingKey {
                path: self.path_of(id),
                key: key.to_string(),
            });
        };
        self.check_writable(id, "delete from")?;
        self.check_writable(child, "delete")?;
        let value = self.detached_value(child);
        tracing::trace!(path = %self.path_of(child), "Deleting mapping entry");
        if let NodeData::Mapping(entries) = &mut self.node_mut(id).data {
            // shift_remove keeps the order of the remaining keys
            entries.shift_remove(key);
        }
        self.release(child);
        Ok(value)
    }

    fn sequence_items(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).data {
            NodeData::Sequence(items) => items,
            _ => &[],
        }
    }

    fn index_error(&self, id: NodeId, index: usize) -> ConfigError {
        ConfigError::Index {
            path: self.path_of(id),
            index,
            len: self.sequence_items(id).len(),
        }
    }

    /// Replace a sequence element in place.
    pub(crate) fn sequence_set(&mut self, id: NodeId, index: usize, literal: Literal) -> Result<()> {
        if index >= self.sequence_items(id).len() {
            return Err(self.index_error(id, index));
        }
        self.check_writable(id, "assign to")?;
        self.check_writable(self.sequence_items(id)[index], "assign to")?;
        tracing::trace!(path = %self.path_of(id), index, "Assigning sequence element");
        let child = self.build(literal, Some(id), Some(Key::Index(index)));
        let previous = match &mut self.node_mut(id).data {
            NodeData::Sequence(items) => std::mem::replace(&mut items[index], child),
            _ => unreachable!("sequence_set called on a non-sequence node"),
        };
        self.release(previous);
        Ok(())
    }

    /// Insert before `index` (`index == len` appends).
    pub(crate) fn sequence_insert(&mut self, id: NodeId, index: usize, literal: Literal) -> Result<()> {
        if index > self.sequence_items(id).len() {
            return Err(self.index_error(id, index));
        }
        self.check_writable(id, "insert into")?;
        tracing::trace!(path = %self.path_of(id), index, "Inserting sequence element");
        let child = self.build(literal, Some(id), Some(Key::Index(index)));
        if let NodeData::Sequence(items) = &mut self.node_mut(id).data {
            items.insert(index, child);
        }
        self.reindex(id, index + 1);
        Ok(())
    }

    /// Remove the element at `index`, closing the gap.
    pub(crate) fn sequence_remove(&mut self, id: NodeId, index: usize) -> Result<Literal> {
        if index >= self.sequence_items(id).len() {
            return Err(self.index_error(id, index));
        }
        self.check_writable(id, "remove from")?;
        let child = self.sequence_items(id)[index];
        self.check_writable(child, "remove")?;
        let value = self.detached_value(child);
        tracing::trace!(path = %self.path_of(child), "Removing sequence element");
        if let NodeData::Sequence(items) = &mut self.node_mut(id).data {
            items.remove(index);
        }
        self.release(child);
        self.reindex(id, index);
        Ok(value)
    }

    /// Renumber the keys of sequence elements from `start` on.
    fn reindex(&mut self, id: NodeId, start: usize) {
        let items = self.sequence_items(id).to_vec();
        for (i, child) in items.into_iter().enumerate().skip(start) {
            self.node_mut(child).key = Some(Key::Index(i));
        }
    }

    /// Value of a node that is about to be detached.
    ///
    /// Resolved while the node still has its interpolation context; falls
    /// back to the raw form when it cannot be resolved.
    fn detached_value(&self, id: NodeId) -> Literal {
        let node = NodeRef::new(self, id);
        node.to_resolved_literal()
            .unwrap_or_else(|_| node.to_literal())
    }
}

impl fmt::Display for Config {
    /// Flow-style rendering of the raw tree, e.g. `[1, 2, 3]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode(EncodeOptions::raw()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: Vec<Literal>) -> Literal {
        Literal::Sequence(items)
    }

    fn map(entries: Vec<(&str, Literal)>) -> Literal {
        Literal::mapping(entries)
    }

    #[test]
    fn test_create_kinds() {
        assert_eq!(Config::create(1).unwrap().kind(), NodeKind::Value);
        assert_eq!(Config::create(Literal::Null).unwrap().kind(), NodeKind::Value);
        assert_eq!(Config::create(seq(vec![])).unwrap().kind(), NodeKind::Sequence);
        assert_eq!(Config::create(map(vec![])).unwrap().kind(), NodeKind::Mapping);
        assert_eq!(Config::new().kind(), NodeKind::Mapping);
    }

    #[test]
    fn test_create_unsupported_type() {
        let err = Config::create(yaml_rust2::Yaml::BadValue).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedType { ref type_name, .. } if type_name == "bad value"));
    }

    #[test]
    fn test_create_depth_limit() {
        let mut literal = Literal::from(1);
        for _ in 0..10 {
            literal = map(vec![("nested", literal)]);
        }
        let options = ConfigOptions { max_depth: 5 };
        let err = Config::create_with_options(literal.clone(), options).unwrap_err();
        assert!(matches!(err, ConfigError::NestingTooDeep { max_depth: 5, .. }));
        assert!(Config::create(literal).is_ok());
    }

    #[test]
    fn test_node_at_paths() {
        let config = Config::create(map(vec![(
            "a",
            seq(vec![Literal::from(1), map(vec![("b", Literal::from("x"))])]),
        )]))
        .unwrap();
        assert_eq!(config.node_at("a[1].b").unwrap().path().to_string(), "a[1].b");
        assert_eq!(config.node_at("a.1.b").unwrap().path().to_string(), "a[1].b");
        assert!(matches!(
            config.node_at("a[5]"),
            Err(ConfigError::Index { index: 5, len: 2, .. })
        ));
        assert!(matches!(
            config.node_at("a.x"),
            Err(ConfigError::MissingKey { .. })
        ));
        assert_eq!(config.node_at("").unwrap().id(), config.root().id());
    }

    #[test]
    fn test_select_and_select_or() {
        let config = Config::create(map(vec![
            ("a", Literal::from(1)),
            ("m", Literal::from("???")),
        ]))
        .unwrap();
        assert!(config.select("a").unwrap() == 1);
        assert!(matches!(
            config.select("m"),
            Err(ConfigError::MissingValue { mandatory: true, .. })
        ));
        assert!(config.select_or("m", "d").unwrap() == "d");
        assert!(config.select_or("nope", 7).unwrap() == 7);
    }

    #[test]
    fn test_is_missing() {
        let config = Config::create(map(vec![
            ("a", Literal::Null),
            ("b", Literal::from("???")),
            ("c", Literal::from(0)),
        ]))
        .unwrap();
        assert!(config.is_missing("a").unwrap());
        assert!(config.is_missing("b").unwrap());
        assert!(!config.is_missing("c").unwrap());
        assert!(config.is_missing("d").unwrap());
    }

    #[test]
    fn test_update_creates_intermediate_mappings() {
        let mut config = Config::new();
        config.update("a.b.c", 3).unwrap();
        assert!(config.select("a.b.c").unwrap() == 3);
        assert!(config.root().equals_literal(&map(vec![(
            "a",
            map(vec![("b", map(vec![("c", Literal::from(3))]))]),
        )])));

        config.update("a.b", "replaced").unwrap();
        assert!(config.select("a.b").unwrap() == "replaced");
    }

    #[test]
    fn test_update_sequence_element() {
        let mut config = Config::create(map(vec![("xs", seq(vec![Literal::from(1), Literal::from(2)]))])).unwrap();
        config.update("xs[1]", 20).unwrap();
        assert!(config.select("xs[1]").unwrap() == 20);
        assert!(matches!(
            config.update("xs[9]", 0),
            Err(ConfigError::Index { .. })
        ));
    }

    #[test]
    fn test_detached_nodes_are_freed() {
        let mut config = Config::create(map(vec![(
            "a",
            map(vec![("b", seq(vec![Literal::from(1), Literal::from(2)]))]),
        )]))
        .unwrap();
        assert_eq!(config.node_count(), 5);
        config.mapping_mut().unwrap().set("a", 1).unwrap();
        assert_eq!(config.node_count(), 2);
        config.mapping_mut().unwrap().set("b", seq(vec![Literal::from(1)])).unwrap();
        assert_eq!(config.node_count(), 4);
    }

    #[test]
    fn test_read_only_inherited() {
        let mut config = Config::create(map(vec![(
            "a",
            map(vec![("b", map(vec![("c", Literal::from(1))]))]),
        )]))
        .unwrap();
        config.set_read_only("a", Some(true)).unwrap();
        assert!(config.node_at("a.b.c").unwrap().is_read_only());
        assert!(!config.root().is_read_only());

        let err = config.mapping_mut_at("a.b").unwrap().set("c", 2).unwrap_err();
        assert!(matches!(err, ConfigError::ReadOnlyMutation { ref path, .. } if path.to_string() == "a.b"));
        assert!(config.select("a.b.c").unwrap() == 1);

        // A nearer declaration overrides the inherited flag.
        config.set_read_only("a.b", Some(false)).unwrap();
        config.mapping_mut_at("a.b").unwrap().set("c", 2).unwrap();
        assert!(config.select("a.b.c").unwrap() == 2);
    }

    #[test]
    fn test_read_only_leaf() {
        let mut config = Config::create(map(vec![
            ("a", Literal::from(1)),
            ("b", Literal::from(2)),
        ]))
        .unwrap();
        config.set_read_only("a", Some(true)).unwrap();
        assert!(config.node_at("a").unwrap().is_read_only());

        let err = config.mapping_mut().unwrap().set("a", 2).unwrap_err();
        assert!(matches!(err, ConfigError::ReadOnlyMutation { ref path, .. } if path.to_string() == "a"));
        assert_eq!(err.to_string(), "Cannot assign to read-only node a");
        assert!(matches!(config.update("a", 3), Err(ConfigError::ReadOnlyMutation { .. })));
        assert!(matches!(config.update("a.x", 3), Err(ConfigError::ReadOnlyMutation { .. })));
        assert!(config.select("a").unwrap() == 1);

        // siblings stay writable
        config.update("b", 5).unwrap();
        config.mapping_mut().unwrap().set("c", 6).unwrap();
        assert!(config.select("b").unwrap() == 5);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Config::create(map(vec![("a", Literal::from(1))])).unwrap();
        let mut copy = original.clone();
        copy.update("a", 2).unwrap();
        assert!(original.select("a").unwrap() == 1);
        assert!(copy.select("a").unwrap() == 2);
    }

    #[test]
    fn test_display() {
        let config = Config::create(vec![1, 2, 3]).unwrap();
        insta::assert_snapshot!(config.to_string(), @"[1, 2, 3]");
    }
}
