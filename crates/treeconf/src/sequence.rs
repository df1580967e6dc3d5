//! Sequence nodes: dense, zero-indexed lists of child nodes.

use crate::error::{ConfigError, Result};
use crate::literal::{IntoLiteral, Literal, Scalar};
use crate::mapping::MappingMut;
use crate::node::{Item, NodeData, NodeId, NodeRef};
use crate::path::Key;
use crate::tree::Config;

/// Read handle on a sequence node.
#[derive(Debug, Clone, Copy)]
pub struct SequenceRef<'a> {
    node: NodeRef<'a>,
}

impl<'a> SequenceRef<'a> {
    pub(crate) fn new(node: NodeRef<'a>) -> Self {
        Self { node }
    }

    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    fn items(&self) -> &'a [NodeId] {
        match &self.node.config.node(self.node.id).data {
            NodeData::Sequence(items) => items,
            _ => unreachable!("SequenceRef always wraps a sequence node"),
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// The child node at `index`, unresolved.
    pub fn child(&self, index: usize) -> Option<NodeRef<'a>> {
        self.items()
            .get(index)
            .map(|&id| NodeRef::new(self.node.config, id))
    }

    fn checked_child(&self, index: usize) -> Result<NodeRef<'a>> {
        self.child(index).ok_or_else(|| ConfigError::Index {
            path: self.node.path(),
            index,
            len: self.len(),
        })
    }

    /// Read the element at `index`, resolving interpolations.
    pub fn get(&self, index: usize) -> Result<Item<'a>> {
        self.checked_child(index)?.value()
    }

    /// Read the element at `index`, returning `default` when it is missing
    /// or mandatory-missing. The index is still bounds-checked.
    pub fn get_or(&self, index: usize, default: impl Into<Scalar>) -> Result<Item<'a>> {
        let child = self.checked_child(index)?;
        if child.is_missing() {
            return Ok(Item::Value(default.into()));
        }
        child.value()
    }

    /// Resolved elements in index order.
    pub fn iter(&self) -> impl Iterator<Item = Result<Item<'a>>> + 'a {
        let config = self.node.config;
        self.items()
            .iter()
            .map(move |&id| NodeRef::new(config, id).value())
    }

    /// Unresolved element nodes in index order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let config = self.node.config;
        self.items().iter().map(move |&id| NodeRef::new(config, id))
    }

    /// Whether any element equals `value`, compared by resolved value.
    pub fn contains(&self, value: impl IntoLiteral) -> bool {
        let Ok(value) = value.into_literal() else {
            return false;
        };
        self.children().any(|child| child.equals_literal(&value))
    }
}

impl PartialEq<Literal> for SequenceRef<'_> {
    fn eq(&self, other: &Literal) -> bool {
        self.node.equals_literal(other)
    }
}

/// Mutable handle on a sequence node.
#[derive(Debug)]
pub struct SequenceMut<'a> {
    config: &'a mut Config,
    id: NodeId,
}

impl<'a> SequenceMut<'a> {
    pub(crate) fn new(config: &'a mut Config, id: NodeId) -> Self {
        Self { config, id }
    }

    pub fn as_ref(&self) -> SequenceRef<'_> {
        SequenceRef::new(NodeRef::new(self.config, self.id))
    }

    pub fn len(&self) -> usize {
        self.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn target(&self, index: usize) -> crate::path::KeyPath {
        self.config.path_of(self.id).child(Key::Index(index))
    }

    /// Replace the element at `index`.
    pub fn set(&mut self, index: usize, value: impl IntoLiteral) -> Result<()> {
        let literal = self.config.assignable(value, self.target(index))?;
        self.config.sequence_set(self.id, index, literal)
    }

    /// Insert before `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, value: impl IntoLiteral) -> Result<()> {
        let literal = self.config.assignable(value, self.target(index))?;
        self.config.sequence_insert(self.id, index, literal)
    }

    pub fn append(&mut self, value: impl IntoLiteral) -> Result<()> {
        let index = self.len();
        self.insert(index, value)
    }

    /// Remove the element at `index`, shifting later elements down.
    pub fn delete(&mut self, index: usize) -> Result<()> {
        self.config.sequence_remove(self.id, index).map(|_| ())
    }

    /// Remove and return the element at `index` (the last one for `None`).
    pub fn pop(&mut self, index: Option<usize>) -> Result<Literal> {
        let index = match index {
            Some(index) => index,
            None => match self.len().checked_sub(1) {
                Some(last) => last,
                None => {
                    return Err(ConfigError::Index {
                        path: self.config.path_of(self.id),
                        index: 0,
                        len: 0,
                    });
                }
            },
        };
        self.config.sequence_remove(self.id, index)
    }

    /// Remove every element.
    pub fn clear(&mut self) -> Result<()> {
        for index in 0..self.len() {
            let child = self.child_id(index)?;
            self.config.check_writable(child, "remove")?;
        }
        while !self.is_empty() {
            let last = self.len() - 1;
            self.config.sequence_remove(self.id, last)?;
        }
        Ok(())
    }

    /// Mutable handle on the mapping stored at `index`.
    pub fn mapping_mut(&mut self, index: usize) -> Result<MappingMut<'_>> {
        let id = self.child_id(index)?;
        self.config.mapping_mut_by_id(id)
    }

    /// Mutable handle on the sequence stored at `index`.
    pub fn sequence_mut(&mut self, index: usize) -> Result<SequenceMut<'_>> {
        let id = self.child_id(index)?;
        self.config.sequence_mut_by_id(id)
    }

    fn child_id(&self, index: usize) -> Result<NodeId> {
        self.as_ref().checked_child(index).map(|node| node.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn test_get_bounds_checked() {
        let config = Config::create(vec![1, 2]).unwrap();
        let seq = config.as_sequence().unwrap();
        assert!(seq.get(1).unwrap() == 2);
        assert!(matches!(
            seq.get(2),
            Err(ConfigError::Index { index: 2, len: 2, .. })
        ));
        assert!(seq.get_or(5, "d").is_err());
    }

    #[test]
    fn test_insert_reindexes() {
        let mut config = Config::create(vec!["a", "c"]).unwrap();
        config.sequence_mut().unwrap().insert(1, "b").unwrap();
        let paths: Vec<String> = config
            .as_sequence()
            .unwrap()
            .children()
            .map(|c| c.path().to_string())
            .collect();
        assert_eq!(paths, vec!["[0]", "[1]", "[2]"]);
        assert!(config.root().equals_literal(&Literal::sequence(["a", "b", "c"])));
        assert!(config.sequence_mut().unwrap().insert(9, "x").is_err());
    }

    #[test]
    fn test_delete_reindexes() {
        let mut config = Config::create(vec![1, 2, 3]).unwrap();
        config.sequence_mut().unwrap().delete(0).unwrap();
        let seq = config.as_sequence().unwrap();
        assert_eq!(seq.child(1).unwrap().path().to_string(), "[1]");
        assert!(seq.get(1).unwrap() == 3);
    }

    #[test]
    fn test_pop_empty() {
        let mut config = Config::create(Vec::<i64>::new()).unwrap();
        let err = config.sequence_mut().unwrap().pop(None).unwrap_err();
        assert!(matches!(err, ConfigError::Index { len: 0, .. }));
        assert!(config.sequence_mut().unwrap().pop(Some(0)).is_err());
    }

    #[test]
    fn test_pop_resolves_before_detaching() {
        let mut config = Config::create(Literal::mapping([
            ("x", Literal::from(5)),
            ("xs", Literal::sequence(["${x}"])),
        ]))
        .unwrap();
        let popped = config
            .sequence_mut_at("xs")
            .unwrap()
            .pop(None)
            .unwrap();
        assert_eq!(popped, Literal::Int(5));
    }

    #[test]
    fn test_clear() {
        let mut config = Config::create(vec![1, 2, 3]).unwrap();
        let before = config.node_count();
        config.sequence_mut().unwrap().clear().unwrap();
        assert!(config.is_empty());
        assert_eq!(config.node_count(), before - 3);
    }

    #[test]
    fn test_nested_sequence_mut() {
        let mut config = Config::create(Literal::sequence([
            Literal::sequence([1]),
            Literal::mapping([("k", 1)]),
        ]))
        .unwrap();
        {
            let mut root = config.sequence_mut().unwrap();
            root.sequence_mut(0).unwrap().append(2).unwrap();
            root.mapping_mut(1).unwrap().set("j", 2).unwrap();
            assert!(root.mapping_mut(0).is_err());
        }
        assert_eq!(
            config.select("[1]").unwrap().kind(),
            NodeKind::Mapping
        );
        assert!(config.select("[0][1]").unwrap() == 2);
        assert!(config.select("[1].j").unwrap() == 2);
    }
}
