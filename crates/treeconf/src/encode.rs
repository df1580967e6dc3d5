//! Serialization bridge between trees and the structural literal form.
//!
//! Raw encoding is the inverse of building: interpolation strings stay as
//! written and missing leaves render as `null` / `"???"`. Resolved encoding
//! additionally replaces every interpolation by its value.

use crate::error::Result;
use crate::interpolation::resolved_literal;
use crate::literal::{IntoLiteral, Literal, Scalar};
use crate::node::{NodeData, NodeId, NodeRef, ValueState};
use crate::options::EncodeOptions;
use crate::tree::Config;
use indexmap::IndexMap;

impl Config {
    /// Encode the whole tree.
    pub fn encode(&self, options: EncodeOptions) -> Result<Literal> {
        self.root().encode(options)
    }

    /// Raw literal form of the tree.
    pub fn to_literal(&self) -> Literal {
        self.root().to_literal()
    }

    /// Literal form with every interpolation resolved.
    pub fn to_resolved_literal(&self) -> Result<Literal> {
        self.root().to_resolved_literal()
    }

    /// Decode a literal back into a tree; the inverse of [`Config::to_literal`].
    pub fn from_literal(literal: impl IntoLiteral) -> Result<Config> {
        Config::create(literal)
    }

    fn encode_raw(&self, id: NodeId) -> Literal {
        match &self.node(id).data {
            NodeData::Value(state) => state.to_literal(),
            NodeData::Mapping(entries) => Literal::Mapping(
                entries
                    .iter()
                    .map(|(key, &child)| (key.clone(), self.encode_raw(child)))
                    .collect(),
            ),
            NodeData::Sequence(items) => {
                Literal::Sequence(items.iter().map(|&child| self.encode_raw(child)).collect())
            }
        }
    }

    /// Resolved encoding of a subtree.
    ///
    /// Containers are pushed on `stack` while their children are encoded, so
    /// an interpolation that points back at an enclosing container is
    /// reported as a cycle instead of recursing forever.
    pub(crate) fn encode_resolved(&self, id: NodeId, stack: &mut Vec<NodeId>) -> Result<Literal> {
        match &self.node(id).data {
            NodeData::Value(ValueState::Present(Scalar::String(text))) if text.contains("${") => {
                let resolved = self.resolve_node(id, stack)?;
                resolved_literal(self, &resolved, stack)
            }
            NodeData::Value(state) => Ok(state.to_literal()),
            NodeData::Mapping(entries) => {
                self.enter(id, stack)?;
                let encoded = entries
                    .iter()
                    .map(|(key, &child)| Ok((key.clone(), self.encode_resolved(child, stack)?)))
                    .collect::<Result<IndexMap<_, _>>>()
                    .map(Literal::Mapping);
                stack.pop();
                encoded
            }
            NodeData::Sequence(items) => {
                self.enter(id, stack)?;
                let encoded = items
                    .iter()
                    .map(|&child| self.encode_resolved(child, stack))
                    .collect::<Result<Vec<_>>>()
                    .map(Literal::Sequence);
                stack.pop();
                encoded
            }
        }
    }
}

impl NodeRef<'_> {
    pub fn encode(&self, options: EncodeOptions) -> Result<Literal> {
        if options.resolve {
            self.to_resolved_literal()
        } else {
            Ok(self.to_literal())
        }
    }

    /// Raw literal form of this subtree.
    pub fn to_literal(&self) -> Literal {
        self.config.encode_raw(self.id)
    }

    /// Literal form of this subtree with interpolations resolved.
    pub fn to_resolved_literal(&self) -> Result<Literal> {
        self.config.encode_resolved(self.id, &mut Vec::new())
    }
}

impl PartialEq for Config {
    /// Value equality: resolved forms when both trees resolve, raw otherwise.
    fn eq(&self, other: &Self) -> bool {
        match (self.to_resolved_literal(), other.to_resolved_literal()) {
            (Ok(left), Ok(right)) => left == right,
            _ => self.to_literal() == other.to_literal(),
        }
    }
}

impl PartialEq<Literal> for Config {
    fn eq(&self, other: &Literal) -> bool {
        self.root().equals_literal(other)
    }
}
