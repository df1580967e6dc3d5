//! Lazy interpolation between nodes.
//!
//! A value node whose string contains `${path}` takes its value from the
//! node at `path` every time it is read; nothing is cached and the raw string
//! is never rewritten. Syntax:
//!
//! - `${a.b[0]}`: absolute path from the root
//! - `${.sibling}`, `${..uncle}`: relative to the referencing node's parent,
//!   one more level up per extra leading dot
//! - `${name/uppercase}`: pipes applied to the resolved value
//!   (`uppercase`, `lowercase`, `trim`, `length`)
//! - `\${`: a literal `${`
//!
//! A string that is exactly one reference without pipes takes the target's
//! type (and may name a container). Anything else renders to a string.

use crate::error::{ConfigError, Result};
use crate::literal::{Literal, Scalar};
use crate::mapping::MappingRef;
use crate::node::{Item, NodeData, NodeId, NodeRef, ValueState};
use crate::path::PathExpr;
use crate::sequence::SequenceRef;
use crate::tree::Config;
use std::fmt;

/// True when `text` holds at least one unescaped `${`.
pub fn is_interpolation(text: &str) -> bool {
    let mut rest = text;
    while let Some(pos) = rest.find("${") {
        if !rest[..pos].ends_with('\\') {
            return true;
        }
        rest = &rest[pos + 2..];
    }
    false
}

/// A pipe applied to a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Uppercase,
    Lowercase,
    Trim,
    /// Character count of a string, child count of a container.
    Length,
}

impl Transform {
    pub fn from_name(name: &str) -> Option<Transform> {
        match name {
            "uppercase" => Some(Transform::Uppercase),
            "lowercase" => Some(Transform::Lowercase),
            "trim" => Some(Transform::Trim),
            "length" => Some(Transform::Length),
            _ => None,
        }
    }

    fn apply(self, value: Resolved, config: &Config, stack: &mut Vec<NodeId>) -> Result<Scalar> {
        if let (Transform::Length, Resolved::Node(id)) = (self, &value) {
            return Ok(Scalar::Int(NodeRef::new(config, *id).len() as i64));
        }
        let text = config.render(&value, stack)?;
        Ok(match self {
            Transform::Uppercase => Scalar::String(text.to_uppercase()),
            Transform::Lowercase => Scalar::String(text.to_lowercase()),
            Transform::Trim => Scalar::String(text.trim().to_string()),
            Transform::Length => Scalar::Int(text.chars().count() as i64),
        })
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transform::Uppercase => "uppercase",
            Transform::Lowercase => "lowercase",
            Transform::Trim => "trim",
            Transform::Length => "length",
        })
    }
}

/// One `${...}` occurrence.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reference {
    pub(crate) path: PathExpr,
    pub(crate) transforms: Vec<Transform>,
    /// The text between the braces, for error messages.
    pub(crate) source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment {
    Text(String),
    Reference(Reference),
}

fn syntax_error(expression: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InterpolationSyntax {
        expression: expression.to_string(),
        message: message.into(),
    }
}

/// Split an interpolation string into literal text and references.
pub(crate) fn parse_segments(text: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;
    while let Some(pos) = rest.find("${") {
        if rest[..pos].ends_with('\\') {
            literal.push_str(&rest[..pos - 1]);
            literal.push_str("${");
            rest = &rest[pos + 2..];
            continue;
        }
        literal.push_str(&rest[..pos]);
        let body = &rest[pos + 2..];
        let Some(end) = body.find('}') else {
            return Err(syntax_error(text, "unterminated '${'"));
        };
        if !literal.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Reference(parse_reference(&body[..end])?));
        rest = &body[end + 1..];
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Text(literal));
    }
    Ok(segments)
}

fn parse_reference(body: &str) -> Result<Reference> {
    let mut parts = split_pipes(body).into_iter();
    let path_text = parts.next().unwrap_or_default().trim();
    let path = PathExpr::parse(path_text)?;
    let transforms = parts
        .map(|name| {
            let name = name.trim();
            Transform::from_name(name)
                .ok_or_else(|| syntax_error(body, format!("unknown transform '{name}'")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Reference {
        path,
        transforms,
        source: body.to_string(),
    })
}

/// Split on `/` outside of brackets, so `a['x/y']/trim` keeps its key.
fn split_pipes(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Outcome of resolving a node: a scalar, or a container to read through.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolved {
    Scalar(Scalar),
    Node(NodeId),
}

impl Config {
    pub(crate) fn resolve_item(&self, id: NodeId) -> Result<Item<'_>> {
        Ok(match self.resolve_node(id, &mut Vec::new())? {
            Resolved::Scalar(scalar) => Item::Value(scalar),
            Resolved::Node(target) => self.container_item(target),
        })
    }

    fn container_item(&self, id: NodeId) -> Item<'_> {
        let node = NodeRef::new(self, id);
        match self.node(id).data {
            NodeData::Sequence(_) => Item::Sequence(SequenceRef::new(node)),
            _ => Item::Mapping(MappingRef::new(node)),
        }
    }

    /// The container a value node points at, or the node itself.
    pub(crate) fn follow(&self, id: NodeId, stack: &mut Vec<NodeId>) -> Result<NodeId> {
        match self.resolve_node(id, stack)? {
            Resolved::Node(target) => Ok(target),
            Resolved::Scalar(_) => Ok(id),
        }
    }

    /// Resolve a node with `stack` holding the nodes currently being
    /// resolved (or encoded) further up the call chain.
    pub(crate) fn resolve_node(&self, id: NodeId, stack: &mut Vec<NodeId>) -> Result<Resolved> {
        match &self.node(id).data {
            NodeData::Mapping(_) | NodeData::Sequence(_) => Ok(Resolved::Node(id)),
            NodeData::Value(ValueState::Missing) => Err(ConfigError::MissingValue {
                path: self.path_of(id),
                mandatory: false,
            }),
            NodeData::Value(ValueState::MandatoryMissing) => Err(ConfigError::MissingValue {
                path: self.path_of(id),
                mandatory: true,
            }),
            NodeData::Value(ValueState::Present(Scalar::String(text))) if text.contains("${") => {
                self.enter(id, stack)?;
                let resolved = self.resolve_string(id, text, stack);
                stack.pop();
                resolved
            }
            NodeData::Value(ValueState::Present(scalar)) => Ok(Resolved::Scalar(scalar.clone())),
        }
    }

    /// Push `id` on the resolution stack, rejecting cycles and runaway chains.
    pub(crate) fn enter(&self, id: NodeId, stack: &mut Vec<NodeId>) -> Result<()> {
        if let Some(start) = stack.iter().position(|&visited| visited == id) {
            let chain = stack[start..]
                .iter()
                .chain(std::iter::once(&id))
                .map(|&node| self.path_of(node))
                .collect();
            return Err(ConfigError::InterpolationCycle {
                path: self.path_of(id),
                chain,
            });
        }
        if stack.len() >= self.options().max_depth {
            return Err(ConfigError::NestingTooDeep {
                max_depth: self.options().max_depth,
                path: self.path_of(id),
            });
        }
        stack.push(id);
        Ok(())
    }

    fn resolve_string(&self, id: NodeId, text: &str, stack: &mut Vec<NodeId>) -> Result<Resolved> {
        let segments = parse_segments(text)?;
        tracing::trace!(path = %self.path_of(id), expression = text, "Resolving interpolation");

        if let [Segment::Reference(reference)] = segments.as_slice() {
            let target = self.resolve_reference(id, reference, stack)?;
            return self.apply_transforms(target, &reference.transforms, stack);
        }

        let mut out = String::new();
        for segment in &segments {
            match segment {
                Segment::Text(literal) => out.push_str(literal),
                Segment::Reference(reference) => {
                    let target = self.resolve_reference(id, reference, stack)?;
                    let value = self.apply_transforms(target, &reference.transforms, stack)?;
                    out.push_str(&self.render(&value, stack)?);
                }
            }
        }
        Ok(Resolved::Scalar(Scalar::String(out)))
    }

    fn apply_transforms(
        &self,
        value: Resolved,
        transforms: &[Transform],
        stack: &mut Vec<NodeId>,
    ) -> Result<Resolved> {
        let mut value = value;
        for transform in transforms {
            value = Resolved::Scalar(transform.apply(value, self, stack)?);
        }
        Ok(value)
    }

    /// String form of a resolved value inside surrounding text.
    fn render(&self, value: &Resolved, stack: &mut Vec<NodeId>) -> Result<String> {
        match value {
            Resolved::Scalar(scalar) => Ok(scalar.to_string()),
            Resolved::Node(id) => Ok(self.encode_resolved(*id, stack)?.to_string()),
        }
    }

    /// Locate the target of a reference made from node `origin`.
    fn resolve_reference(
        &self,
        origin: NodeId,
        reference: &Reference,
        stack: &mut Vec<NodeId>,
    ) -> Result<Resolved> {
        let key_error = |message: String| ConfigError::InterpolationKey {
            path: self.path_of(origin),
            expression: reference.source.clone(),
            message,
        };

        let mut current = if reference.path.is_relative() {
            let mut current = origin;
            for _ in 0..reference.path.up {
                current = self
                    .node(current)
                    .parent
                    .ok_or_else(|| key_error("relative path climbs above the root".to_string()))?;
            }
            current
        } else {
            self.root_id()
        };

        for step in &reference.path.steps {
            current = self.step_into(current, step, stack).map_err(|e| match e {
                ConfigError::MissingKey { .. }
                | ConfigError::Index { .. }
                | ConfigError::UnsupportedOperation { .. } => key_error(e.to_string()),
                other => other,
            })?;
        }
        self.resolve_node(current, stack)
    }
}

/// Escape every `${` so that `text` builds a plain string node again.
pub(crate) fn escape(text: &str) -> String {
    text.replace("${", "\\${")
}

/// Resolved literal of a value read, used where callers need owned data.
///
/// The literal may be built into a tree again, so resolved strings are
/// escaped rather than turned back into live references.
pub(crate) fn resolved_literal(config: &Config, value: &Resolved, stack: &mut Vec<NodeId>) -> Result<Literal> {
    match value {
        Resolved::Scalar(Scalar::String(text)) if text.contains("${") => {
            Ok(Literal::String(escape(text)))
        }
        Resolved::Scalar(scalar) => Ok(scalar.clone().into_literal()),
        Resolved::Node(id) => config.encode_resolved(*id, stack),
    }
}
