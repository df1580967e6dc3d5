//! Deep merge of overlay trees onto a destination tree.
//!
//! Overlays apply left to right, later overlays taking precedence:
//!
//! - mapping onto mapping merges key-wise, recursively
//! - anything else (scalar onto scalar, sequence onto sequence, any change
//!   of node kind) replaces the destination node wholesale
//! - an overlay `"???"` never clobbers a value the destination already has
//!
//! Overlay content is copied as resolved literals (a leaf whose
//! interpolation cannot be resolved within its overlay is copied raw and
//! resolves against the merged tree). The result shares no node with any
//! input.

use crate::error::{ConfigError, Result};
use crate::literal::Literal;
use crate::node::{NodeId, NodeKind, NodeRef, ValueState};
use crate::path::Key;
use crate::tree::Config;

/// Merge `overlays` onto a copy of `destination`.
///
/// Fails with `ReadOnlyMerge` when an overlay would change a read-only
/// subtree of the destination; the inputs are never modified.
pub fn merge(destination: &Config, overlays: &[&Config]) -> Result<Config> {
    let mut result = destination.clone();
    tracing::debug!(overlays = overlays.len(), "Merging configs");
    for (index, overlay) in overlays.iter().enumerate() {
        let root = result.root_id();
        result.merge_node(root, overlay.root())?;
        tracing::debug!(overlay = index, "Applied overlay");
    }
    Ok(result)
}

impl Config {
    /// Merge `overlays` into this tree in place.
    ///
    /// On failure the tree is left exactly as it was.
    pub fn merge_from(&mut self, overlays: &[&Config]) -> Result<()> {
        *self = merge(self, overlays)?;
        Ok(())
    }

    fn merge_node(&mut self, dest: NodeId, overlay: NodeRef<'_>) -> Result<()> {
        if overlay.raw_value() == Some(&ValueState::MandatoryMissing)
            && !NodeRef::new(self, dest).is_missing()
        {
            return Ok(());
        }

        match (self.node(dest).data.kind(), overlay.kind()) {
            (NodeKind::Mapping, NodeKind::Mapping) => {
                let entries = overlay
                    .as_mapping()
                    .map(|mapping| mapping.children().collect::<Vec<_>>())
                    .unwrap_or_default();
                for (key, child) in entries {
                    match self.child(dest, &Key::Name(key.to_string())) {
                        Some(existing) => self.merge_node(existing, child)?,
                        None => {
                            self.check_mergeable(dest)?;
                            let literal = overlay_literal(child);
                            let target = self.path_of(dest).child(Key::Name(key.to_string()));
                            self.check_depth(&literal, &target)?;
                            self.mapping_set(dest, key.to_string(), literal)?;
                        }
                    }
                }
                Ok(())
            }
            _ => self.replace_node(dest, overlay_literal(overlay)),
        }
    }

    fn replace_node(&mut self, dest: NodeId, literal: Literal) -> Result<()> {
        if NodeRef::new(self, dest).to_literal() == literal {
            return Ok(());
        }
        self.check_mergeable(dest)?;
        let path = self.path_of(dest);
        self.check_depth(&literal, &path)?;
        if literal.is_container() || self.node(dest).data.kind() != NodeKind::Value {
            tracing::debug!(path = %path, "Replacing node wholesale");
        } else {
            tracing::trace!(path = %path, "Replacing value");
        }
        self.replace_content(dest, literal);
        Ok(())
    }

    fn check_mergeable(&self, id: NodeId) -> Result<()> {
        if self.is_read_only(id) {
            return Err(ConfigError::ReadOnlyMerge {
                path: self.path_of(id),
            });
        }
        Ok(())
    }
}

/// Copy of an overlay subtree with interpolations resolved where the
/// overlay can resolve them.
fn overlay_literal(node: NodeRef<'_>) -> Literal {
    if let Some(mapping) = node.as_mapping() {
        return Literal::Mapping(
            mapping
                .children()
                .map(|(key, child)| (key.to_string(), overlay_literal(child)))
                .collect(),
        );
    }
    if let Some(sequence) = node.as_sequence() {
        return Literal::Sequence(sequence.children().map(overlay_literal).collect());
    }
    if node.is_interpolation() {
        return node
            .to_resolved_literal()
            .unwrap_or_else(|_| node.to_literal());
    }
    node.to_literal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> Config {
        let literal: Literal = serde_json::from_value(value).unwrap();
        Config::create(literal).unwrap()
    }

    fn literal(value: serde_json::Value) -> Literal {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_overlay_precedence() {
        let merged = merge(&config(json!({"a": 1, "b": 3})), &[&config(json!({"a": 2}))]).unwrap();
        assert!(merged == literal(json!({"a": 2, "b": 3})));
    }

    #[test]
    fn test_key_order() {
        let merged = merge(
            &config(json!({"b": 1, "a": 1})),
            &[&config(json!({"c": 2, "a": 2}))],
        )
        .unwrap();
        let keys: Vec<&str> = merged.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sequences_replace_wholesale() {
        let merged = merge(
            &config(json!({"xs": [1, 2, 3]})),
            &[&config(json!({"xs": [9]}))],
        )
        .unwrap();
        assert!(merged == literal(json!({"xs": [9]})));
    }

    #[test]
    fn test_type_change_replaces() {
        let dest = config(json!({"a": {"x": 1}, "b": [1], "c": 1}));
        let overlay = config(json!({"a": "scalar", "b": {"k": "v"}, "c": [1, 2]}));
        let merged = merge(&dest, &[&overlay]).unwrap();
        assert!(merged == literal(json!({"a": "scalar", "b": {"k": "v"}, "c": [1, 2]})));
        assert_eq!(merged.node_at("b").unwrap().kind(), NodeKind::Mapping);
    }

    #[test]
    fn test_deep_merge_and_multiple_overlays() {
        let merged = merge(
            &config(json!({"db": {"host": "localhost", "port": 5432}})),
            &[
                &config(json!({"db": {"port": 6543}})),
                &config(json!({"db": {"user": "admin"}, "debug": true})),
            ],
        )
        .unwrap();
        assert!(
            merged
                == literal(json!({
                    "db": {"host": "localhost", "port": 6543, "user": "admin"},
                    "debug": true
                }))
        );
    }

    #[test]
    fn test_missing_values() {
        let dest = config(json!({"a": "???", "b": 1, "c": null}));
        let overlay = config(json!({"a": 1, "b": "???", "c": "set"}));
        let merged = merge(&dest, &[&overlay]).unwrap();
        assert!(merged == literal(json!({"a": 1, "b": 1, "c": "set"})));

        // an explicit null does replace a value
        let merged = merge(&merged, &[&config(json!({"b": null}))]).unwrap();
        assert!(merged.is_missing("b").unwrap());
    }

    #[test]
    fn test_inputs_untouched() {
        let dest = config(json!({"a": {"x": 1}}));
        let overlay = config(json!({"a": {"y": 2}}));
        let mut merged = merge(&dest, &[&overlay]).unwrap();
        merged.update("a.y", 3).unwrap();
        assert!(dest == literal(json!({"a": {"x": 1}})));
        assert!(overlay == literal(json!({"a": {"y": 2}})));
    }

    #[test]
    fn test_overlay_interpolations() {
        let dest = config(json!({"name": "dest", "x": 1}));
        let overlay = config(json!({"name": "overlay", "greeting": "hi ${name}", "y": "${x}"}));
        let merged = merge(&dest, &[&overlay]).unwrap();
        // resolvable within the overlay: copied resolved
        assert!(merged.select("greeting").unwrap() == "hi overlay");
        // dangling in the overlay: copied raw, resolves in the result
        assert!(merged.node_at("y").unwrap().is_interpolation());
        assert!(merged.select("y").unwrap() == 1);
    }

    #[test]
    fn test_overlay_escaped_interpolations() {
        let dest = config(json!({"x": 1}));
        let overlay = config(json!({"lit": "\\${nope}", "b": "${lit}", "c": "x=\\${x}"}));
        assert!(overlay.select("b").unwrap() == "${nope}");

        let merged = merge(&dest, &[&overlay]).unwrap();
        assert!(merged.select("lit").unwrap() == "${nope}");
        assert!(merged.select("b").unwrap() == "${nope}");
        assert!(merged.select("c").unwrap() == "x=${x}");
        assert!(!merged.node_at("b").unwrap().is_interpolation());
    }

    #[test]
    fn test_read_only_value_merge() {
        let mut dest = config(json!({"a": 1, "b": 1}));
        dest.set_read_only("a", Some(true)).unwrap();
        let err = merge(&dest, &[&config(json!({"a": 2}))]).unwrap_err();
        assert!(matches!(err, ConfigError::ReadOnlyMerge { ref path } if path.to_string() == "a"));
        let merged = merge(&dest, &[&config(json!({"a": 1, "b": 2}))]).unwrap();
        assert!(merged.select("b").unwrap() == 2);
    }

    #[test]
    fn test_read_only_merge() {
        let mut dest = config(json!({"locked": {"a": 1}, "open": 1}));
        dest.set_read_only("locked", Some(true)).unwrap();

        let err = merge(&dest, &[&config(json!({"locked": {"a": 2}}))]).unwrap_err();
        assert!(matches!(err, ConfigError::ReadOnlyMerge { ref path } if path.to_string() == "locked.a"));
        let err = merge(&dest, &[&config(json!({"locked": {"b": 2}}))]).unwrap_err();
        assert!(matches!(err, ConfigError::ReadOnlyMerge { ref path } if path.to_string() == "locked"));

        // identical content and unrelated keys are fine
        let merged = merge(&dest, &[&config(json!({"locked": {"a": 1}, "open": 2}))]).unwrap();
        assert!(merged.select("open").unwrap() == 2);
        assert!(merged.node_at("locked").unwrap().is_read_only());
    }

    #[test]
    fn test_merge_from_is_atomic() {
        let mut dest = config(json!({"a": 1, "locked": {"x": 1}}));
        dest.set_read_only("locked", Some(true)).unwrap();
        let before = dest.clone();
        let result = dest.merge_from(&[&config(json!({"a": 2, "locked": {"x": 2}}))]);
        assert!(matches!(result, Err(ConfigError::ReadOnlyMerge { .. })));
        assert!(dest == before);
        assert!(dest.select("a").unwrap() == 1);

        dest.merge_from(&[&config(json!({"a": 3}))]).unwrap();
        assert!(dest.select("a").unwrap() == 3);
    }

    #[test]
    fn test_root_kind_change() {
        let merged = merge(&config(json!({"a": 1})), &[&config(json!([1, 2]))]).unwrap();
        assert_eq!(merged.kind(), NodeKind::Sequence);
        assert_eq!(merged.to_string(), "[1, 2]");
    }
}
