//! Hierarchical configuration trees.
//!
//! This crate provides a mutable tree of mapping and sequence nodes holding
//! typed scalar leaves, built from heterogeneous literal sources, with lazy
//! interpolation between nodes and deep merging of overlay trees.
//!
//! # Key Features
//!
//! - **Closed literal input**: anything implementing [`IntoLiteral`]
//!   (scalars, vectors, index maps, [`Literal`], `yaml_rust2::Yaml`, and any
//!   serde format through [`Literal`]'s `Deserialize` impl) builds a tree
//! - **Missing values**: `null` leaves are *missing*, `"???"` leaves are
//!   *mandatory missing*; both fail reads unless a default is given
//! - **Interpolation**: `${a.b[0]}`, relative `${.sibling}`, pipes such as
//!   `${name/uppercase}`, resolved on every read and never cached
//! - **Merging**: key-wise for mappings, wholesale for everything else,
//!   respecting read-only subtrees
//! - **Atomic failures**: a failed mutation or merge leaves the tree as it was
//!
//! # Architecture
//!
//! - [`Config`]: owns every node of a tree in an arena; nodes refer to their
//!   parent by [`NodeId`], never by ownership
//! - [`NodeRef`], [`MappingRef`], [`SequenceRef`]: borrowed read handles
//! - [`MappingMut`], [`SequenceMut`]: borrowed mutation handles
//! - [`Item`]: the resolved value of a read
//!
//! # Example
//!
//! ```rust
//! use treeconf::{Config, Literal, merge};
//!
//! let base = Config::create(Literal::mapping([
//!     ("host", Literal::from("localhost")),
//!     ("url", Literal::from("http://${host}:${port}")),
//!     ("port", Literal::from(80)),
//! ]))?;
//! let overlay = Config::create(Literal::mapping([("port", 8080)]))?;
//!
//! let merged = merge(&base, &[&overlay])?;
//! assert_eq!(merged.select("url")?.as_str(), Some("http://localhost:8080"));
//! # Ok::<(), treeconf::ConfigError>(())
//! ```

mod encode;
mod error;
mod interpolation;
mod literal;
mod mapping;
mod merge;
mod node;
mod options;
mod path;
mod sequence;
mod tree;

pub use error::{ConfigError, Result};
pub use interpolation::{Transform, is_interpolation};
pub use literal::{IntoLiteral, Literal, MISSING, Scalar, UnsupportedLiteral};
pub use mapping::{MappingMut, MappingRef};
pub use merge::merge;
pub use node::{Item, NodeId, NodeKind, NodeRef, ValueState};
pub use options::{ConfigOptions, EncodeOptions};
pub use path::{Key, KeyPath, PathExpr};
pub use sequence::{SequenceMut, SequenceRef};
pub use tree::Config;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_config_is_send_sync() {
        assert_send_sync::<Config>();
        assert_send_sync::<Literal>();
        assert_send_sync::<ConfigError>();
    }
}
