//! # treeconf-yaml
//!
//! YAML text front end for [`treeconf`] trees.
//!
//! Parsing goes through `yaml-rust2`'s loader and the structural literal
//! form, so a parsed document is built by exactly the same rules as any
//! other literal source. Emitting writes block-style YAML.
//!
//! ## Example
//!
//! ```rust
//! use treeconf_yaml::{parse, to_yaml_string};
//!
//! let config = parse("items:\n  - a\n  - b\nname: ${items[0]}\n")?;
//! assert_eq!(config.select("name")?.as_str(), Some("a"));
//!
//! let text = to_yaml_string(&config)?;
//! assert_eq!(parse(&text)?, config);
//! # Ok::<(), treeconf_yaml::Error>(())
//! ```

mod emit;
mod error;
mod parse;

pub use emit::{literal_to_yaml, to_yaml_string};
pub use error::{Error, Result};
pub use parse::{parse, parse_literal};
