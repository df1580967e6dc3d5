//! YAML text to trees.

use crate::Result;
use treeconf::{Config, ConfigError, IntoLiteral, KeyPath, Literal};
use yaml_rust2::YamlLoader;

/// Parse YAML text into its structural literal form.
///
/// Only the first document is used. An empty input yields an empty mapping.
pub fn parse_literal(content: &str) -> Result<Literal> {
    let documents = YamlLoader::load_from_str(content)?;
    tracing::trace!(documents = documents.len(), "Loaded YAML");
    match documents.into_iter().next() {
        Some(document) => {
            let literal = document
                .into_literal()
                .map_err(|e| ConfigError::UnsupportedType {
                    path: KeyPath::root(),
                    type_name: e.type_name,
                })?;
            Ok(literal)
        }
        None => Ok(Literal::Mapping(Default::default())),
    }
}

/// Parse YAML text into a tree.
///
/// # Example
///
/// ```rust
/// use treeconf_yaml::parse;
///
/// let config = parse("title: My Document").unwrap();
/// assert!(config.select("title").unwrap() == "My Document");
/// ```
pub fn parse(content: &str) -> Result<Config> {
    Ok(Config::create(parse_literal(content)?)?)
}
