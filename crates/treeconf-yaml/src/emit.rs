//! Trees to block-style YAML text.

use crate::Result;
use treeconf::{Config, EncodeOptions, Literal};
use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter};

/// Convert a literal into a `yaml-rust2` document node.
pub fn literal_to_yaml(literal: &Literal) -> Yaml {
    match literal {
        Literal::Null => Yaml::Null,
        Literal::Bool(b) => Yaml::Boolean(*b),
        Literal::Int(i) => Yaml::Integer(*i),
        Literal::Float(x) => Yaml::Real(format_real(*x)),
        Literal::String(s) => Yaml::String(s.clone()),
        Literal::Sequence(items) => Yaml::Array(items.iter().map(literal_to_yaml).collect()),
        Literal::Mapping(entries) => {
            let mut hash = Hash::new();
            for (key, value) in entries {
                hash.insert(Yaml::String(key.clone()), literal_to_yaml(value));
            }
            Yaml::Hash(hash)
        }
    }
}

fn format_real(x: f64) -> String {
    if x.is_nan() {
        ".nan".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { ".inf" } else { "-.inf" }.to_string()
    } else {
        format!("{:?}", x)
    }
}

/// Render a tree as block-style YAML.
///
/// The raw tree is written: interpolation strings stay unresolved and
/// missing leaves render as `~` and `"???"`, so parsing the output yields an
/// equal tree.
///
/// # Example
///
/// ```rust
/// use treeconf::{Config, Literal};
/// use treeconf_yaml::to_yaml_string;
///
/// let config = Config::create(vec![1, 2]).unwrap();
/// assert_eq!(to_yaml_string(&config).unwrap(), "- 1\n- 2\n");
/// ```
pub fn to_yaml_string(config: &Config) -> Result<String> {
    let literal = config.encode(EncodeOptions::raw())?;
    let mut out = String::new();
    YamlEmitter::new(&mut out).dump(&literal_to_yaml(&literal))?;
    tracing::trace!(bytes = out.len(), "Emitted YAML");
    let body = out.strip_prefix("---\n").unwrap_or(&out);
    Ok(format!("{body}\n"))
}
