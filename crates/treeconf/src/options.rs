//! Tunables for tree construction and encoding.

/// Options a tree is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOptions {
    /// Maximum nesting depth (default: 256).
    ///
    /// Building, assigning, encoding and interpolation chains fail with
    /// `ConfigError::NestingTooDeep` beyond this depth.
    pub max_depth: usize,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// Options for encoding a tree back to its literal form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Replace interpolation strings by their resolved values.
    ///
    /// Missing and mandatory-missing leaves keep their literal tokens either
    /// way.
    pub resolve: bool,
}

impl EncodeOptions {
    pub fn raw() -> Self {
        Self { resolve: false }
    }

    pub fn resolved() -> Self {
        Self { resolve: true }
    }
}
