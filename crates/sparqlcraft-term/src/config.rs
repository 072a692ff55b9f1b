//! Rendering configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

pub const DEFAULT_SCHEMES: &[&str] = &["http://", "https://", "urn:", "mailto:", "file://", "tag:"];

/// Knobs shared by the converter, the pattern builder and the graph model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Scheme prefixes an absolute reference may start with.
    pub allowed_schemes: Vec<String>,
    /// Spaces of indentation for predicate lines in subject blocks.
    pub indent: usize,
    /// Reject nulls during conversion instead of rendering an empty literal.
    pub strict_nulls: bool,
    /// Label prefix of reification blank nodes (`_:<prefix><digest>`).
    pub reification_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            allowed_schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
            indent: 2,
            strict_nulls: false,
            reification_prefix: "rel_".to_string(),
        }
    }
}

impl RenderConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading render config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("parsing render config {}", path.display()))
    }

    pub fn indent_str(&self) -> String {
        " ".repeat(self.indent)
    }

    pub fn scheme_allowed(&self, reference: &str) -> bool {
        self.allowed_schemes
            .iter()
            .any(|scheme| reference.starts_with(scheme.as_str()))
    }
}
