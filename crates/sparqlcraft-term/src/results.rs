//! SPARQL 1.1 JSON results documents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::coerce::{coerce, BindingValue, NativeValue};
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    #[serde(default)]
    pub bindings: Vec<BTreeMap<String, BindingValue>>,
}

/// A decoded SELECT or ASK response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub head: Head,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Bindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

impl ResultSet {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn vars(&self) -> &[String] {
        &self.head.vars
    }

    /// Raw binding rows; empty for ASK responses.
    pub fn rows(&self) -> &[BTreeMap<String, BindingValue>] {
        self.results
            .as_ref()
            .map(|r| r.bindings.as_slice())
            .unwrap_or(&[])
    }

    /// Every row with each bound value coerced. Unbound variables are absent.
    pub fn native_rows(&self) -> Vec<BTreeMap<String, NativeValue>> {
        self.rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(var, value)| (var.clone(), coerce(value)))
                    .collect()
            })
            .collect()
    }
}
