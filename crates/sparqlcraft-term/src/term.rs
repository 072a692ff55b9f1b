//! Already-safe term text and the validating constructors that produce it.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::escape::{escape_string_literal, Quote};
use crate::vocab::xsd;

/// Largest magnitude at which every integer is exactly representable in `f64`.
pub(crate) const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

const IRI_FORBIDDEN: &[char] = &['<', '>', '"', '{', '}', '|', '^', '`', '\\', ' '];

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

fn local_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]([A-Za-z0-9_.\-]*[A-Za-z0-9_\-])?$").unwrap())
}

fn blank_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_\-]*$").unwrap())
}

fn lang_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]+(-[A-Za-z0-9]+)*$").unwrap())
}

/// Check a variable or prefix name against `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> Result<()> {
    if identifier_re().is_match(name) {
        Ok(())
    } else {
        Err(Error::validation(
            name,
            "identifier must match [A-Za-z_][A-Za-z0-9_]*",
        ))
    }
}

/// Check an absolute reference (without angle brackets).
pub fn validate_iri(reference: &str, config: &RenderConfig) -> Result<()> {
    if !config.scheme_allowed(reference) {
        return Err(Error::validation(
            reference,
            format!(
                "absolute reference must start with one of: {}",
                config.allowed_schemes.join(", ")
            ),
        ));
    }
    if let Some(bad) = reference
        .chars()
        .find(|c| IRI_FORBIDDEN.contains(c) || c.is_control())
    {
        return Err(Error::validation(
            reference,
            format!("absolute reference must not contain {bad:?}"),
        ));
    }
    Ok(())
}

/// Final, injection-safe term text.
///
/// A `Term` is inserted verbatim wherever it is used and never escaped again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Term(String);

impl Term {
    /// Wrap text the caller guarantees is already valid term/pattern text.
    ///
    /// No validation happens here; prefer the typed constructors.
    pub fn raw(text: impl Into<String>) -> Self {
        Term(text.into())
    }

    /// `<reference>` validated against the default scheme list.
    pub fn iri(reference: &str) -> Result<Self> {
        Self::iri_with(reference, &RenderConfig::default())
    }

    pub fn iri_with(reference: &str, config: &RenderConfig) -> Result<Self> {
        let inner = reference
            .strip_prefix('<')
            .and_then(|r| r.strip_suffix('>'))
            .unwrap_or(reference);
        validate_iri(inner, config)?;
        Ok(Term(format!("<{inner}>")))
    }

    /// `?name`; a leading `?` or `$` on the input is accepted and dropped.
    pub fn var(name: &str) -> Result<Self> {
        let bare = name
            .strip_prefix('?')
            .or_else(|| name.strip_prefix('$'))
            .unwrap_or(name);
        validate_identifier(bare)?;
        Ok(Term(format!("?{bare}")))
    }

    /// `_:label`; a leading `_:` on the input is accepted.
    pub fn blank(label: &str) -> Result<Self> {
        let bare = label.strip_prefix("_:").unwrap_or(label);
        if !blank_label_re().is_match(bare) {
            return Err(Error::validation(
                label,
                "blank node label must match [A-Za-z0-9_][A-Za-z0-9_-]*",
            ));
        }
        Ok(Term(format!("_:{bare}")))
    }

    /// `prefix:local`. An empty prefix yields the default-namespace form `:local`.
    pub fn prefixed(prefix: &str, local: &str) -> Result<Self> {
        if !prefix.is_empty() {
            validate_identifier(prefix)?;
        }
        if !local_name_re().is_match(local) {
            return Err(Error::validation(
                local,
                "local name must be alphanumerics, '_', '-' or inner '.'",
            ));
        }
        Ok(Term(format!("{prefix}:{local}")))
    }

    /// Split `prefix:local` at the first colon and validate both halves.
    pub fn curie(text: &str) -> Result<Self> {
        match text.split_once(':') {
            Some((prefix, local)) => Self::prefixed(prefix, local),
            None => Err(Error::validation(text, "prefixed name needs a ':' separator")),
        }
    }

    pub fn reference(text: &str) -> Result<Self> {
        Self::reference_with(text, &RenderConfig::default())
    }

    /// Any reference-like term: `<iri>`, an absolute reference with an
    /// approved scheme, `?var`, `$var`, `_:blank`, the keyword `a`, or a
    /// prefixed name.
    pub fn reference_with(text: &str, config: &RenderConfig) -> Result<Self> {
        let text = text.trim();
        if text == "a" {
            return Ok(Term("a".to_string()));
        }
        if text.starts_with('<') || config.scheme_allowed(text) {
            return Self::iri_with(text, config);
        }
        if text.starts_with('?') || text.starts_with('$') {
            return Self::var(text);
        }
        if text.starts_with("_:") {
            return Self::blank(text);
        }
        if text.contains(':') {
            return Self::curie(text);
        }
        Err(Error::validation(
            text,
            "expected <iri>, prefix:local, ?variable, _:blank or 'a'",
        ))
    }

    pub fn predicate(key: &str) -> Result<Self> {
        Self::predicate_with(key, &RenderConfig::default())
    }

    /// Predicate for a record/property key.
    ///
    /// Keys without a namespace separator that are not absolute references
    /// become local names in the default namespace (`name` → `:name`).
    pub fn predicate_with(key: &str, config: &RenderConfig) -> Result<Self> {
        let key = key.trim();
        if key == "a"
            || key.starts_with('<')
            || key.starts_with('?')
            || key.starts_with('$')
            || key.contains(':')
        {
            return Self::reference_with(key, config);
        }
        validate_identifier(key)?;
        Ok(Term(format!(":{key}")))
    }

    /// `"""escaped"""^^datatype`; `datatype` may be `<iri>`, an absolute
    /// reference or a prefixed name.
    pub fn typed_literal(text: &str, datatype: &str) -> Result<Self> {
        let dt = Self::reference(datatype)?;
        if dt.is_variable() || dt.0.starts_with("_:") || dt.0 == "a" {
            return Err(Error::validation(datatype, "datatype must be an IRI"));
        }
        Ok(Term(format!(
            "\"\"\"{}\"\"\"^^{}",
            escape_string_literal(text, Quote::Double),
            dt
        )))
    }

    /// `"""escaped"""@tag`
    pub fn lang_literal(text: &str, tag: &str) -> Result<Self> {
        if !lang_tag_re().is_match(tag) {
            return Err(Error::validation(tag, "language tag must match [A-Za-z]+(-[A-Za-z0-9]+)*"));
        }
        Ok(Term(format!(
            "\"\"\"{}\"\"\"@{}",
            escape_string_literal(text, Quote::Double),
            tag
        )))
    }

    /// `xsd:string`-typed literal. Never fails.
    pub fn string(text: &str) -> Self {
        Term(format!(
            "\"\"\"{}\"\"\"^^<{}>",
            escape_string_literal(text, Quote::Double),
            xsd::STRING
        ))
    }

    /// `xsd:integer`-typed literal from a float that must hold an integer.
    pub fn integer(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::validation(value.to_string(), "integer must be finite"));
        }
        if value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER {
            return Err(Error::validation(
                value.to_string(),
                "expected an exactly representable integer",
            ));
        }
        Ok(Self::lexical(&(value as i64).to_string(), xsd::INTEGER))
    }

    pub fn boolean(value: bool) -> Self {
        Term(if value { "true" } else { "false" }.to_string())
    }

    /// `"lexical"^^<datatype>` for lexical forms that never need escaping
    /// (numbers, timestamps).
    pub(crate) fn lexical(lexical: &str, datatype: &str) -> Self {
        Term(format!("\"{lexical}\"^^<{datatype}>"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_variable(&self) -> bool {
        self.0.starts_with('?')
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        term.0
    }
}
