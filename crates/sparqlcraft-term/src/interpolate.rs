//! Splicing values into literal query text.

use crate::error::{Error, Result};
use crate::term::Term;
use crate::value::{Converter, Value};

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Value(Value),
}

/// Literal text interleaved with values, rendered into a single [`Term`].
///
/// ```
/// use sparqlcraft_term::{Template, Term};
///
/// let q = Template::new()
///     .text("\n  ?book schema:name ")
///     .value("Dune")
///     .text(" ;\n    schema:author ")
///     .value(Term::var("author").unwrap())
///     .text(" .\n")
///     .render()
///     .unwrap();
/// assert!(q.as_str().starts_with("?book schema:name \"\"\"Dune\"\"\""));
/// assert!(q.as_str().ends_with("?author ."));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.pieces.push(Piece::Text(text.into()));
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.pieces.push(Piece::Value(value.into()));
        self
    }

    pub fn render(&self) -> Result<Term> {
        self.render_with(&Converter::default())
    }

    /// Convert every value non-strictly and concatenate.
    ///
    /// Only the layout whitespace before the first text fragment and after
    /// the last one is trimmed; converted terms are never touched.
    pub fn render_with(&self, converter: &Converter) -> Result<Term> {
        let first_text = self.pieces.iter().position(|p| matches!(p, Piece::Text(_)));
        let last_text = self.pieces.iter().rposition(|p| matches!(p, Piece::Text(_)));

        let mut out = String::new();
        for (i, piece) in self.pieces.iter().enumerate() {
            match piece {
                Piece::Text(text) => {
                    let mut text = text.as_str();
                    if Some(i) == first_text && i == 0 {
                        text = text.trim_start();
                    }
                    if Some(i) == last_text && i + 1 == self.pieces.len() {
                        text = text.trim_end();
                    }
                    out.push_str(text);
                }
                Piece::Value(value) => {
                    out.push_str(converter.convert(value, false)?.as_str());
                }
            }
        }
        Ok(Term::raw(out))
    }
}

/// Tagged-template entry point: `strings` surround `values`, so
/// `strings.len()` must be `values.len() + 1`.
pub fn interpolate(strings: &[&str], values: &[Value]) -> Result<Term> {
    if strings.len() != values.len() + 1 {
        return Err(Error::validation(
            format!("{} strings / {} values", strings.len(), values.len()),
            "template needs exactly one more text fragment than values",
        ));
    }
    let mut template = Template::new();
    for (i, text) in strings.iter().enumerate() {
        template = template.text(*text);
        if let Some(value) = values.get(i) {
            template = template.value(value.clone());
        }
    }
    template.render()
}
