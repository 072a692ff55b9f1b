//! Triple and subject-block emission.

use sparqlcraft_term::{Converter, RenderConfig, Result, Term, Value};

/// Emits triples from already-resolved subjects/predicates and convertible
/// objects.
#[derive(Debug, Clone, Default)]
pub struct PatternBuilder {
    converter: Converter,
}

impl PatternBuilder {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            converter: Converter::new(config),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        self.converter.config()
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// `s p o .` with `o` converted.
    pub fn triple(
        &self,
        subject: impl AsRef<str>,
        predicate: impl AsRef<str>,
        object: impl Into<Value>,
    ) -> Result<String> {
        let object = self.converter.convert_default(&object.into())?;
        Ok(format!("{} {} {} .", subject.as_ref(), predicate.as_ref(), object))
    }

    /// Subject block from ordered `(predicate, object)` pairs. Each object is
    /// converted whole, so an array object renders as one term list.
    pub fn triples<P, V, I>(&self, subject: impl AsRef<str>, pairs: I) -> Result<String>
    where
        P: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (P, V)>,
    {
        let mut resolved = Vec::new();
        for (predicate, object) in pairs {
            let object = self.converter.convert_default(&object.into())?;
            resolved.push((predicate.as_ref().to_string(), object));
        }
        Ok(self.block(subject.as_ref(), &resolved))
    }

    /// Subject block from predicate → value entries. An array value expands
    /// into one pair per element, in order.
    pub fn triples_map<P, V, I>(&self, subject: impl AsRef<str>, entries: I) -> Result<String>
    where
        P: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (P, V)>,
    {
        let mut resolved = Vec::new();
        for (predicate, value) in entries {
            let predicate = predicate.as_ref().to_string();
            match value.into() {
                Value::Array(items) if !items.is_empty() => {
                    for item in &items {
                        resolved.push((predicate.clone(), self.converter.convert_default(item)?));
                    }
                }
                other => resolved.push((predicate, self.converter.convert_default(&other)?)),
            }
        }
        Ok(self.block(subject.as_ref(), &resolved))
    }

    /// `<< s p o >>`
    pub fn quoted_triple(
        &self,
        subject: impl AsRef<str>,
        predicate: impl AsRef<str>,
        object: impl Into<Value>,
    ) -> Result<Term> {
        let object = self.converter.convert_default(&object.into())?;
        Ok(Term::raw(format!(
            "<< {} {} {} >>",
            subject.as_ref(),
            predicate.as_ref(),
            object
        )))
    }

    /// Render resolved pairs as
    ///
    /// ```text
    /// subject
    ///   p1 o1 ;
    ///   p2 o2 .
    /// ```
    ///
    /// No pairs renders nothing.
    pub fn block<P: AsRef<str>, O: AsRef<str>>(&self, subject: &str, pairs: &[(P, O)]) -> String {
        if pairs.is_empty() {
            return String::new();
        }
        let indent = self.config().indent_str();
        let mut out = String::from(subject);
        for (i, (predicate, object)) in pairs.iter().enumerate() {
            let terminator = if i + 1 == pairs.len() { "." } else { ";" };
            out.push('\n');
            out.push_str(&indent);
            out.push_str(predicate.as_ref());
            out.push(' ');
            out.push_str(object.as_ref());
            out.push(' ');
            out.push_str(terminator);
        }
        out
    }
}

pub fn triple(
    subject: impl AsRef<str>,
    predicate: impl AsRef<str>,
    object: impl Into<Value>,
) -> Result<String> {
    PatternBuilder::default().triple(subject, predicate, object)
}

pub fn triples<P, V, I>(subject: impl AsRef<str>, pairs: I) -> Result<String>
where
    P: AsRef<str>,
    V: Into<Value>,
    I: IntoIterator<Item = (P, V)>,
{
    PatternBuilder::default().triples(subject, pairs)
}

pub fn triples_map<P, V, I>(subject: impl AsRef<str>, entries: I) -> Result<String>
where
    P: AsRef<str>,
    V: Into<Value>,
    I: IntoIterator<Item = (P, V)>,
{
    PatternBuilder::default().triples_map(subject, entries)
}

pub fn quoted_triple(
    subject: impl AsRef<str>,
    predicate: impl AsRef<str>,
    object: impl Into<Value>,
) -> Result<Term> {
    PatternBuilder::default().quoted_triple(subject, predicate, object)
}
