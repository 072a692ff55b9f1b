//! Relationships with optional reified properties.

use sparqlcraft_term::vocab::rdf;
use sparqlcraft_term::{Converter, RenderConfig, Result, Term, Value};

use crate::digest::statement_digest;
use crate::pattern::PatternBuilder;

/// `(from, predicate, to)` plus properties about the statement itself.
///
/// Without properties this renders as one triple. With properties the
/// statement is also reified under `_:<prefix><digest>`, where the digest
/// depends only on the three terms.
///
/// A relationship keeps the configuration it was built with: predicates and
/// property values are validated against it, and [`Relationship::render`]
/// and [`Relationship::reification_id`] use its prefix. Use
/// [`Graph::relationship`](crate::Graph::relationship) to build one under a
/// graph's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    converter: Converter,
    from: Term,
    predicate: Term,
    to: Term,
    properties: Vec<(Term, Term)>,
}

impl Relationship {
    pub fn new(from: Term, predicate: Term, to: Term) -> Self {
        Self::new_with(from, predicate, to, RenderConfig::default())
    }

    pub fn new_with(from: Term, predicate: Term, to: Term, config: RenderConfig) -> Self {
        Self {
            converter: Converter::new(config),
            from,
            predicate,
            to,
            properties: Vec::new(),
        }
    }

    /// Like [`Relationship::new`] with the predicate given as text
    /// (`ex:knows`, `<http://…>`, `?p`).
    pub fn between(from: Term, predicate: &str, to: Term) -> Result<Self> {
        Self::between_with(from, predicate, to, &RenderConfig::default())
    }

    pub fn between_with(
        from: Term,
        predicate: &str,
        to: Term,
        config: &RenderConfig,
    ) -> Result<Self> {
        let predicate = Term::reference_with(predicate, config)?;
        Ok(Self::new_with(from, predicate, to, config.clone()))
    }

    pub fn config(&self) -> &RenderConfig {
        self.converter.config()
    }

    /// Attach a property to the statement, converted under this
    /// relationship's configuration.
    pub fn prop(self, predicate: &str, value: impl Into<Value>) -> Result<Self> {
        let converter = self.converter.clone();
        self.prop_with(&converter, predicate, value)
    }

    pub fn prop_with(
        mut self,
        converter: &Converter,
        predicate: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let predicate = Term::predicate_with(predicate, converter.config())?;
        match value.into() {
            Value::Array(items) if !items.is_empty() => {
                for item in &items {
                    let object = converter.convert_default(item)?;
                    self.properties.push((predicate.clone(), object));
                }
            }
            other => {
                let object = converter.convert_default(&other)?;
                self.properties.push((predicate, object));
            }
        }
        Ok(self)
    }

    pub fn from(&self) -> &Term {
        &self.from
    }

    pub fn predicate(&self) -> &Term {
        &self.predicate
    }

    pub fn to(&self) -> &Term {
        &self.to
    }

    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// Blank node naming the reified statement under this relationship's
    /// prefix.
    pub fn reification_id(&self) -> Term {
        self.reification_id_with(self.config())
    }

    /// Blank node naming the reified statement under `config`'s prefix, as
    /// emitted by [`Relationship::render_with`] with a builder for `config`.
    pub fn reification_id_with(&self, config: &RenderConfig) -> Term {
        let digest = statement_digest(
            self.from.as_str(),
            self.predicate.as_str(),
            self.to.as_str(),
        );
        Term::raw(format!("_:{}{digest}", config.reification_prefix))
    }

    pub fn render(&self) -> String {
        self.render_with(&PatternBuilder::new(self.config().clone()))
    }

    pub fn render_with(&self, builder: &PatternBuilder) -> String {
        let base = format!("{} {} {} .", self.from, self.predicate, self.to);
        if self.properties.is_empty() {
            return base;
        }

        let id = self.reification_id_with(builder.config());
        tracing::debug!(id = %id, "reifying relationship");

        let statement = format!("<{}>", rdf::STATEMENT);
        let subject = format!("<{}>", rdf::SUBJECT);
        let predicate = format!("<{}>", rdf::PREDICATE);
        let object = format!("<{}>", rdf::OBJECT);
        let mut pairs: Vec<(&str, &str)> = vec![
            ("a", statement.as_str()),
            (subject.as_str(), self.from.as_str()),
            (predicate.as_str(), self.predicate.as_str()),
            (object.as_str(), self.to.as_str()),
        ];
        pairs.extend(
            self.properties
                .iter()
                .map(|(p, o)| (p.as_str(), o.as_str())),
        );
        format!("{base}\n{}", builder.block(id.as_str(), &pairs))
    }
}
