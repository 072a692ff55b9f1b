//! Native values and their conversion to term text.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::term::{Term, MAX_SAFE_INTEGER};
use crate::vocab::xsd;

/// Anything that can be spliced into query text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    Record(Vec<(Key, Value)>),
    Term(Term),
}

/// Record key: a plain name resolved by [`Term::predicate_with`], or a term
/// used verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Name(String),
    Term(Term),
}

impl Value {
    /// Build a record from `(key, value)` pairs, keeping their order.
    pub fn record<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Scalars are every variant except arrays and records.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Record(_))
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<Term> for Key {
    fn from(term: Term) -> Self {
        Key::Term(term)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

macro_rules! integer_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Integer(i64::from(n))
            }
        })*
    };
}

integer_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Term> for Value {
    fn from(t: Term) -> Self {
        Value::Term(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| (Key::Name(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Converts [`Value`]s into [`Term`]s under a [`RenderConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Converter {
    config: RenderConfig,
}

impl Converter {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Convert using the configured null policy.
    pub fn convert_default(&self, value: &Value) -> Result<Term> {
        self.convert(value, self.config.strict_nulls)
    }

    pub fn convert(&self, value: &Value, strict: bool) -> Result<Term> {
        match value {
            Value::Null if strict => Err(Error::NullValue),
            Value::Null => Ok(Term::string("")),
            Value::String(s) => Ok(Term::string(s)),
            Value::Boolean(b) => Ok(Term::boolean(*b)),
            Value::Integer(n) => Ok(Term::lexical(&n.to_string(), xsd::INTEGER)),
            Value::Number(n) => convert_number(*n),
            Value::Timestamp(t) => convert_timestamp(t),
            Value::Array(items) => self.convert_array(items, strict),
            Value::Record(entries) => self.convert_record(entries, strict),
            Value::Term(t) => Ok(t.clone()),
        }
    }

    fn convert_array(&self, items: &[Value], strict: bool) -> Result<Term> {
        if items.is_empty() {
            return Err(Error::AmbiguousInput { kind: "array" });
        }
        let terms = items
            .iter()
            .map(|item| self.convert(item, strict).map(Term::into_string))
            .collect::<Result<Vec<_>>>()?;
        if items.iter().all(Value::is_scalar) {
            Ok(Term::raw(terms.join(" ")))
        } else {
            Ok(Term::raw(format!("( {} )", terms.join(" "))))
        }
    }

    fn convert_record(&self, entries: &[(Key, Value)], strict: bool) -> Result<Term> {
        if entries.is_empty() {
            return Err(Error::AmbiguousInput { kind: "record" });
        }
        let mut pairs = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let predicate = match key {
                Key::Term(t) => t.clone(),
                Key::Name(name) => Term::predicate_with(name, &self.config)?,
            };
            let object = self.convert(value, strict)?;
            pairs.push(format!("{predicate} {object}"));
        }
        Ok(Term::raw(format!("[ {} ]", pairs.join(" ; "))))
    }
}

fn convert_number(n: f64) -> Result<Term> {
    if !n.is_finite() {
        return Err(Error::validation(
            n.to_string(),
            "decimal must be finite (NaN and Infinity have no literal form)",
        ));
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Term::integer(n);
    }
    Ok(Term::lexical(&n.to_string(), xsd::DECIMAL))
}

/// Four-digit years only: chrono writes others as `+12000-…`, which is not a
/// valid `xsd:dateTime` lexical form.
fn convert_timestamp(t: &DateTime<Utc>) -> Result<Term> {
    if !(0..=9999).contains(&t.year()) {
        return Err(Error::validation(
            t.to_rfc3339(),
            "timestamp year must be within 0000-9999",
        ));
    }
    Ok(Term::lexical(
        &t.to_rfc3339_opts(SecondsFormat::Millis, true),
        xsd::DATE_TIME,
    ))
}

/// Convert with the default configuration.
pub fn convert(value: &Value, strict: bool) -> Result<Term> {
    Converter::default().convert(value, strict)
}
