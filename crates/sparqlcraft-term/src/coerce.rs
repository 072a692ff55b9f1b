//! Result values back to native values.
//!
//! Coercion is best-effort and total: whenever a datatype-directed parse
//! fails the raw lexical text is returned instead. This keeps unknown or
//! future datatypes readable at the cost of masking malformed data.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vocab::{rdf, xsd, xsd_local_name};

/// Term kind tag of a SPARQL JSON result binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermKind {
    Uri,
    Literal,
    TypedLiteral,
    Bnode,
}

/// One bound value as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingValue {
    #[serde(rename = "type")]
    pub kind: TermKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(
        default,
        rename = "xml:lang",
        alias = "lang",
        skip_serializing_if = "Option::is_none"
    )]
    pub lang: Option<String>,
}

impl BindingValue {
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Uri,
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn literal(value: impl Into<String>, datatype: Option<&str>) -> Self {
        Self {
            kind: TermKind::Literal,
            value: value.into(),
            datatype: datatype.map(str::to_string),
            lang: None,
        }
    }
}

/// Native value produced by [`coerce`].
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl NativeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NativeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatatypeClass {
    Boolean,
    Integer,
    Float,
    Temporal,
    Json,
    Other,
}

fn classify(datatype: &str) -> DatatypeClass {
    if datatype == rdf::JSON {
        return DatatypeClass::Json;
    }
    let Some(local) = xsd_local_name(datatype) else {
        return DatatypeClass::Other;
    };
    match local {
        "boolean" => DatatypeClass::Boolean,
        "decimal" | "float" | "double" => DatatypeClass::Float,
        "date" | "dateTime" | "dateTimeStamp" | "time" => DatatypeClass::Temporal,
        l if xsd::INTEGER_FAMILY.contains(&l) => DatatypeClass::Integer,
        _ => DatatypeClass::Other,
    }
}

/// Coerce a result binding to a native value. Never fails.
pub fn coerce(binding: &BindingValue) -> NativeValue {
    let raw = || NativeValue::Text(binding.value.clone());
    if binding.kind == TermKind::Uri {
        return raw();
    }
    let Some(datatype) = binding.datatype.as_deref() else {
        return raw();
    };

    let text = binding.value.trim();
    let coerced = match classify(datatype) {
        DatatypeClass::Boolean => Some(NativeValue::Boolean(text == "true" || text == "1")),
        DatatypeClass::Integer => text.parse::<i64>().ok().map(NativeValue::Integer),
        DatatypeClass::Float => text
            .parse::<f64>()
            .ok()
            .filter(|f| !f.is_nan())
            .map(NativeValue::Float),
        DatatypeClass::Temporal => parse_timestamp(text).map(NativeValue::Timestamp),
        DatatypeClass::Json => serde_json::from_str(&binding.value)
            .ok()
            .map(NativeValue::Json),
        DatatypeClass::Other => return raw(),
    };

    coerced.unwrap_or_else(|| {
        tracing::debug!(
            datatype,
            value = %binding.value,
            "literal does not parse as its datatype; keeping raw text"
        );
        raw()
    })
}

/// Parse the lexical forms of `xsd:dateTime`, `xsd:dateTimeStamp` and
/// `xsd:date`. Zone-less values are read as UTC; a bare date is midnight UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    let date_part = text.strip_suffix('Z').unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lit(value: &str, datatype: &str) -> BindingValue {
        BindingValue::literal(value, Some(datatype))
    }

    #[test]
    fn uri_is_unchanged() {
        assert_eq!(
            coerce(&BindingValue::uri("http://x/1")),
            NativeValue::Text("http://x/1".into())
        );
    }

    #[test]
    fn uri_kind_wins_over_datatype() {
        let mut b = BindingValue::uri("42");
        b.datatype = Some(xsd::INTEGER.to_string());
        assert_eq!(coerce(&b), NativeValue::Text("42".into()));
    }

    #[test]
    fn booleans() {
        assert_eq!(coerce(&lit("true", xsd::BOOLEAN)), NativeValue::Boolean(true));
        assert_eq!(coerce(&lit("1", xsd::BOOLEAN)), NativeValue::Boolean(true));
        assert_eq!(coerce(&lit("false", xsd::BOOLEAN)), NativeValue::Boolean(false));
        assert_eq!(coerce(&lit("yes", xsd::BOOLEAN)), NativeValue::Boolean(false));
    }

    #[test]
    fn integer_family() {
        assert_eq!(coerce(&lit("42", xsd::INTEGER)), NativeValue::Integer(42));
        assert_eq!(
            coerce(&lit("-7", "http://www.w3.org/2001/XMLSchema#short")),
            NativeValue::Integer(-7)
        );
        assert_eq!(
            coerce(&lit("12abc", xsd::INTEGER)),
            NativeValue::Text("12abc".into())
        );
    }

    #[test]
    fn floats_fall_back_on_nan() {
        assert_eq!(coerce(&lit("3.5", xsd::DECIMAL)), NativeValue::Float(3.5));
        assert_eq!(coerce(&lit("1e3", xsd::DOUBLE)), NativeValue::Float(1000.0));
        assert_eq!(coerce(&lit("NaN", xsd::DOUBLE)), NativeValue::Text("NaN".into()));
        assert_eq!(coerce(&lit("abc", xsd::FLOAT)), NativeValue::Text("abc".into()));
    }

    #[test]
    fn temporal_values() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            coerce(&lit("2024-03-01T12:30:00.000Z", xsd::DATE_TIME)),
            NativeValue::Timestamp(expected)
        );
        assert_eq!(
            coerce(&lit("2024-03-01T14:30:00+02:00", xsd::DATE_TIME_STAMP)),
            NativeValue::Timestamp(expected)
        );
        assert_eq!(
            coerce(&lit("2024-03-01T12:30:00", xsd::DATE_TIME)),
            NativeValue::Timestamp(expected)
        );
        assert_eq!(
            coerce(&lit("2024-03-01", xsd::DATE)),
            NativeValue::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            coerce(&lit("12:30:00", xsd::TIME)),
            NativeValue::Text("12:30:00".into())
        );
    }

    #[test]
    fn json_literals() {
        assert_eq!(
            coerce(&lit(r#"{"a":[1,2]}"#, rdf::JSON)),
            NativeValue::Json(serde_json::json!({"a": [1, 2]}))
        );
        assert_eq!(
            coerce(&lit("{broken", rdf::JSON)),
            NativeValue::Text("{broken".into())
        );
    }

    #[test]
    fn any_uri_unknown_and_untyped_are_text() {
        assert_eq!(
            coerce(&lit("http://x", xsd::ANY_URI)),
            NativeValue::Text("http://x".into())
        );
        assert_eq!(
            coerce(&lit("v", "http://example.org/dt#custom")),
            NativeValue::Text("v".into())
        );
        assert_eq!(
            coerce(&BindingValue::literal("plain", None)),
            NativeValue::Text("plain".into())
        );
        assert_eq!(
            coerce(&lit("s", xsd::STRING)),
            NativeValue::Text("s".into())
        );
    }

    #[test]
    fn deserializes_wire_shape() {
        let b: BindingValue = serde_json::from_str(
            r#"{"type":"literal","value":"chat","xml:lang":"fr"}"#,
        )
        .unwrap();
        assert_eq!(b.kind, TermKind::Literal);
        assert_eq!(b.lang.as_deref(), Some("fr"));
        assert_eq!(coerce(&b), NativeValue::Text("chat".into()));

        let legacy: BindingValue = serde_json::from_str(
            r#"{"type":"typed-literal","value":"5","datatype":"http://www.w3.org/2001/XMLSchema#int"}"#,
        )
        .unwrap();
        assert_eq!(coerce(&legacy), NativeValue::Integer(5));
    }
}
