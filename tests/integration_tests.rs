//! Integration tests for the complete sparqlcraft pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Values → Terms → Templates (query text assembly)
//! - Graph description → Flatten → Arrow patterns
//! - Results document → Coercion → native values
//!
//! Run with: cargo test --test integration_tests

use anyhow::Result;
use chrono::{TimeZone, Utc};
use sparqlcraft_graph::{parse_arrows, Graph, PatternBuilder, Relationship, Segment};
use sparqlcraft_term::{NativeValue, RenderConfig, ResultSet, Template, Term, Value};

const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

// ============================================================================
// Construction direction
// ============================================================================

#[test]
fn test_where_clause_from_template_and_graph() -> Result<()> {
    init_tracing();

    let mut graph = Graph::new();
    let author = graph
        .describe("?author a schema:Person")?
        .prop("schema:name", "O'Brien")?
        .id();
    let published = Utc.with_ymd_and_hms(1965, 8, 1, 0, 0, 0).unwrap();
    let book = graph
        .describe("?book a schema:Book")?
        .prop("schema:datePublished", published)?
        .link("schema:author", author)?
        .id();

    let body = Template::new()
        .text("\n  ")
        .value(Term::raw(graph.flatten(book)))
        .text("\n  FILTER(?pages > ")
        .value(300)
        .text(")\n")
        .render()?;

    let text = body.as_str();
    assert!(text.starts_with("?book\n  a schema:Book ;"));
    assert!(text.contains(&format!("\"1965-08-01T00:00:00.000Z\"^^<{XSD}dateTime>")));
    assert!(text.contains(&format!("schema:name \"\"\"O'Brien\"\"\"^^<{XSD}string>")));
    assert!(text.ends_with(&format!("FILTER(?pages > \"300\"^^<{XSD}integer>)")));
    Ok(())
}

#[test]
fn test_hostile_strings_stay_inside_their_literal() -> Result<()> {
    let builder = PatternBuilder::default();
    let hostile = "x\"\"\" } ; DROP ALL ; # \\ \n";
    let triple = builder.triple("?s", "ex:note", hostile)?;

    let start = triple.find("\"\"\"").expect("opening quotes") + 3;
    let end = triple.rfind("\"\"\"").expect("closing quotes");
    let body = &triple[start..end];
    assert!(!body.contains('\n'));
    for (i, _) in body.match_indices('"') {
        assert_eq!(&body[i - 1..i], "\\", "unescaped quote in {triple}");
    }
    Ok(())
}

#[test]
fn test_arrow_pattern_over_described_nodes() -> Result<()> {
    init_tracing();

    let mut graph = Graph::new();
    let a = graph.describe("?a a foaf:Person")?.id();
    let b = graph.describe("?b a foaf:Person")?.id();
    let pattern = parse_arrows(&[
        Segment::Node(a),
        Segment::Text("-[foaf:knows]->"),
        Segment::Node(b),
    ])?;

    assert_eq!(
        pattern.render(&graph),
        "?a\n  a foaf:Person .\n?b\n  a foaf:Person .\n?a foaf:knows ?b ."
    );

    let edges = serde_json::to_value(&pattern.edges)?;
    assert_eq!(edges[0]["predicate"], "foaf:knows");
    assert_eq!(edges[0]["direction"], "forward");
    Ok(())
}

#[test]
fn test_reified_relationship_from_config_file() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("sparqlcraft-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("render.json");
    std::fs::write(
        &path,
        r#"{"allowed_schemes": ["http://", "foo://"], "reification_prefix": "edge_", "strict_nulls": true}"#,
    )?;

    let config = RenderConfig::load(&path)?;
    std::fs::remove_dir_all(&dir)?;
    assert!(config.strict_nulls);

    let mut graph = Graph::with_config(config);
    assert!(Relationship::between(Term::var("a")?, "foo://knows", Term::var("b")?).is_err());

    let rel = graph.relationship(Term::var("a")?, "foo://knows", Term::var("b")?)?;
    assert!(rel.clone().prop("ex:note", Value::Null).is_err());
    let rel = rel.prop("ex:since", 2020)?;
    let id = rel.reification_id();
    assert!(id.as_str().starts_with("_:edge_"));
    graph.add_relationship(rel.clone());
    graph.add_relationship(rel);

    let text = graph.render();
    assert!(text.starts_with("?a <foo://knows> ?b ."));
    assert_eq!(text.matches(&format!("\n{id}\n")).count(), 2);
    assert!(graph
        .pattern_builder()
        .triple("?s", "ex:p", Value::Null)
        .is_err());
    Ok(())
}

// ============================================================================
// Result direction
// ============================================================================

#[test]
fn test_results_document_coerces_rows() -> Result<()> {
    init_tracing();

    let doc = serde_json::json!({
        "head": {"vars": ["s", "n", "ok", "when", "blob", "odd"]},
        "results": {"bindings": [{
            "s": {"type": "uri", "value": "http://example.org/s"},
            "n": {"type": "literal", "value": "42", "datatype": format!("{XSD}integer")},
            "ok": {"type": "literal", "value": "true", "datatype": format!("{XSD}boolean")},
            "when": {"type": "literal", "value": "2024-01-02T03:04:05.678Z",
                     "datatype": format!("{XSD}dateTime")},
            "blob": {"type": "literal", "value": "{\"k\": [1, 2]}",
                     "datatype": "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON"},
            "odd": {"type": "literal", "value": "forty-two", "datatype": format!("{XSD}integer")}
        }]}
    });
    let results = ResultSet::from_json(&doc.to_string())?;
    assert_eq!(results.vars().len(), 6);

    let rows = results.native_rows();
    let row = &rows[0];
    assert_eq!(row["s"], NativeValue::Text("http://example.org/s".into()));
    assert_eq!(row["n"], NativeValue::Integer(42));
    assert_eq!(row["ok"], NativeValue::Boolean(true));
    assert_eq!(
        row["when"],
        NativeValue::Timestamp(
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap() + chrono::Duration::milliseconds(678)
        )
    );
    assert_eq!(row["blob"], NativeValue::Json(serde_json::json!({"k": [1, 2]})));
    assert_eq!(row["odd"], NativeValue::Text("forty-two".into()));
    Ok(())
}
