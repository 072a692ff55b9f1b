//! Compact node descriptions: `?product a schema:Product, schema:Thing`.
//!
//! Grammar:
//!
//! ```text
//! description := ws subject (ws1 "a" ws1 type (ws "," ws type)*)? ws
//! subject     := ?var | <iri> | prefix:local | _:label
//! type        := <iri> | prefix:local | ?var
//! ```

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char as pchar, multispace0, multispace1},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use sparqlcraft_term::{Error, RenderConfig, Result, Term};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescription {
    pub subject: Term,
    pub types: Vec<Term>,
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != ',')(input)
}

fn type_list(input: &str) -> IResult<&str, Vec<&str>> {
    preceded(
        tuple((multispace1, tag("a"), multispace1)),
        separated_list1(tuple((multispace0, pchar(','), multispace0)), token),
    )(input)
}

fn description(input: &str) -> IResult<&str, (&str, Option<Vec<&str>>)> {
    all_consuming(delimited(
        multispace0,
        pair(token, opt(type_list)),
        multispace0,
    ))(input)
}

fn offset_of(input: &str, part: &str) -> usize {
    part.as_ptr() as usize - input.as_ptr() as usize
}

fn resolve(input: &str, part: &str, config: &RenderConfig) -> Result<Term> {
    Term::reference_with(part, config)
        .map_err(|err| Error::parse(input, offset_of(input, part), err.to_string()))
}

/// Resolve a node type: an IRI, prefixed name or variable. The `a` keyword
/// and blank nodes are rejected.
pub(crate) fn type_term(text: &str, config: &RenderConfig) -> Result<Term> {
    let ty = Term::reference_with(text, config)?;
    if ty.as_str() == "a" || ty.as_str().starts_with("_:") {
        return Err(Error::validation(text, "type must be an IRI or variable"));
    }
    Ok(ty)
}

pub fn parse_description(input: &str) -> Result<NodeDescription> {
    parse_description_with(input, &RenderConfig::default())
}

pub fn parse_description_with(input: &str, config: &RenderConfig) -> Result<NodeDescription> {
    let (_, (subject_text, type_texts)) = description(input).map_err(|err| match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => Error::parse(
            input,
            input.len() - e.input.len(),
            "expected `subject [a type, ...]`",
        ),
        nom::Err::Incomplete(_) => Error::parse(input, input.len(), "unexpected end of input"),
    })?;

    let subject = resolve(input, subject_text, config)?;
    if subject.as_str() == "a" {
        return Err(Error::parse(
            input,
            offset_of(input, subject_text),
            "subject cannot be `a`",
        ));
    }

    let mut types = Vec::new();
    for text in type_texts.unwrap_or_default() {
        let ty = type_term(text, config)
            .map_err(|err| Error::parse(input, offset_of(input, text), err.to_string()))?;
        types.push(ty);
    }

    Ok(NodeDescription { subject, types })
}
