//! Arrow patterns: `${a} -[ex:knows]-> ${b}`.
//!
//! A pattern is a sequence of text and node segments. Node segments are
//! replaced by positional placeholders (`\0<n>\0`) and the assembled text is
//! scanned once by a small state machine:
//!
//! ```text
//! Idle ─node─▶ Node ─"-" / "<-"─▶ Operator ─"["─▶ Predicate ─"]"─▶ Tail ─"-" / "->"─▶ Target ─node─▶ Node
//! ```
//!
//! Accepted arrows are `-[p]->`, `<-[p]-` and `-[p]-` (undirected, kept in
//! written order). Whitespace, `,` and the triple terminator `.` separate
//! independent nodes or patterns; any other text is a parse error. Error
//! offsets refer to the assembled text with each NUL shown as `$`, e.g.
//! `$0$ -[ex:knows]-> $1$`.

use serde::Serialize;
use sparqlcraft_term::{Error, RenderConfig, Result, Term};

use crate::node::{Graph, NodeId};

const PLACEHOLDER: char = '\0';

/// One piece of an arrow pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Segment<'a> {
    fn from(text: &'a str) -> Self {
        Segment::Text(text)
    }
}

impl From<NodeId> for Segment<'_> {
    fn from(id: NodeId) -> Self {
        Segment::Node(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    Undirected,
}

/// An edge between two placeholders. `from`/`to` index
/// [`ArrowPattern::nodes`] and are already oriented: for `<-[p]-` the right
/// hand node is `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeMatch {
    pub from: usize,
    pub predicate: Term,
    pub to: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrowPattern {
    /// Node of every placeholder, in order of appearance. A node used twice
    /// appears twice.
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeMatch>,
}

#[derive(Debug)]
enum State {
    Idle,
    Node(usize),
    Operator {
        from: usize,
        backward: bool,
        start: usize,
    },
    Predicate {
        from: usize,
        backward: bool,
        start: usize,
        open: usize,
    },
    Tail {
        from: usize,
        backward: bool,
        start: usize,
        predicate: Term,
    },
    Target {
        from: usize,
        start: usize,
        predicate: Term,
        direction: Direction,
    },
}

pub fn parse_arrows(segments: &[Segment<'_>]) -> Result<ArrowPattern> {
    parse_arrows_with(segments, &RenderConfig::default())
}

pub fn parse_arrows_with(segments: &[Segment<'_>], config: &RenderConfig) -> Result<ArrowPattern> {
    let mut text = String::new();
    let mut nodes = Vec::new();
    for segment in segments {
        match segment {
            Segment::Text(t) => {
                if t.contains(PLACEHOLDER) {
                    return Err(Error::validation(
                        t.escape_default().to_string(),
                        "arrow pattern text cannot contain NUL",
                    ));
                }
                text.push_str(t);
            }
            Segment::Node(id) => {
                text.push(PLACEHOLDER);
                text.push_str(&nodes.len().to_string());
                text.push(PLACEHOLDER);
                nodes.push(*id);
            }
        }
    }

    let edges = Scanner {
        text: &text,
        config,
    }
    .run()?;
    Ok(ArrowPattern { nodes, edges })
}

struct Scanner<'t> {
    text: &'t str,
    config: &'t RenderConfig,
}

impl Scanner<'_> {
    fn error(&self, offset: usize, message: &str) -> Error {
        Error::parse(self.text.replace(PLACEHOLDER, "$"), offset, message)
    }

    /// Placeholder index and its byte length, if one starts at `pos`.
    fn placeholder_at(&self, pos: usize) -> Option<(usize, usize)> {
        let rest = self.text[pos..].strip_prefix(PLACEHOLDER)?;
        let end = rest.find(PLACEHOLDER)?;
        let index = rest[..end].parse().ok()?;
        Some((index, end + 2))
    }

    fn run(&self) -> Result<Vec<EdgeMatch>> {
        let mut edges = Vec::new();
        let mut state = State::Idle;
        let mut pos = 0;

        while pos < self.text.len() {
            let rest = &self.text[pos..];
            let Some(c) = rest.chars().next() else { break };

            state = match state {
                State::Idle | State::Node(_) if c.is_whitespace() => {
                    pos += c.len_utf8();
                    state
                }
                State::Idle | State::Node(_) if c == PLACEHOLDER => {
                    let (index, len) = self
                        .placeholder_at(pos)
                        .ok_or_else(|| self.error(pos, "malformed node placeholder"))?;
                    pos += len;
                    State::Node(index)
                }
                State::Idle | State::Node(_) if c == ',' || c == '.' => {
                    pos += 1;
                    State::Idle
                }
                State::Idle if c == '-' || c == '<' => {
                    return Err(self.error(pos, "arrow must start at a node"));
                }
                State::Node(from) if rest.starts_with("<-") => {
                    let start = pos;
                    pos += 2;
                    State::Operator {
                        from,
                        backward: true,
                        start,
                    }
                }
                State::Node(from) if c == '-' => {
                    let start = pos;
                    pos += 1;
                    State::Operator {
                        from,
                        backward: false,
                        start,
                    }
                }
                State::Idle | State::Node(_) => {
                    return Err(self.error(pos, "expected a node or an arrow"));
                }
                State::Operator {
                    from,
                    backward,
                    start,
                } => {
                    if c != '[' {
                        return Err(self.error(pos, "expected `[` after arrow head"));
                    }
                    pos += 1;
                    State::Predicate {
                        from,
                        backward,
                        start,
                        open: pos,
                    }
                }
                State::Predicate {
                    from,
                    backward,
                    start,
                    open,
                } => match rest.find(|ch: char| ch == ']' || ch == '\n' || ch == PLACEHOLDER) {
                    Some(close) if rest[close..].starts_with(']') => {
                        let predicate = self.predicate(open, &rest[..close])?;
                        pos += close + 1;
                        State::Tail {
                            from,
                            backward,
                            start,
                            predicate,
                        }
                    }
                    _ => return Err(self.error(open - 1, "unterminated predicate")),
                },
                State::Tail {
                    from,
                    backward,
                    start,
                    predicate,
                } => {
                    if c != '-' {
                        return Err(self.error(pos, "missing arrow tail `-`"));
                    }
                    let pointed = rest[1..].starts_with('>');
                    let direction = match (backward, pointed) {
                        (true, true) => {
                            return Err(self.error(start, "arrow cannot point both ways"));
                        }
                        (true, false) => Direction::Backward,
                        (false, true) => Direction::Forward,
                        (false, false) => Direction::Undirected,
                    };
                    pos += if pointed { 2 } else { 1 };
                    State::Target {
                        from,
                        start,
                        predicate,
                        direction,
                    }
                }
                State::Target { .. } if c.is_whitespace() => {
                    pos += c.len_utf8();
                    state
                }
                State::Target {
                    from,
                    start,
                    predicate,
                    direction,
                } => {
                    let Some((to, len)) = self.placeholder_at(pos) else {
                        return Err(self.error(start, "arrow must end at a node"));
                    };
                    let (from, to) = match direction {
                        Direction::Backward => (to, from),
                        Direction::Forward | Direction::Undirected => (from, to),
                    };
                    tracing::trace!(from, to, predicate = %predicate, ?direction, "matched arrow");
                    edges.push(EdgeMatch {
                        from,
                        predicate,
                        to,
                        direction,
                    });
                    pos += len;
                    // Chains continue from the right hand node as written.
                    State::Node(if direction == Direction::Backward { from } else { to })
                }
            };
        }

        match state {
            State::Idle | State::Node(_) => Ok(edges),
            State::Operator { start, .. } | State::Tail { start, .. } => {
                Err(self.error(start, "incomplete arrow"))
            }
            State::Predicate { open, .. } => Err(self.error(open - 1, "unterminated predicate")),
            State::Target { start, .. } => Err(self.error(start, "arrow must end at a node")),
        }
    }

    fn predicate(&self, open: usize, text: &str) -> Result<Term> {
        let term = Term::predicate_with(text, self.config)
            .map_err(|err| self.error(open, &err.to_string()))?;
        if term.as_str().starts_with("_:") {
            return Err(self.error(open, "predicate cannot be a blank node"));
        }
        Ok(term)
    }
}

impl ArrowPattern {
    /// Each distinct node's block in first-occurrence order, then one
    /// `from p to .` triple per edge.
    ///
    /// # Panics
    ///
    /// If a node of the pattern is not in `graph` (see [`Graph::contains`]).
    pub fn render(&self, graph: &Graph) -> String {
        let mut visited = roaring::RoaringBitmap::new();
        let mut blocks = Vec::new();
        for id in &self.nodes {
            graph.flatten_into(*id, &mut visited, &mut blocks);
        }
        for edge in &self.edges {
            blocks.push(format!(
                "{} {} {} .",
                graph.subject(self.nodes[edge.from]),
                edge.predicate,
                graph.subject(self.nodes[edge.to])
            ));
        }
        blocks.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> (Graph, NodeId, NodeId, NodeId) {
        let mut graph = Graph::new();
        let a = graph.describe("?a a ex:Person").unwrap().id();
        let b = graph.describe("?b a ex:Person").unwrap().id();
        let c = graph.describe("?c").unwrap().id();
        (graph, a, b, c)
    }

    fn offset(result: Result<ArrowPattern>) -> usize {
        match result {
            Err(Error::Parse { offset, .. }) => offset,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn forward_arrow_renders_blocks_then_edge() {
        let (graph, a, b, _) = people();
        let pattern =
            parse_arrows(&[Segment::Node(a), "-[ex:knows]->".into(), Segment::Node(b)]).unwrap();
        assert_eq!(pattern.edges.len(), 1);
        assert_eq!(pattern.edges[0].direction, Direction::Forward);
        assert_eq!(
            pattern.render(&graph),
            "?a\n  a ex:Person .\n?b\n  a ex:Person .\n?a ex:knows ?b ."
        );
    }

    #[test]
    fn backward_arrow_swaps_ends() {
        let (graph, a, b, _) = people();
        let pattern =
            parse_arrows(&[a.into(), " <-[ex:knows]- ".into(), b.into()]).unwrap();
        assert_eq!(pattern.edges[0].direction, Direction::Backward);
        assert!(pattern.render(&graph).ends_with("?b ex:knows ?a ."));
    }

    #[test]
    fn undirected_arrow_keeps_written_order() {
        let (graph, a, b, _) = people();
        let pattern = parse_arrows(&[b.into(), "-[ex:near]-".into(), a.into()]).unwrap();
        assert_eq!(pattern.edges[0].direction, Direction::Undirected);
        assert!(pattern.render(&graph).ends_with("?b ex:near ?a ."));
    }

    #[test]
    fn chains_and_repeated_nodes() {
        let (graph, a, b, c) = people();
        let pattern = parse_arrows(&[
            a.into(),
            "-[ex:knows]->".into(),
            b.into(),
            "-[ex:knows]->".into(),
            c.into(),
            ", ".into(),
            c.into(),
            "-[ex:likes]->".into(),
            a.into(),
        ])
        .unwrap();
        assert_eq!(pattern.nodes, vec![a, b, c, c, a]);
        assert_eq!(pattern.edges.len(), 3);
        let text = pattern.render(&graph);
        assert_eq!(text.matches("?a\n").count(), 1);
        assert!(text.ends_with("?a ex:knows ?b .\n?b ex:knows ?c .\n?c ex:likes ?a ."));
    }

    #[test]
    fn terminators_separate_patterns() {
        let (_, a, b, c) = people();
        let pattern = parse_arrows(&[
            a.into(),
            "-[ex:knows]->".into(),
            b.into(),
            " .\n".into(),
            b.into(),
            "-[ex:knows]->".into(),
            c.into(),
            " .".into(),
        ])
        .unwrap();
        assert_eq!(pattern.edges.len(), 2);
        assert_eq!(offset(parse_arrows(&[a.into(), "-[ex:knows]-> .".into(), b.into()])), 3);
    }

    #[test]
    fn unmatched_nodes_still_render() {
        let (graph, a, b, _) = people();
        let pattern = parse_arrows(&[a.into(), " ".into(), b.into()]).unwrap();
        assert!(pattern.edges.is_empty());
        assert_eq!(pattern.render(&graph), "?a\n  a ex:Person .\n?b\n  a ex:Person .");
    }

    #[test]
    fn malformed_arrows_report_offsets() {
        let (_, a, b, _) = people();
        // "$0$" is three bytes.
        assert_eq!(offset(parse_arrows(&[a.into(), "-[ex:knows->".into(), b.into()])), 4);
        assert_eq!(offset(parse_arrows(&[a.into(), "-[ex:knows]>".into(), b.into()])), 14);
        assert_eq!(offset(parse_arrows(&[a.into(), "<-[ex:knows]->".into(), b.into()])), 3);
        assert_eq!(offset(parse_arrows(&["-[ex:knows]->".into(), b.into()])), 0);
        assert_eq!(offset(parse_arrows(&[a.into(), "-[ex:knows]-> ?b".into()])), 3);
        assert_eq!(offset(parse_arrows(&[a.into(), "-[bad key]->".into(), b.into()])), 5);
        assert_eq!(offset(parse_arrows(&[a.into(), " knows ".into(), b.into()])), 4);
    }

    #[test]
    fn nul_in_text_is_rejected() {
        let (_, a, _, _) = people();
        assert!(matches!(
            parse_arrows(&[a.into(), "\0".into()]),
            Err(Error::Validation { .. })
        ));
    }
}
