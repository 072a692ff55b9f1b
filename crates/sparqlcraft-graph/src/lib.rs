//! Triple patterns, node graphs and arrow patterns built from
//! [`sparqlcraft_term`] terms.
//!
//! - [`PatternBuilder`] emits single triples and shared-subject blocks.
//! - [`Graph`] holds nodes (typed, with properties that may point at other
//!   nodes) and relationships, and flattens them into blocks. Cycles are
//!   broken by a per-call visited set.
//! - [`parse_arrows`] reads `${a} -[p]-> ${b}` style patterns over graph nodes.

pub mod arrow;
pub mod describe;
pub mod digest;
pub mod node;
pub mod pattern;
pub mod relationship;

pub use arrow::{parse_arrows, parse_arrows_with, ArrowPattern, Direction, EdgeMatch, Segment};
pub use describe::{parse_description, parse_description_with, NodeDescription};
pub use digest::statement_digest;
pub use node::{Graph, NodeBuilder, NodeId};
pub use pattern::{quoted_triple, triple, triples, triples_map, PatternBuilder};
pub use relationship::Relationship;

pub use sparqlcraft_term::{Error, RenderConfig, Result, Term, Value};
