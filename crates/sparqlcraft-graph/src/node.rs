//! Node graphs and their flattening into subject blocks.
//!
//! Nodes live in a [`Graph`] arena and refer to each other by [`NodeId`], so
//! cyclic graphs are ordinary data. Flattening walks depth first from a root
//! and keeps an index-keyed visited bitmap for the duration of one call:
//!
//! 1. a visited node is skipped (its subject can still be referenced),
//! 2. otherwise its own `a type` + property block is emitted, with nested
//!    nodes written as their subject term,
//! 3. then its nested nodes are visited in property-declaration order.

use roaring::RoaringBitmap;
use serde::Serialize;
use sparqlcraft_term::{Error, RenderConfig, Result, Term, Value};

use crate::describe::{parse_description_with, type_term};
use crate::pattern::PatternBuilder;
use crate::relationship::Relationship;

/// Stable index of a node inside its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PropertyValue {
    Term(Term),
    Node(NodeId),
}

#[derive(Debug, Clone)]
struct NodeData {
    subject: Term,
    types: Vec<Term>,
    properties: Vec<(Term, Vec<PropertyValue>)>,
}

/// Arena of nodes plus free-standing relationships.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    builder: PatternBuilder,
    nodes: Vec<NodeData>,
    relationships: Vec<Relationship>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            builder: PatternBuilder::new(config),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RenderConfig {
        self.builder.config()
    }

    /// Add a node with the given subject term.
    pub fn node(&mut self, subject: Term) -> NodeBuilder<'_> {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            subject,
            types: Vec::new(),
            properties: Vec::new(),
        });
        NodeBuilder { graph: self, id }
    }

    /// Add a node from a compact description such as
    /// `"?product a schema:Product"`. Nothing is added if it does not parse.
    pub fn describe(&mut self, description: &str) -> Result<NodeBuilder<'_>> {
        let parsed = parse_description_with(description, self.config())?;
        let id = self.node(parsed.subject).id();
        self.nodes[id.index()].types = parsed.types;
        Ok(NodeBuilder { graph: self, id })
    }

    /// Reopen an existing node for further properties.
    ///
    /// # Panics
    ///
    /// If `id` was not issued by this graph.
    pub fn edit(&mut self, id: NodeId) -> NodeBuilder<'_> {
        assert!(self.contains(id), "node {id:?} is not in this graph");
        NodeBuilder { graph: self, id }
    }

    /// Whether `id` names a node of this graph.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// # Panics
    ///
    /// If `id` was not issued by this graph.
    pub fn subject(&self, id: NodeId) -> &Term {
        &self.nodes[id.index()].subject
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A relationship validated and reified under this graph's configuration.
    pub fn relationship(&self, from: Term, predicate: &str, to: Term) -> Result<Relationship> {
        Relationship::between_with(from, predicate, to, self.config())
    }

    /// Relationships render with this graph's configuration, whatever they
    /// were built with.
    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    pub fn pattern_builder(&self) -> &PatternBuilder {
        &self.builder
    }

    /// Blocks reachable from `root`, each node once.
    ///
    /// # Panics
    ///
    /// If `root` was not issued by this graph.
    pub fn flatten(&self, root: NodeId) -> String {
        let mut visited = RoaringBitmap::new();
        let mut blocks = Vec::new();
        self.flatten_into(root, &mut visited, &mut blocks);
        blocks.join("\n")
    }

    /// Every node in insertion order (sharing one visited set), then every
    /// relationship.
    pub fn render(&self) -> String {
        let mut visited = RoaringBitmap::new();
        let mut blocks = Vec::new();
        for index in 0..self.nodes.len() {
            self.flatten_into(NodeId(index as u32), &mut visited, &mut blocks);
        }
        for relationship in &self.relationships {
            blocks.push(relationship.render_with(&self.builder));
        }
        blocks.join("\n")
    }

    /// Append the blocks reachable from `root` that are not yet in `visited`.
    pub(crate) fn flatten_into(
        &self,
        root: NodeId,
        visited: &mut RoaringBitmap,
        blocks: &mut Vec<String>,
    ) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id.0) {
                tracing::trace!(
                    subject = %self.subject(id),
                    "node already emitted; breaking cycle"
                );
                continue;
            }
            let node = &self.nodes[id.index()];
            let block = self.node_block(node);
            if !block.is_empty() {
                blocks.push(block);
            }
            let nested: Vec<NodeId> = node
                .properties
                .iter()
                .flat_map(|(_, values)| values)
                .filter_map(|v| match v {
                    PropertyValue::Node(n) => Some(*n),
                    PropertyValue::Term(_) => None,
                })
                .collect();
            stack.extend(nested.into_iter().rev());
        }
    }

    fn node_block(&self, node: &NodeData) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        for ty in &node.types {
            pairs.push(("a", ty.as_str()));
        }
        for (predicate, values) in &node.properties {
            for value in values {
                let object = match value {
                    PropertyValue::Term(t) => t.as_str(),
                    PropertyValue::Node(n) => self.subject(*n).as_str(),
                };
                pairs.push((predicate.as_str(), object));
            }
        }
        self.builder.block(node.subject.as_str(), &pairs)
    }
}

/// Chained, exclusive access to one node of a [`Graph`].
///
/// Values are converted as they are added, so every error surfaces here and
/// flattening cannot fail.
pub struct NodeBuilder<'g> {
    graph: &'g mut Graph,
    id: NodeId,
}

impl<'g> NodeBuilder<'g> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Add a type reference (`a <type>`): an IRI, prefixed name or variable.
    pub fn a(self, ty: &str) -> Result<Self> {
        let ty = type_term(ty, self.graph.config())?;
        self.graph.nodes[self.id.index()].types.push(ty);
        Ok(self)
    }

    /// Add a value under `predicate`. Array values add one entry per element;
    /// repeated predicates accumulate in first-insertion order.
    pub fn prop(mut self, predicate: &str, value: impl Into<Value>) -> Result<Self> {
        let predicate = Term::predicate_with(predicate, self.graph.config())?;
        let converter = self.graph.builder.converter();
        let converted = match value.into() {
            Value::Array(items) if !items.is_empty() => items
                .iter()
                .map(|item| converter.convert_default(item).map(PropertyValue::Term))
                .collect::<Result<Vec<_>>>()?,
            other => vec![PropertyValue::Term(converter.convert_default(&other)?)],
        };
        self.push(predicate, converted);
        Ok(self)
    }

    /// Point `predicate` at another node of the same graph.
    pub fn link(mut self, predicate: &str, target: NodeId) -> Result<Self> {
        if !self.graph.contains(target) {
            return Err(Error::validation(
                format!("{target:?}"),
                "linked node is not in this graph",
            ));
        }
        let predicate = Term::predicate_with(predicate, self.graph.config())?;
        self.push(predicate, vec![PropertyValue::Node(target)]);
        Ok(self)
    }

    fn push(&mut self, predicate: Term, values: Vec<PropertyValue>) {
        let properties = &mut self.graph.nodes[self.id.index()].properties;
        match properties.iter_mut().find(|(p, _)| *p == predicate) {
            Some((_, existing)) => existing.extend(values),
            None => properties.push((predicate, values)),
        }
    }
}
