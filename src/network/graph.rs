use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::ViewError;
use crate::util::short_label;

/// Anything carrying a named attribute map, as served by the indexer.
pub trait Attributed {
    fn attributes(&self) -> &Map<String, Value>;

    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes().get(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Edge,
}

impl ElementKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    data: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let label = short_label(&id).to_string();
        Self::with_label(id, label)
    }

    pub fn with_label(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        let label = label.into();
        let mut data = Map::new();
        data.insert("id".to_string(), Value::String(id.clone()));
        data.insert("label".to_string(), Value::String(label.clone()));
        Self { id, label, data }
    }

    /// Builds a node from its `data` record. `None` when `id` is missing or not a string.
    pub fn from_data(mut data: Map<String, Value>) -> Option<Self> {
        let id = data.get("id")?.as_str()?.to_string();
        let label = match data.get("label").and_then(Value::as_str) {
            Some(label) => label.to_string(),
            None => {
                let label = short_label(&id).to_string();
                data.insert("label".to_string(), Value::String(label.clone()));
                label
            }
        };
        Some(Self { id, label, data })
    }

    #[cfg(test)]
    pub fn attribute_named(mut self, name: &str, value: Value) -> Self {
        self.data.insert(name.to_string(), value);
        self
    }
}

impl Attributed for Node {
    fn attributes(&self) -> &Map<String, Value> {
        &self.data
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    data: Map<String, Value>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        let mut data = Map::new();
        data.insert("source".to_string(), Value::String(source.clone()));
        data.insert("target".to_string(), Value::String(target.clone()));
        Self { source, target, data }
    }

    /// Builds an edge from its `data` record. `None` unless both endpoints are strings.
    pub fn from_data(data: Map<String, Value>) -> Option<Self> {
        let source = data.get("source")?.as_str()?.to_string();
        let target = data.get("target")?.as_str()?.to_string();
        Some(Self { source, target, data })
    }

    pub fn set_attribute(&mut self, name: &str, value: Value) {
        self.data.insert(name.to_string(), value);
    }

    #[cfg(test)]
    pub fn attribute_named(mut self, name: &str, value: Value) -> Self {
        self.set_attribute(name, value);
        self
    }
}

impl Attributed for Edge {
    fn attributes(&self) -> &Map<String, Value> {
        &self.data
    }
}

/// The node and edge sets of one block height.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Keeps the nodes that appear as an endpoint of some edge, in input order.
pub fn filter_connected(nodes: &[Node], edges: &[Edge]) -> Result<Vec<Node>, ViewError> {
    let known_ids = nodes.iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();
    let mut referenced = HashSet::with_capacity(edges.len() * 2);

    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !known_ids.contains(endpoint.as_str()) {
                return Err(ViewError::Lookup {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    missing: endpoint.clone(),
                });
            }
            referenced.insert(endpoint.as_str());
        }
    }

    Ok(nodes
        .iter()
        .filter(|node| referenced.contains(node.id.as_str()))
        .cloned()
        .collect())
}
