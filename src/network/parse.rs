use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FetchError;

use super::graph::{Edge, GraphSnapshot, Node};

#[derive(Debug, Deserialize)]
struct RawElement {
    data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<RawElement>,
    #[serde(default)]
    edges: Vec<RawElement>,
}

/// Decodes the indexer's `format=cytoscape` body.
pub(super) fn parse_cytoscape_graph(raw: &str) -> Result<GraphSnapshot, FetchError> {
    let parsed: RawGraph = serde_json::from_str(raw)
        .map_err(|error| FetchError::Body(format!("invalid graph JSON: {error}")))?;

    let nodes = parsed
        .nodes
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            Node::from_data(element.data)
                .ok_or_else(|| FetchError::Body(format!("node record {index} has no string id")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let edges = parsed
        .edges
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            Edge::from_data(element.data).ok_or_else(|| {
                FetchError::Body(format!("edge record {index} lacks a string source or target"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GraphSnapshot { nodes, edges })
}
