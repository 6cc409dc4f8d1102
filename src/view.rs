use log::{debug, info, warn};

use crate::config::StyleConfig;
use crate::error::ViewError;
use crate::network::{Edge, Node, SnapshotSource, SnapshotStatus, filter_connected};
use crate::style::{
    STAKE_ATTRIBUTE, StyleRule, ValueRange, WEIGHT_ATTRIBUTE, base_rules, edge_width_rules,
    node_appearance_rules, value_range,
};

/// Everything a rendering surface needs for one block height.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub block_height: u64,
    pub status: SnapshotStatus,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub rules: Vec<StyleRule>,
    pub weight_range: ValueRange,
    pub stake_range: ValueRange,
}

pub fn build_view(
    source: &dyn SnapshotSource,
    block_height: u64,
    style: &StyleConfig,
) -> Result<View, ViewError> {
    let fetched = source.fetch(block_height);
    if let SnapshotStatus::Degraded { reason } = &fetched.status {
        warn!("building an empty view for block {block_height}: {reason}");
    } else if fetched.snapshot.is_empty() {
        debug!("no nodes or channels exist at block {block_height}");
    }

    let edges = fetched.snapshot.edges;
    let nodes = filter_connected(&fetched.snapshot.nodes, &edges)?;

    // Only connected nodes calibrate the stake scale.
    let weight_range = value_range(&edges, WEIGHT_ATTRIBUTE)?;
    let stake_range = value_range(&nodes, STAKE_ATTRIBUTE)?;

    let mut rules = base_rules(style);
    rules.extend(edge_width_rules(&edges, style.width_class_count)?);
    rules.extend(node_appearance_rules(
        &nodes,
        &style.palette,
        style.base_size,
        style.size_step,
    )?);

    info!(
        "view for block {block_height}: {} of {} nodes connected, {} edges, {} style rules",
        nodes.len(),
        fetched.snapshot.nodes.len(),
        edges.len(),
        rules.len()
    );

    Ok(View {
        block_height,
        status: fetched.status,
        nodes,
        edges,
        rules,
        weight_range,
        stake_range,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::network::{FetchedSnapshot, GraphSnapshot};

    struct StaticSource(FetchedSnapshot);

    impl SnapshotSource for StaticSource {
        fn fetch(&self, _block_height: u64) -> FetchedSnapshot {
            self.0.clone()
        }
    }

    fn staked(id: &str, stake: &str) -> Node {
        Node::new(id).attribute_named(STAKE_ATTRIBUTE, json!(stake))
    }

    fn weighted(source: &str, target: &str, weight: &str) -> Edge {
        Edge::new(source, target).attribute_named(WEIGHT_ATTRIBUTE, json!(weight))
    }

    fn source_of(nodes: Vec<Node>, edges: Vec<Edge>) -> StaticSource {
        StaticSource(FetchedSnapshot::complete(GraphSnapshot { nodes, edges }))
    }

    #[test]
    fn builds_filtered_view_with_rules() {
        let source = source_of(
            vec![staked("a", "10"), staked("b", "30"), staked("c", "1000")],
            vec![weighted("a", "b", "5")],
        );
        let style = StyleConfig::default();

        let view = build_view(&source, 20_600_000, &style).unwrap();

        assert_eq!(view.status, SnapshotStatus::Complete);
        assert_eq!(
            view.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>(),
            ["a", "b"]
        );
        assert_eq!(view.edges.len(), 1);
        assert_eq!(view.weight_range.bounds(), (5.0, 5.0));
        assert_eq!(view.stake_range.bounds(), (10.0, 30.0));
        assert_eq!(view.rules.len(), 1 + style.width_class_count + style.palette.len());

        let node_selectors = view.rules[6..]
            .iter()
            .map(|rule| rule.selector.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            node_selectors,
            [
                "node[stake > 10]",
                "node[stake > 15]",
                "node[stake > 20]",
                "node[stake > 25]",
                "node[stake > 30]",
            ]
        );
    }

    #[test]
    fn degraded_source_yields_empty_view() {
        let source = StaticSource(FetchedSnapshot::degraded("connection refused"));
        let view = build_view(&source, 1, &StyleConfig::default()).unwrap();

        assert!(view.nodes.is_empty());
        assert!(view.edges.is_empty());
        assert!(view.status.is_degraded());
        assert!(view.weight_range.is_empty());
    }

    #[test]
    fn inconsistent_snapshot_fails_the_build() {
        let source = source_of(vec![Node::new("a")], vec![Edge::new("a", "z")]);
        let error = build_view(&source, 1, &StyleConfig::default()).unwrap_err();
        assert!(matches!(error, ViewError::Lookup { ref missing, .. } if missing == "z"));
    }

    #[test]
    fn malformed_stake_fails_the_build() {
        let source = source_of(
            vec![staked("a", "ten"), Node::new("b")],
            vec![Edge::new("a", "b")],
        );
        let error = build_view(&source, 1, &StyleConfig::default()).unwrap_err();
        assert!(matches!(error, ViewError::Parse { ref attribute, .. } if attribute == STAKE_ATTRIBUTE));
    }

    #[test]
    fn repeated_builds_are_identical() {
        let source = source_of(
            vec![staked("a", "3"), staked("b", "9"), Node::new("c")],
            vec![weighted("a", "b", "2"), weighted("b", "c", "11")],
        );
        let style = StyleConfig::default();
        assert_eq!(
            build_view(&source, 7, &style).unwrap(),
            build_view(&source, 7, &style).unwrap()
        );
    }
}
