use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::fetch::{FetchedSnapshot, SnapshotSource};
use super::graph::{Edge, GraphSnapshot, Node};

#[derive(Clone, Debug, Deserialize)]
struct LogEntry {
    event: String,
    #[serde(default)]
    args: Map<String, Value>,
}

#[derive(Clone, Debug)]
struct BlockEvents {
    height: u64,
    entries: Vec<LogEntry>,
}

/// Channel events of the HOPR channels contract, replayed up to a block height.
#[derive(Clone, Debug)]
pub struct EventLog {
    blocks: Vec<BlockEvents>,
}

impl EventLog {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read event log {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse event log {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let parsed: Value = serde_json::from_str(raw).context("invalid JSON in event log")?;
        let blocks = parsed
            .get("blocks")
            .and_then(Value::as_object)
            .ok_or_else(|| anyhow!("event log has no 'blocks' map"))?;

        let mut ordered = Vec::with_capacity(blocks.len());
        for (height, transactions) in blocks {
            let height = height
                .parse::<u64>()
                .with_context(|| format!("block key '{height}' is not a height"))?;
            let transactions = transactions
                .as_object()
                .ok_or_else(|| anyhow!("block {height} is not a transaction map"))?;

            let mut entries = Vec::new();
            for (tx, logs) in transactions {
                let logs = logs
                    .as_object()
                    .ok_or_else(|| anyhow!("transaction {tx} is not a log map"))?;
                for (log_index, entry) in logs {
                    let entry = LogEntry::deserialize(entry)
                        .with_context(|| format!("invalid log entry {tx}/{log_index}"))?;
                    entries.push(entry);
                }
            }
            ordered.push(BlockEvents { height, entries });
        }
        ordered.sort_by_key(|block| block.height);

        Ok(Self { blocks: ordered })
    }

    pub fn replay(&self, block_height: u64) -> GraphSnapshot {
        // Keyed by account and by (source, destination), in first-seen order.
        let mut nodes: IndexMap<String, Node> = IndexMap::new();
        let mut channels: IndexMap<(String, String), Edge> = IndexMap::new();
        let mut opened = 0usize;
        let mut closed = 0usize;

        for block in self.blocks.iter().take_while(|block| block.height <= block_height) {
            for entry in &block.entries {
                match entry.event.as_str() {
                    "Announcement" => {
                        let Some(account) = lowercase_arg(&entry.args, "account") else {
                            warn!("announcement at block {} has no account", block.height);
                            continue;
                        };
                        if nodes.contains_key(&account) {
                            debug!("{account} already announced to the network");
                        } else {
                            nodes.insert(account.clone(), Node::new(account));
                        }
                    }
                    "ChannelOpened" => {
                        let Some(key) = channel_endpoints(&entry.args) else {
                            warn!("channel open at block {} lacks endpoints", block.height);
                            continue;
                        };
                        if channels.contains_key(&key) {
                            debug!("({},{}) already exists", key.0, key.1);
                        } else {
                            debug!("channel opened {}:{}", key.0, key.1);
                            opened += 1;
                            let edge = Edge::new(key.0.clone(), key.1.clone());
                            channels.insert(key, edge);
                        }
                    }
                    "ChannelFunded" | "ChannelUpdated" => {
                        let Some(key) = channel_endpoints(&entry.args) else {
                            continue;
                        };
                        match channels.get_mut(&key) {
                            Some(edge) => {
                                if let Some(balance) = channel_balance(&entry.args) {
                                    edge.set_attribute("weight", balance.clone());
                                }
                            }
                            None => warn!("channel {}:{} not previously seen", key.0, key.1),
                        }
                    }
                    "ChannelClosureFinalized" => {
                        let Some(key) = channel_endpoints(&entry.args) else {
                            continue;
                        };
                        if channels.shift_remove(&key).is_some() {
                            debug!("channel closed {}:{}", key.0, key.1);
                            closed += 1;
                        } else {
                            debug!("({},{}) does not exist", key.0, key.1);
                        }
                    }
                    _ => {}
                }
            }
        }

        info!("replayed to block {block_height}: channels opened/closed {opened}/{closed}");
        GraphSnapshot {
            nodes: nodes.into_values().collect(),
            edges: channels.into_values().collect(),
        }
    }
}

impl SnapshotSource for EventLog {
    fn fetch(&self, block_height: u64) -> FetchedSnapshot {
        FetchedSnapshot::complete(self.replay(block_height))
    }
}

fn lowercase_arg(args: &Map<String, Value>, name: &str) -> Option<String> {
    args.get(name).and_then(Value::as_str).map(str::to_lowercase)
}

fn channel_endpoints(args: &Map<String, Value>) -> Option<(String, String)> {
    Some((lowercase_arg(args, "source")?, lowercase_arg(args, "destination")?))
}

fn channel_balance(args: &Map<String, Value>) -> Option<&Value> {
    args.get("balance")
        .or_else(|| args.get("newState").and_then(|state| state.get("balance")))
        .filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;
    use crate::network::graph::Attributed;

    const LOG: &str = r#"{
        "blocks": {
            "20570500": {
                "0xtx1": {
                    "0": {"event": "Announcement", "args": {"account": "0xAAAAAAAAAAAA", "publicKey": "pk-a"}},
                    "1": {"event": "Announcement", "args": {"account": "0xBBBBBBBBBBBB", "publicKey": "pk-b"}}
                }
            },
            "20570430": {
                "0xtx0": {
                    "0": {"event": "Announcement", "args": {"account": "0xCCCCCCCCCCCC", "publicKey": "pk-c"}}
                }
            },
            "20570600": {
                "0xtx2": {
                    "0": {"event": "ChannelOpened", "args": {"source": "0xAAAAAAAAAAAA", "destination": "0xBBBBBBBBBBBB"}},
                    "1": {"event": "ChannelFunded", "args": {"source": "0xAAAAAAAAAAAA", "destination": "0xBBBBBBBBBBBB", "balance": "250"}},
                    "2": {"event": "ChannelOpened", "args": {"source": "0xAAAAAAAAAAAA", "destination": "0xBBBBBBBBBBBB"}}
                }
            },
            "20570700": {
                "0xtx3": {
                    "0": {"event": "ChannelUpdated", "args": {"source": "0xaaaaaaaaaaaa", "destination": "0xbbbbbbbbbbbb", "newState": {"balance": "90"}}},
                    "1": {"event": "ChannelOpened", "args": {"source": "0xBBBBBBBBBBBB", "destination": "0xCCCCCCCCCCCC"}}
                }
            },
            "20570800": {
                "0xtx4": {
                    "0": {"event": "ChannelClosureFinalized", "args": {"source": "0xAAAAAAAAAAAA", "destination": "0xBBBBBBBBBBBB"}},
                    "1": {"event": "TicketRedeemed", "args": {}}
                }
            }
        }
    }"#;

    #[test]
    fn announcements_are_ordered_by_block_and_deduplicated() {
        let log = EventLog::parse(LOG).unwrap();
        let snapshot = log.replay(20_570_500);

        let ids = snapshot.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["0xcccccccccccc", "0xaaaaaaaaaaaa", "0xbbbbbbbbbbbb"]);
        assert_eq!(snapshot.nodes[1].label, "0xaaaaaaaa");
        assert!(snapshot.edges.is_empty());
    }

    #[test]
    fn funding_and_updates_set_channel_weight() {
        let log = EventLog::parse(LOG).unwrap();

        let funded = log.replay(20_570_600);
        assert_eq!(funded.edges.len(), 1);
        assert_eq!(funded.edges[0].attribute("weight"), Some(&json!("250")));

        let updated = log.replay(20_570_700);
        assert_eq!(updated.edges.len(), 2);
        assert_eq!(updated.edges[0].attribute("weight"), Some(&json!("90")));
        assert_eq!(updated.edges[1].attribute("weight"), None);
    }

    #[test]
    fn finalized_closure_removes_channel() {
        let log = EventLog::parse(LOG).unwrap();
        let snapshot = log.replay(u64::MAX);

        assert_eq!(snapshot.edges.len(), 1);
        assert_eq!(snapshot.edges[0].source, "0xbbbbbbbbbbbb");
        assert_eq!(snapshot.edges[0].target, "0xcccccccccccc");
    }

    #[test]
    fn reopened_channel_moves_to_the_end() {
        let log = EventLog::parse(
            r#"{"blocks": {
                "1": {"0xtx": {
                    "0": {"event": "ChannelOpened", "args": {"source": "0xa", "destination": "0xb"}},
                    "1": {"event": "ChannelOpened", "args": {"source": "0xb", "destination": "0xc"}},
                    "2": {"event": "ChannelFunded", "args": {"source": "0xa", "destination": "0xb", "balance": "5"}}
                }},
                "2": {"0xtx": {
                    "0": {"event": "ChannelClosureFinalized", "args": {"source": "0xa", "destination": "0xb"}},
                    "1": {"event": "ChannelOpened", "args": {"source": "0xa", "destination": "0xb"}}
                }}
            }}"#,
        )
        .unwrap();

        let snapshot = log.replay(2);
        let pairs = snapshot
            .edges
            .iter()
            .map(|edge| (edge.source.as_str(), edge.target.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(pairs, [("0xb", "0xc"), ("0xa", "0xb")]);
        assert_eq!(snapshot.edges[1].attribute("weight"), None);
    }

    #[test]
    fn height_before_any_block_is_empty() {
        let log = EventLog::parse(LOG).unwrap();
        assert!(log.replay(1).is_empty());
    }

    #[test]
    fn rejects_log_without_blocks() {
        assert!(EventLog::parse(r#"{"events": []}"#).is_err());
        assert!(EventLog::parse(r#"{"blocks": {"tip": {}}}"#).is_err());
    }

    #[test]
    fn loads_from_file_as_a_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LOG.as_bytes()).unwrap();

        let log = EventLog::load(file.path()).unwrap();
        let fetched = log.fetch(20_570_700);
        assert!(!fetched.status.is_degraded());
        assert_eq!(fetched.snapshot.nodes.len(), 3);
    }
}
