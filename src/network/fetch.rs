use std::time::Duration;

use log::{debug, warn};

use crate::error::FetchError;

use super::graph::GraphSnapshot;
use super::parse::parse_cytoscape_graph;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotStatus {
    Complete,
    /// The source failed; the snapshot is empty and says nothing about the network.
    Degraded { reason: String },
}

impl SnapshotStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchedSnapshot {
    pub snapshot: GraphSnapshot,
    pub status: SnapshotStatus,
}

impl FetchedSnapshot {
    pub fn complete(snapshot: GraphSnapshot) -> Self {
        Self {
            snapshot,
            status: SnapshotStatus::Complete,
        }
    }

    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            snapshot: GraphSnapshot::default(),
            status: SnapshotStatus::Degraded {
                reason: reason.into(),
            },
        }
    }
}

/// Where snapshots come from. Implementations never fail: problems degrade to an empty snapshot.
pub trait SnapshotSource {
    fn fetch(&self, block_height: u64) -> FetchedSnapshot;
}

pub struct IndexerClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl IndexerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::blocking::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn network_url(&self, block_height: u64) -> String {
        format!(
            "{}/network?format=cytoscape&blockHeight={block_height}",
            self.base_url
        )
    }

    fn request(&self, block_height: u64) -> Result<GraphSnapshot, FetchError> {
        let url = self.network_url(block_height);
        debug!("requesting network snapshot from {url}");

        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text()?;
        parse_cytoscape_graph(&body)
    }
}

impl SnapshotSource for IndexerClient {
    fn fetch(&self, block_height: u64) -> FetchedSnapshot {
        match self.request(block_height) {
            Ok(snapshot) => {
                debug!(
                    "indexer returned {} nodes and {} edges at block {block_height}",
                    snapshot.nodes.len(),
                    snapshot.edges.len()
                );
                FetchedSnapshot::complete(snapshot)
            }
            Err(error) => {
                warn!("snapshot for block {block_height} unavailable, continuing empty: {error}");
                FetchedSnapshot::degraded(error.to_string())
            }
        }
    }
}
