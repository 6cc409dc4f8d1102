mod fetch;
mod graph;
mod parse;
mod replay;

pub use fetch::{FetchedSnapshot, IndexerClient, SnapshotSource, SnapshotStatus};
pub use graph::{Attributed, Edge, ElementKind, GraphSnapshot, Node, filter_connected};
pub use replay::EventLog;
