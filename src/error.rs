use thiserror::Error;

/// Failures that abort a view build. The caller keeps its previous view.
#[derive(Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("edge {source_id} -> {target_id} references unknown node {missing}")]
    Lookup {
        source_id: String,
        target_id: String,
        missing: String,
    },
    #[error("attribute '{attribute}' is not a number: {value}")]
    Parse { attribute: String, value: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Snapshot transport failures. These never leave the fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("indexer request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("indexer responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("indexer response could not be decoded: {0}")]
    Body(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("failed to parse TOML from '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}
