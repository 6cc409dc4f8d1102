use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_INDEXER_URL: &str = "http://localhost:3000";
pub const DEFAULT_EXPLORER_URL: &str =
    "https://blockscout.com/xdai/mainnet/address/{address}/transactions";

/// Block at which the channels contract was deployed.
pub const NETWORK_CREATION_HEIGHT: u64 = 20_570_425;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub indexer: IndexerConfig,
    pub blocks: BlockBounds,
    pub style: StyleConfig,
    pub explorer: ExplorerConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexerConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_INDEXER_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl IndexerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlockBounds {
    pub min: u64,
    pub max: Option<u64>,
}

impl Default for BlockBounds {
    fn default() -> Self {
        Self {
            min: NETWORK_CREATION_HEIGHT,
            max: None,
        }
    }
}

impl BlockBounds {
    pub fn contains(&self, height: u64) -> bool {
        height >= self.min && self.max.is_none_or(|max| height <= max)
    }
}

/// Visual tables handed to the rule generators.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    pub palette: Vec<String>,
    pub base_size: u32,
    pub size_step: u32,
    pub width_class_count: usize,
    pub node_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            palette: ["#E3EED9", "#BFD7B5", "#92BF86", "#5E9E5A", "#2F6F3A"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            base_size: 20,
            size_step: 15,
            width_class_count: 5,
            node_color: "#BFD7B5".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    pub address_url: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            address_url: DEFAULT_EXPLORER_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|error| ConfigError::FileRead(display.clone(), error))?;
        Self::from_toml(&raw, &display)
    }

    pub fn from_toml(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|error| ConfigError::TomlParse(origin.to_string(), error))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indexer.timeout_secs == 0 {
            return Err(invalid("indexer.timeout_secs", "must be at least 1"));
        }
        if self.style.palette.is_empty() {
            return Err(invalid("style.palette", "at least one colour is required"));
        }
        if self.style.width_class_count == 0 {
            return Err(invalid("style.width_class_count", "must be at least 1"));
        }
        if let Some(max) = self.blocks.max
            && max < self.blocks.min
        {
            return Err(invalid(
                "blocks.max",
                &format!("{max} is below blocks.min {}", self.blocks.min),
            ));
        }
        if !self.explorer.address_url.contains("{address}") {
            return Err(invalid("explorer.address_url", "missing {address} placeholder"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
