use crate::environment::{get_config_file, get_data_file};
use crate::pipeline::DEFAULT_QUEUE_CAPACITY;
use anyhow::Context as _;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqish_types::{SqishError, SqishResult};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "config.toml";
pub const DATABASE_FILE: &str = "sqish.db";
const DEFAULT_LIMIT: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// History database; `~` is expanded. Defaults to the XDG data dir.
    pub database: Option<String>,
    /// Max rows per query.
    pub limit: usize,
    /// Capacity of the search pipeline queues.
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            database: None,
            limit: DEFAULT_LIMIT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Config {
    fn read_file(name: &str) -> Result<Self> {
        let file_path = get_config_file(name)?;
        let toml_str = std::fs::read_to_string(&file_path)
            .with_context(|| format!("failed to read {}", file_path.display()))?;
        let config: Config = toml::from_str(&toml_str)?;
        Ok(config)
    }

    pub fn from_file(name: &str) -> Self {
        match Config::read_file(name) {
            Ok(conf) => conf,
            Err(err) => {
                if err.chain().any(|cause| {
                    cause
                        .downcast_ref::<std::io::Error>()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
                }) {
                    debug!("no config file, using defaults");
                } else {
                    warn!("ignoring invalid config: {err:#}");
                }
                Config::default()
            }
        }
    }

    /// Database path: the explicit `cli` value, then the config file, then
    /// the XDG data file.
    pub fn database_path(&self, cli: Option<&str>) -> Result<PathBuf> {
        match cli.or(self.database.as_deref()) {
            Some(path) => Ok(PathBuf::from(shellexpand::tilde(path).as_ref())),
            None => get_data_file(DATABASE_FILE),
        }
    }

    pub fn validate(&self) -> SqishResult<()> {
        if self.queue_capacity == 0 {
            return Err(SqishError::Config(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Row limit for queries; zero means unlimited.
    pub fn query_limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }
}
