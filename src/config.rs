use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::rcsb::{DEFAULT_DOWNLOAD_URL, DEFAULT_SEARCH_URL};

pub const DEFAULT_CONFIG_FILE: &str = "rcsb-harvest.json";
pub const DEFAULT_SAVE_DIR: &str = "pdb_files";
pub const DEFAULT_MAX_RESULTS: usize = 50;
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub save_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub search_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub save_dir: Utf8PathBuf,
    pub max_results: usize,
    pub batch_size: usize,
    pub search_url: String,
    pub download_url: String,
    pub timeout: Option<Duration>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ConfigLoader::resolve_config(Config::default())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads `path`, or `rcsb-harvest.json` from the working directory when
    /// no path is given. Only an explicit path is required to exist.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, HarvestError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(ResolvedConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| HarvestError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| HarvestError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        ResolvedConfig {
            save_dir: config
                .save_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_SAVE_DIR)),
            max_results: config.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            batch_size: config.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            search_url: config
                .search_url
                .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            download_url: config
                .download_url
                .unwrap_or_else(|| DEFAULT_DOWNLOAD_URL.to_string()),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}
