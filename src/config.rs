use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CURRENCY_SYMBOL: &str = "$";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    pub(crate) storage: Option<StorageConfig>,
    pub(crate) display: Option<DisplayConfig>,
    pub(crate) log: Option<LogConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StorageConfig {
    pub(crate) path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DisplayConfig {
    pub(crate) currency_symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LogConfig {
    pub(crate) level: Option<String>,
}

/// Platform directories for the database, log file and config file.
pub(crate) struct AppDirs {
    pub(crate) data_dir: PathBuf,
    pub(crate) config_file: PathBuf,
}

impl AppDirs {
    pub(crate) fn resolve() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "paycheck", "Paycheck")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(Self {
            data_dir,
            config_file: proj_dirs.config_dir().join("config.toml"),
        })
    }
}

impl Config {
    /// Read the config file. A missing file means defaults.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("In {}", path.display()))
    }

    pub(crate) fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config TOML")
    }

    /// Database location: `PAYCHECK_DB`, then the config file, then the data dir.
    pub(crate) fn db_path(&self, data_dir: &Path) -> PathBuf {
        if let Some(path) = std::env::var_os("PAYCHECK_DB").filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        self.storage
            .as_ref()
            .and_then(|s| s.path.clone())
            .unwrap_or_else(|| data_dir.join("paycheck.db"))
    }

    pub(crate) fn currency_symbol(&self) -> String {
        self.display
            .as_ref()
            .and_then(|d| d.currency_symbol.clone())
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string())
    }

    pub(crate) fn log_level(&self) -> String {
        self.log
            .as_ref()
            .and_then(|l| l.level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}
