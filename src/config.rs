//! Persistent configuration for datactl.
//!
//! Settings are read from `~/.datactl/config.json` unless another file is
//! given with `--config` or `DATACTL_CONFIG`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DatactlError, Result};

const CONFIG_FILENAME: &str = "config.json";

/// `~/.datactl`, or `.datactl` when there is no home directory.
pub fn datactl_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".datactl"))
        .unwrap_or_else(|| PathBuf::from(".datactl"))
}

fn default_scripts_dir() -> PathBuf {
    datactl_dir().join("scripts")
}

fn default_state_file() -> PathBuf {
    datactl_dir().join("platform.json")
}

fn default_log_comments() -> bool {
    true
}

/// datactl configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where named scripts are looked up
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    /// Platform state file
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Log visible script comments
    #[serde(default = "default_log_comments")]
    pub log_comments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
            state_file: default_state_file(),
            log_comments: default_log_comments(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location.
    ///
    /// A missing file gives the defaults; a file that cannot be parsed is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| datactl_dir().join(CONFIG_FILENAME));
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| DatactlError::Config(format!("{}: {}", path.display(), e)))
    }
}
