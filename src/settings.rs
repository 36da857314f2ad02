use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DUMP_TIMEOUT_SECS: u64 = 3600;

// Optional overrides loaded from settings.toml. Every field has a working
// default, so a missing file is not an error.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Settings {
    pub tool_dirs: Option<Vec<String>>,
    pub command_timeout_secs: Option<u64>,
    pub dump_timeout_secs: Option<u64>,
    pub config_file: Option<String>,
    pub history_file: Option<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let settings_str = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&settings_str)?;
        Ok(settings)
    }

    pub fn tool_dirs(&self) -> Vec<PathBuf> {
        self.tool_dirs
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(PathBuf::from)
            .collect()
    }

    // Timeout for schtasks/tasklist style commands that answer quickly.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(
            self.command_timeout_secs
                .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS),
        )
    }

    // Timeout for dump/restore runs, which can take a long time.
    pub fn dump_timeout(&self) -> Duration {
        Duration::from_secs(self.dump_timeout_secs.unwrap_or(DEFAULT_DUMP_TIMEOUT_SECS))
    }
}
