use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::config::{Job, JobStore};
use crate::error::{BackupError, Result};
use crate::history::HistoryStore;
use crate::service::mysql::MySqlTools;
use crate::service::scheduler::SchedulerBridge;
use crate::settings::Settings;
use crate::tools::ToolLocator;

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";
pub const DEFAULT_HISTORY_FILE: &str = "history.json";

// Shared handles for one invocation. The stores sit behind mutexes so a
// backup finishing in the background and a foreground command never write
// the same file at once.
pub struct App {
    pub jobs: Mutex<JobStore>,
    pub history: Mutex<HistoryStore>,
    pub tools: MySqlTools,
    pub bridge: SchedulerBridge,
    pub command_timeout: Duration,
}

impl App {
    // Explicit command-line paths win over settings, settings over the
    // working-directory defaults.
    pub fn new(
        settings: &Settings,
        config_override: Option<PathBuf>,
        history_override: Option<PathBuf>,
    ) -> App {
        let config_path = config_override
            .or_else(|| settings.config_file.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let history_path = history_override
            .or_else(|| settings.history_file.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE));

        App {
            jobs: Mutex::new(JobStore::new(config_path)),
            history: Mutex::new(HistoryStore::new(history_path)),
            tools: MySqlTools::new(
                ToolLocator::new(settings.tool_dirs()),
                settings.dump_timeout(),
            ),
            bridge: SchedulerBridge::new(settings.command_timeout()),
            command_timeout: settings.command_timeout(),
        }
    }

    pub async fn load_job(&self, name: &str) -> Result<Job> {
        self.jobs
            .lock()
            .await
            .load(name)?
            .ok_or_else(|| BackupError::UnknownJob(name.to_string()))
    }

    // File name this binary shows up as in the process list.
    pub fn exe_name() -> String {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
    }

    pub fn current_exe() -> Result<PathBuf> {
        Ok(std::env::current_exe()?)
    }
}
