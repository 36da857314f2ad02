use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BackupError>;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("job store error: {0}")]
    JobStore(#[from] ini::Error),

    #[error("history store error: {0}")]
    HistoryStore(#[from] serde_json::Error),

    #[error("settings error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{tool} not found, install XAMPP or add it to PATH")]
    ToolNotFound { tool: String },

    #[error("{program} exited with {code}: {stderr}")]
    CommandFailed {
        program: String,
        code: String,
        stderr: String,
    },

    #[error("{program} did not finish within {seconds}s")]
    CommandTimeout { program: String, seconds: u64 },

    #[error("destination folder is not allowed: {}", .0.display())]
    DestinationNotAllowed(PathBuf),

    #[error("no job named '{0}' in the job store")]
    UnknownJob(String),

    #[error("invalid job: {0}")]
    InvalidJob(String),
}

impl BackupError {
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    pub fn invalid_job(msg: impl Into<String>) -> Self {
        Self::InvalidJob(msg.into())
    }
}
