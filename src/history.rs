use std::path::{Path, PathBuf};

use chrono::Local;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BackupRecord {
    pub user: String,
    pub password: String,
    // Either the database name or "db.t1,t2" when single tables were dumped.
    pub database: String,
    pub timestamp: String,
    pub path: String,
}

impl BackupRecord {
    pub fn new(user: &str, password: &str, database: String, path: &Path) -> BackupRecord {
        BackupRecord {
            user: user.to_string(),
            password: password.to_string(),
            database,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            path: path.to_string_lossy().to_string(),
        }
    }
}

pub fn database_label(database: &str, tables: &[String]) -> String {
    if tables.is_empty() {
        database.to_string()
    } else {
        format!("{}.{}", database, tables.join(","))
    }
}

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> HistoryStore {
        HistoryStore { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // A missing or unreadable history file is not an error: the store is
    // reset to an empty list, mirroring what the read gave us.
    pub fn load(&self) -> Vec<BackupRecord> {
        if !self.path.exists() {
            if let Err(err) = self.write(&[]) {
                warn!("could not initialize history file: {err}");
            }
            return Vec::new();
        }
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                warn!("could not read history file, resetting it: {err}");
                let _ = self.write(&[]);
                return Vec::new();
            }
        };
        match serde_json::from_str(&text) {
            Ok(records) => records,
            Err(err) => {
                warn!("history file is corrupt, resetting it: {err}");
                let _ = self.write(&[]);
                Vec::new()
            }
        }
    }

    pub fn append(&self, record: BackupRecord) -> Result<()> {
        let mut records = self.load();
        records.push(record);
        self.write(&records)
    }

    fn write(&self, records: &[BackupRecord]) -> Result<()> {
        let text = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}
