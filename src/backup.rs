use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use log::warn;
use tokio::sync::Mutex;

use crate::archive::compress_to_zip;
use crate::config::Job;
use crate::error::Result;
use crate::history::{database_label, BackupRecord, HistoryStore};
use crate::paths::ensure_destination_allowed;
use crate::service::mysql::{DumpRunner, MySqlTools};

pub struct BackupRequest {
    pub user: String,
    pub password: String,
    pub database: String,
    pub tables: Vec<String>,
    pub destination: PathBuf,
    pub compress: bool,
}

impl From<&Job> for BackupRequest {
    fn from(job: &Job) -> BackupRequest {
        // Jobs saved without a destination fall back to the working
        // directory of whoever runs them.
        let destination = if job.destination.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            job.destination.clone()
        };
        BackupRequest {
            user: job.user.clone(),
            password: job.password.clone(),
            database: job.database.clone(),
            tables: job.tables.clone(),
            destination,
            compress: job.compress,
        }
    }
}

pub fn backup_file_name(database: &str, tables: &[String], stamp: NaiveDateTime) -> String {
    let stamp = stamp.format("%Y-%m-%d_%H-%M-%S");
    if tables.is_empty() {
        format!("{database}_backup_{stamp}.sql")
    } else {
        let tables = tables.join("_").replace(' ', "_");
        format!("{database}_tables_{tables}_{stamp}.sql")
    }
}

// The whole backup path: refuse bad destinations up front, dump, compress
// if asked, and record the copy. A failed compression keeps the plain dump
// rather than losing the backup.
pub async fn perform_backup(
    tools: &MySqlTools,
    history: &Mutex<HistoryStore>,
    request: &BackupRequest,
) -> Result<PathBuf> {
    ensure_destination_allowed(&request.destination)?;

    let file_name = backup_file_name(
        &request.database,
        &request.tables,
        Local::now().naive_local(),
    );
    let out_path = request.destination.join(file_name);

    tools
        .dump_to_file(
            &request.user,
            &request.password,
            &request.database,
            &request.tables,
            &out_path,
        )
        .await?;

    let final_path = if request.compress {
        match compress_to_zip(&out_path, false) {
            Ok(zip_path) => zip_path,
            Err(err) => {
                warn!("keeping uncompressed dump, zip failed: {err}");
                out_path
            }
        }
    } else {
        out_path
    };

    let record = BackupRecord::new(
        &request.user,
        &request.password,
        database_label(&request.database, &request.tables),
        &final_path,
    );
    history.lock().await.append(record)?;

    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleKind;
    use crate::error::BackupError;
    use crate::tools::{ToolLocator, MYSQLDUMP};
    use chrono::{NaiveDate, NaiveTime};
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
    }

    // A stand-in mysqldump: a script whose stdout becomes the dump file.
    fn fake_mysqldump(dir: &Path) {
        let path = dir.join(MYSQLDUMP);
        std::fs::write(&path, "#!/bin/sh\necho '-- fake dump'\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn tools_in(tools_dir: &Path, scratch: &Path) -> MySqlTools {
        MySqlTools::new(
            ToolLocator::with_dirs(vec![tools_dir.to_path_buf()], scratch.to_path_buf()),
            Duration::from_secs(10),
        )
    }

    fn request(dest: &Path, compress: bool) -> BackupRequest {
        BackupRequest {
            user: "root".to_string(),
            password: String::new(),
            database: "shop".to_string(),
            tables: vec![],
            destination: dest.to_path_buf(),
            compress,
        }
    }

    #[test]
    fn full_dump_name_carries_database_and_stamp() {
        assert_eq!(
            backup_file_name("shop", &[], stamp()),
            "shop_backup_2024-03-01_09-05-07.sql"
        );
    }

    #[test]
    fn table_dump_name_joins_tables_with_underscores() {
        let tables = vec!["orders".to_string(), "order items".to_string()];
        assert_eq!(
            backup_file_name("shop", &tables, stamp()),
            "shop_tables_orders_order_items_2024-03-01_09-05-07.sql"
        );
    }

    #[test]
    fn job_without_destination_backs_up_into_cwd() {
        let job = Job {
            name: "j".to_string(),
            task_name: "j".to_string(),
            kind: ScheduleKind::Daily,
            time: NaiveTime::default(),
            date: None,
            weekdays: vec![],
            every_hours: None,
            database: "shop".to_string(),
            tables: vec![],
            destination: PathBuf::new(),
            user: "root".to_string(),
            password: String::new(),
            compress: false,
        };
        let request = BackupRequest::from(&job);
        assert_eq!(request.destination, PathBuf::from("."));
    }

    #[tokio::test]
    async fn backup_compresses_and_records_the_zip() {
        let dir = TempDir::new().unwrap();
        let tools_dir = dir.path().join("tools");
        let dest = dir.path().join("out");
        std::fs::create_dir_all(&tools_dir).unwrap();
        std::fs::create_dir_all(&dest).unwrap();
        fake_mysqldump(&tools_dir);

        let tools = tools_in(&tools_dir, &dir.path().join("scratch"));
        let history = Mutex::new(HistoryStore::new(dir.path().join("history.json")));

        let path = perform_backup(&tools, &history, &request(&dest, true))
            .await
            .unwrap();

        assert_eq!(path.extension().unwrap(), "zip");
        assert!(path.exists());
        assert!(!path.with_extension("sql").exists());

        let records = history.lock().await.load();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].database, "shop");
        assert!(records[0].path.ends_with(".zip"));
    }

    #[tokio::test]
    async fn failed_compression_keeps_the_plain_dump() {
        let dir = TempDir::new().unwrap();
        let tools_dir = dir.path().join("tools");
        let dest = dir.path().join("out");
        std::fs::create_dir_all(&tools_dir).unwrap();
        std::fs::create_dir_all(&dest).unwrap();
        fake_mysqldump(&tools_dir);

        // Occupy every .zip slot the next few seconds could name, so the
        // archive step has to fail and the dump has to survive.
        let started = Local::now().naive_local();
        for offset in 0..4 {
            let name = backup_file_name("shop", &[], started + chrono::Duration::seconds(offset));
            std::fs::create_dir(dest.join(name).with_extension("zip")).unwrap();
        }

        let tools = tools_in(&tools_dir, &dir.path().join("scratch"));
        let history = Mutex::new(HistoryStore::new(dir.path().join("history.json")));

        let path = perform_backup(&tools, &history, &request(&dest, true))
            .await
            .unwrap();

        assert_eq!(path.extension().unwrap(), "sql");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        let records = history.lock().await.load();
        assert_eq!(records.len(), 1);
        assert!(records[0].path.ends_with(".sql"));
    }

    #[tokio::test]
    async fn disallowed_destination_is_rejected_before_any_dump() {
        let dir = TempDir::new().unwrap();
        // No tool anywhere: getting past validation would fail differently.
        let tools = tools_in(&dir.path().join("empty"), &dir.path().join("scratch"));
        let history = Mutex::new(HistoryStore::new(dir.path().join("history.json")));

        let err = perform_backup(&tools, &history, &request(Path::new("C:\\Windows\\Temp"), false))
            .await
            .unwrap_err();

        assert!(matches!(err, BackupError::DestinationNotAllowed(_)));
        assert!(history.lock().await.load().is_empty());
    }
}
