use std::path::PathBuf;

use crate::app::App;
use crate::backup::{perform_backup, BackupRequest};
use crate::error::Result;

pub async fn run_backup(
    app: &App,
    user: String,
    password: String,
    database: String,
    tables: Vec<String>,
    dest: PathBuf,
    zip: bool,
) -> Result<()> {
    let request = BackupRequest {
        user,
        password,
        database,
        tables,
        destination: dest,
        compress: zip,
    };
    let path = perform_backup(&app.tools, &app.history, &request).await?;
    println!("Backup created: {}", path.display());
    Ok(())
}
