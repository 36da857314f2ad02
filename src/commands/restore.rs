use std::path::PathBuf;

use crate::app::App;
use crate::error::Result;
use crate::service::mysql::RestoreRunner;

pub async fn run_restore(
    app: &App,
    user: String,
    password: String,
    database: String,
    file: PathBuf,
) -> Result<()> {
    app.tools
        .restore_from_file(&user, &password, &database, &file)
        .await?;
    println!("Restored {database} from {}", file.display());
    Ok(())
}
