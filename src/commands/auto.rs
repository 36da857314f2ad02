use log::info;

use crate::app::App;
use crate::backup::{perform_backup, BackupRequest};
use crate::error::{BackupError, Result};

// What the scheduled task invokes. Errors bubble up so unattended runs
// land in the log and the task's last-run result, instead of vanishing.
pub async fn run_auto(app: &App, job_name: Option<String>) -> Result<()> {
    let job = match job_name {
        Some(name) => app.load_job(&name).await?,
        None => app
            .jobs
            .lock()
            .await
            .list()?
            .into_iter()
            .next()
            .ok_or_else(|| BackupError::invalid_job("no jobs stored"))?,
    };

    info!("running job '{}' for the scheduler", job.name);
    let request = BackupRequest::from(&job);
    let path = perform_backup(&app.tools, &app.history, &request).await?;
    info!("scheduled backup finished: {}", path.display());
    Ok(())
}
