use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use tokio::process::Command;

use crate::config::{join_weekdays, Job, ScheduleKind, DATE_FORMAT, TIME_FORMAT};
use crate::error::{BackupError, Result};
use crate::service::command::{run_capture, run_checked};
use crate::service::scheduler::status::{parse_query_output, TaskStatus};

pub const SCHTASKS: &str = "schtasks";

// Command line the created task runs: this binary re-invoked in auto mode.
// It is handed to schtasks as one /tr argument, embedded quotes included.
pub fn reinvoke_command_line(exe: &Path, job_name: &str) -> String {
    format!("\"{}\" auto --job \"{}\"", exe.display(), job_name)
}

pub fn create_args(job: &Job, run_command: &str) -> Result<Vec<String>> {
    let mut args = vec![
        "/create".to_string(),
        "/tn".to_string(),
        job.task_name.clone(),
        "/tr".to_string(),
        run_command.to_string(),
        "/sc".to_string(),
        job.kind.as_str().to_string(),
    ];
    match job.kind {
        ScheduleKind::Once => {
            let date = job
                .date
                .ok_or_else(|| BackupError::invalid_job("a one-shot job needs a date"))?;
            args.push("/st".to_string());
            args.push(job.time.format(TIME_FORMAT).to_string());
            args.push("/sd".to_string());
            args.push(date.format(DATE_FORMAT).to_string());
        }
        ScheduleKind::Daily => {
            args.push("/st".to_string());
            args.push(job.time.format(TIME_FORMAT).to_string());
        }
        ScheduleKind::Weekly => {
            let days = if job.weekdays.is_empty() {
                "MON".to_string()
            } else {
                join_weekdays(&job.weekdays)
            };
            args.push("/d".to_string());
            args.push(days);
            args.push("/st".to_string());
            args.push(job.time.format(TIME_FORMAT).to_string());
        }
        ScheduleKind::Hourly => {
            let every = match job.every_hours {
                Some(hours) if hours > 0 => hours,
                _ => 1,
            };
            args.push("/mo".to_string());
            args.push(every.to_string());
            args.push("/st".to_string());
            args.push(job.time.format(TIME_FORMAT).to_string());
        }
    }
    args.push("/f".to_string());
    Ok(args)
}

pub fn run_args(task_name: &str) -> Vec<String> {
    vec!["/run".to_string(), "/tn".to_string(), task_name.to_string()]
}

pub fn delete_args(task_name: &str) -> Vec<String> {
    vec![
        "/delete".to_string(),
        "/tn".to_string(),
        task_name.to_string(),
        "/f".to_string(),
    ]
}

pub fn change_args(task_name: &str, enable: bool) -> Vec<String> {
    vec![
        "/change".to_string(),
        "/tn".to_string(),
        task_name.to_string(),
        if enable { "/enable" } else { "/disable" }.to_string(),
    ]
}

pub fn query_args(task_name: &str) -> Vec<String> {
    vec![
        "/query".to_string(),
        "/tn".to_string(),
        task_name.to_string(),
        "/fo".to_string(),
        "LIST".to_string(),
        "/v".to_string(),
    ]
}

pub struct SchedulerBridge {
    timeout: Duration,
}

impl SchedulerBridge {
    pub fn new(timeout: Duration) -> SchedulerBridge {
        SchedulerBridge { timeout }
    }

    fn command(&self, args: Vec<String>) -> Command {
        let mut cmd = Command::new(SCHTASKS);
        cmd.args(args);
        cmd
    }

    pub async fn create_task(&self, job: &Job, exe: &Path) -> Result<()> {
        let run_command = reinvoke_command_line(exe, &job.name);
        let args = create_args(job, &run_command)?;
        run_checked(self.command(args), self.timeout).await?;
        info!("created task {} for job {}", job.task_name, job.name);
        Ok(())
    }

    pub async fn run_task(&self, task_name: &str) -> Result<()> {
        run_checked(self.command(run_args(task_name)), self.timeout).await?;
        info!("started task {task_name}");
        Ok(())
    }

    pub async fn delete_task(&self, task_name: &str) -> Result<()> {
        run_checked(self.command(delete_args(task_name)), self.timeout).await?;
        info!("deleted task {task_name}");
        Ok(())
    }

    pub async fn set_task_enabled(&self, task_name: &str, enable: bool) -> Result<()> {
        run_checked(self.command(change_args(task_name, enable)), self.timeout).await?;
        info!(
            "{} task {task_name}",
            if enable { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    // Fail-soft: any query problem reads as "nothing known about this task",
    // so a half-written or foreign-locale answer never takes the caller down.
    pub async fn query_status(&self, task_name: &str) -> (Option<String>, Option<TaskStatus>) {
        let result = run_capture(self.command(query_args(task_name)), self.timeout).await;
        match result {
            Ok(output) if output.status.success() => {
                parse_query_output(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(_) => (None, None),
            Err(err) => {
                warn!("could not query task {task_name}: {err}");
                (None, None)
            }
        }
    }
}
