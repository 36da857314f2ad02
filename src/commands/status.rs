use std::time::Duration;

use chrono::Local;
use log::warn;

use crate::app::App;
use crate::error::Result;
use crate::service::scheduler::tasklist::list_processes;

const WATCH_INTERVAL: Duration = Duration::from_secs(10);

pub async fn run_processes(app: &App) -> Result<()> {
    print_processes(app).await;
    Ok(())
}

async fn print_processes(app: &App) {
    let entries = list_processes(&App::exe_name(), app.command_timeout).await;
    if entries.is_empty() {
        println!("No backup processes running.");
        return;
    }

    println!("{:<24} {:<8} INFO", "PROCESS", "PID");
    for entry in &entries {
        println!("{:<24} {:<8} {}", entry.name, entry.pid, entry.info);
    }
}

async fn render_overview(app: &App) -> Result<()> {
    println!("Scheduled jobs");
    super::schedule::list_jobs(app).await?;
    println!();
    println!("Task states");
    super::schedule::job_status(app).await?;
    println!();
    println!("Running processes");
    print_processes(app).await;
    Ok(())
}

pub async fn run_status(app: &App) -> Result<()> {
    render_overview(app).await
}

// Same overview, redrawn on a fixed cadence until the user interrupts.
// A refresh that fails is logged and retried on the next tick, it never
// stops the watcher.
pub async fn run_watch(app: &App) -> Result<()> {
    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    loop {
        ticker.tick().await;
        println!("=== {} ===", Local::now().format("%Y-%m-%d %H:%M:%S"));
        if let Err(err) = render_overview(app).await {
            warn!("refresh failed: {err}");
        }
        println!();
    }
}
