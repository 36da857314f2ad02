use chrono::{NaiveDate, NaiveTime, Weekday};
use uuid::Uuid;

use crate::app::App;
use crate::cli::{AddJobArgs, ScheduleCommand};
use crate::config::{join_weekdays, Job, ScheduleKind, DATE_FORMAT, TIME_FORMAT};
use crate::error::{BackupError, Result};
use crate::paths::ensure_destination_allowed;

pub async fn handle_schedule_command(app: &App, command: ScheduleCommand) -> Result<()> {
    match command {
        ScheduleCommand::Add(args) => add_job(app, args).await,
        ScheduleCommand::List => list_jobs(app).await,
        ScheduleCommand::Run { name } => {
            let job = app.load_job(&name).await?;
            app.bridge.run_task(&job.task_name).await?;
            println!("Task '{}' sent off to run.", job.task_name);
            Ok(())
        }
        ScheduleCommand::Enable { name } => {
            let job = app.load_job(&name).await?;
            app.bridge.set_task_enabled(&job.task_name, true).await?;
            println!("Task '{}' enabled.", job.task_name);
            Ok(())
        }
        ScheduleCommand::Disable { name } => {
            let job = app.load_job(&name).await?;
            app.bridge.set_task_enabled(&job.task_name, false).await?;
            println!("Task '{}' disabled.", job.task_name);
            Ok(())
        }
        ScheduleCommand::Delete { name } => delete_job(app, &name).await,
        ScheduleCommand::Status => job_status(app).await,
    }
}

fn generated_task_name() -> String {
    let id = Uuid::now_v7().simple().to_string();
    format!("BackupMySQL_{}", &id[id.len() - 6..])
}

async fn add_job(app: &App, args: AddJobArgs) -> Result<()> {
    let task_name = match args.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => generated_task_name(),
    };

    let time = NaiveTime::parse_from_str(&args.time, TIME_FORMAT)
        .map_err(|_| BackupError::invalid_job("time must look like HH:MM"))?;
    let date = match args.date {
        Some(date) => Some(
            NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|_| BackupError::invalid_job("date must look like YYYY-MM-DD"))?,
        ),
        None => None,
    };
    if args.kind == ScheduleKind::Once && date.is_none() {
        return Err(BackupError::invalid_job("--kind once needs a --date"));
    }
    let weekdays = args
        .weekdays
        .iter()
        .map(|code| {
            code.parse::<Weekday>()
                .map_err(|_| BackupError::invalid_job(format!("unknown weekday code '{code}'")))
        })
        .collect::<Result<Vec<Weekday>>>()?;
    ensure_destination_allowed(&args.dest)?;

    let job = Job {
        name: task_name.replace(' ', "_"),
        task_name,
        kind: args.kind,
        time,
        date,
        weekdays,
        every_hours: args.every,
        database: args.database,
        tables: args.tables,
        destination: args.dest,
        user: args.user,
        password: args.password,
        compress: args.zip,
    };

    // The job is stored before the task is registered; if schtasks then
    // refuses it, the stored job survives so the task can be retried.
    app.jobs.lock().await.save(&job)?;
    let exe = App::current_exe()?;
    app.bridge.create_task(&job, &exe).await?;

    println!(
        "Job '{}' stored and task '{}' registered.",
        job.name, job.task_name
    );
    Ok(())
}

// One line per job, e.g. "23:30 (MON,WED)" for weekly schedules.
fn schedule_display(job: &Job) -> String {
    let time = job.time.format(TIME_FORMAT);
    match job.kind {
        ScheduleKind::Once => match job.date {
            Some(date) => format!("{} {time}", date.format(DATE_FORMAT)),
            None => time.to_string(),
        },
        ScheduleKind::Daily => time.to_string(),
        ScheduleKind::Weekly => {
            if job.weekdays.is_empty() {
                time.to_string()
            } else {
                format!("{time} ({})", join_weekdays(&job.weekdays))
            }
        }
        ScheduleKind::Hourly => {
            let every = job.every_hours.filter(|n| *n > 0).unwrap_or(1);
            format!("{time} (every {every}h)")
        }
    }
}

pub(crate) async fn list_jobs(app: &App) -> Result<()> {
    let jobs = app.jobs.lock().await.list()?;
    if jobs.is_empty() {
        println!("No jobs stored.");
        return Ok(());
    }

    println!(
        "{:<24} {:<8} {:<22} {:<16} {:<28} {}",
        "JOB", "KIND", "SCHEDULE", "DATABASE", "DESTINATION", "ZIP"
    );
    for job in &jobs {
        let database = if job.tables.is_empty() {
            job.database.clone()
        } else {
            format!("{}.{}", job.database, job.tables.join(","))
        };
        println!(
            "{:<24} {:<8} {:<22} {:<16} {:<28} {}",
            job.name,
            job.kind,
            schedule_display(job),
            database,
            job.destination.display(),
            if job.compress { "yes" } else { "no" }
        );
    }
    Ok(())
}

async fn delete_job(app: &App, name: &str) -> Result<()> {
    let job = app.load_job(name).await?;
    app.bridge.delete_task(&job.task_name).await?;
    app.jobs.lock().await.remove(&job.name)?;
    println!("Job '{}' and task '{}' removed.", job.name, job.task_name);
    Ok(())
}

pub(crate) async fn job_status(app: &App) -> Result<()> {
    let jobs = app.jobs.lock().await.list()?;
    if jobs.is_empty() {
        println!("No jobs stored.");
        return Ok(());
    }

    println!("{:<24} {:<18} {}", "TASK", "NEXT RUN", "STATE");
    for job in &jobs {
        let (next_run, status) = app.bridge.query_status(&job.task_name).await;
        println!(
            "{:<24} {:<18} {}",
            job.task_name,
            next_run.unwrap_or_else(|| "N/A".to_string()),
            status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Unknown".to_string())
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job(kind: ScheduleKind) -> Job {
        Job {
            name: "j".to_string(),
            task_name: "j".to_string(),
            kind,
            time: NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
            date: None,
            weekdays: vec![],
            every_hours: None,
            database: "shop".to_string(),
            tables: vec![],
            destination: PathBuf::from("D:\\backups"),
            user: "root".to_string(),
            password: String::new(),
            compress: false,
        }
    }

    #[test]
    fn schedule_display_per_kind() {
        let mut once = job(ScheduleKind::Once);
        once.date = NaiveDate::from_ymd_opt(2024, 12, 24);
        assert_eq!(schedule_display(&once), "2024-12-24 23:30");

        assert_eq!(schedule_display(&job(ScheduleKind::Daily)), "23:30");

        let mut weekly = job(ScheduleKind::Weekly);
        weekly.weekdays = vec![Weekday::Mon, Weekday::Wed];
        assert_eq!(schedule_display(&weekly), "23:30 (MON,WED)");

        let mut hourly = job(ScheduleKind::Hourly);
        hourly.every_hours = Some(6);
        assert_eq!(schedule_display(&hourly), "23:30 (every 6h)");
        hourly.every_hours = None;
        assert_eq!(schedule_display(&hourly), "23:30 (every 1h)");
    }

    #[test]
    fn generated_task_names_are_distinct() {
        let a = generated_task_name();
        let b = generated_task_name();
        assert!(a.starts_with("BackupMySQL_"));
        assert_eq!(a.len(), "BackupMySQL_".len() + 6);
        assert_ne!(a, b);
    }
}
