use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ScheduleKind;

#[derive(Parser)]
#[command(name = "mysql-backup-scheduler")]
#[command(version)]
#[command(about = "Create, restore and schedule MySQL backups via mysqldump and the Windows task scheduler")]
pub struct Cli {
    /// Job store file (default config.ini)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backup history file (default history.json)
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Settings file
    #[arg(long, global = true, default_value = "settings.toml")]
    pub settings: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dump a database, or some of its tables, to a .sql file now
    Backup {
        /// MySQL user
        #[arg(short, long)]
        user: String,
        /// MySQL password; leave empty for none
        #[arg(short, long, default_value = "")]
        password: String,
        /// Database to dump
        #[arg(short, long)]
        database: String,
        /// Dump only these tables instead of the whole database
        #[arg(short, long, num_args = 1..)]
        tables: Vec<String>,
        /// Folder the dump lands in
        #[arg(long)]
        dest: PathBuf,
        /// Compress the dump into a .zip
        #[arg(long)]
        zip: bool,
    },
    /// Feed a .sql file back through mysql
    Restore {
        /// MySQL user
        #[arg(short, long)]
        user: String,
        /// MySQL password; leave empty for none
        #[arg(short, long, default_value = "")]
        password: String,
        /// Database to restore into
        #[arg(short, long)]
        database: String,
        /// The .sql file to restore
        file: PathBuf,
    },
    /// Manage scheduled backup jobs
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    /// Show every recorded backup
    History,
    /// Show backup-related processes currently running
    Processes,
    /// One-screen overview of jobs, task states and processes
    Status,
    /// Redraw the overview every ten seconds until interrupted
    Watch,
    /// Entry point for runs started by the task scheduler
    Auto {
        /// Job to run; defaults to the first stored job
        #[arg(long)]
        job: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// Store a job and register its scheduled task
    Add(AddJobArgs),
    /// List stored jobs
    List,
    /// Trigger a job's task right now
    Run { name: String },
    /// Enable a job's task
    Enable { name: String },
    /// Disable a job's task
    Disable { name: String },
    /// Remove a job and its scheduled task
    Delete { name: String },
    /// Show next run time and state for every job
    Status,
}

#[derive(Args)]
pub struct AddJobArgs {
    /// Task name; generated when omitted
    #[arg(long)]
    pub name: Option<String>,

    /// When the task fires
    #[arg(long, value_enum)]
    pub kind: ScheduleKind,

    /// Start time, HH:MM
    #[arg(long)]
    pub time: String,

    /// Start date, YYYY-MM-DD (required for --kind once)
    #[arg(long)]
    pub date: Option<String>,

    /// Weekday codes for --kind weekly, e.g. MON,WED,FRI
    #[arg(long, value_delimiter = ',')]
    pub weekdays: Vec<String>,

    /// Repeat interval in hours for --kind hourly
    #[arg(long)]
    pub every: Option<u32>,

    /// MySQL user
    #[arg(short, long)]
    pub user: String,

    /// MySQL password; leave empty for none
    #[arg(short, long, default_value = "")]
    pub password: String,

    /// Database to back up
    #[arg(short, long)]
    pub database: String,

    /// Back up only these tables
    #[arg(short, long, num_args = 1..)]
    pub tables: Vec<String>,

    /// Folder the backups land in
    #[arg(long)]
    pub dest: PathBuf,

    /// Compress each backup into a .zip
    #[arg(long)]
    pub zip: bool,
}
