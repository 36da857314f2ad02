use clap::Parser;
use log::error;

mod app;
mod archive;
mod backup;
mod cli;
mod commands;
mod config;
mod error;
mod history;
mod paths;
mod service;
mod settings;
mod tools;

use app::App;
use cli::{Cli, Commands};
use settings::Settings;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Non-zero exit on any failure, so scheduler-started runs leave a
    // visible last-run result instead of failing silently.
    if let Err(err) = run(cli).await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> error::Result<()> {
    let settings = Settings::load(&cli.settings)?;
    let app = App::new(&settings, cli.config, cli.history);

    match cli.command {
        Commands::Backup {
            user,
            password,
            database,
            tables,
            dest,
            zip,
        } => commands::run_backup(&app, user, password, database, tables, dest, zip).await,
        Commands::Restore {
            user,
            password,
            database,
            file,
        } => commands::run_restore(&app, user, password, database, file).await,
        Commands::Schedule(command) => commands::handle_schedule_command(&app, command).await,
        Commands::History => commands::run_history(&app).await,
        Commands::Processes => commands::run_processes(&app).await,
        Commands::Status => commands::run_status(&app).await,
        Commands::Watch => commands::run_watch(&app).await,
        Commands::Auto { job } => commands::run_auto(&app, job).await,
    }
}
