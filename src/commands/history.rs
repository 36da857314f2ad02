use crate::app::App;
use crate::error::Result;

pub async fn run_history(app: &App) -> Result<()> {
    let records = app.history.lock().await.load();
    if records.is_empty() {
        println!("No backups recorded.");
        return Ok(());
    }

    println!(
        "{:<4} {:<12} {:<24} {:<20} FILE",
        "#", "USER", "DATABASE", "CREATED"
    );
    for (index, record) in records.iter().enumerate() {
        println!(
            "{:<4} {:<12} {:<24} {:<20} {}",
            index + 1,
            record.user,
            record.database,
            record.timestamp,
            record.path
        );
    }
    Ok(())
}
