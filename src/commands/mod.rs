mod auto;
mod backup;
mod history;
mod restore;
mod schedule;
mod status;

pub use auto::run_auto;
pub use backup::run_backup;
pub use history::run_history;
pub use restore::run_restore;
pub use schedule::handle_schedule_command;
pub use status::{run_processes, run_status, run_watch};
