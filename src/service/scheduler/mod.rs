pub mod schtasks;
pub mod status;
pub mod tasklist;

pub use schtasks::SchedulerBridge;
