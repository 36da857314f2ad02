pub mod command;
pub mod mysql;
pub mod scheduler;
