pub mod config;
pub mod errors;
pub mod fetch;
pub mod process;
pub mod report;
pub mod watch;
