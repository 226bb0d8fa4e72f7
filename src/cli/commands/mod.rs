pub mod adapt;
pub mod analyze;
pub mod config;
pub mod report;
