//! PlayTime core: playtime storage, statistics and calendar-paged reports.

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod models;
pub mod reports;
pub mod utils;

pub use config::ReportsConfig;
pub use error::{Error, Result};
