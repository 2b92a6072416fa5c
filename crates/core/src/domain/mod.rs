pub mod games;
pub mod statistics;
pub mod time_tracking;

pub use games::GamesService;
pub use statistics::StatisticsService;
pub use time_tracking::TimeTrackingService;
