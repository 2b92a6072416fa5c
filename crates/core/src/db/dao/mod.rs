pub mod games;
pub mod statistics;
pub mod time_tracking;

pub use games::GamesDao;
pub use statistics::{SessionRow, StatisticsDao};
pub use time_tracking::TimeTrackingDao;
