pub mod game;
pub mod session;
pub mod statistics;

pub use game::{Game, GameWithTime};
pub use session::{PlaySession, Session};
pub use statistics::{
    DailyGameStats, DailyStatistics, DailyStatisticsPage, YearlyStatistics, YearlyStatisticsPage,
};
