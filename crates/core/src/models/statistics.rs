use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Game, Session};

/// Playtime of one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStatistics {
    pub date: NaiveDate,
    pub games: Vec<DailyGameStats>,
    /// Sum of `games[].time`, in seconds
    pub total: i64,
}

impl DailyStatistics {
    pub fn new(date: NaiveDate, games: Vec<DailyGameStats>) -> Self {
        let total = games.iter().map(|g| g.time).sum();

        Self { date, games, total }
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyGameStats {
    pub game: Game,
    pub time: i64,
    pub sessions: Vec<Session>,
}

/// One month of a game's yearly breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyStatistics {
    /// 1-based month number
    pub month: u32,
    pub month_name: String,
    pub total: f64,
    pub sessions_count: usize,
    pub sessions: Vec<Session>,
}

/// Response of a daily statistics fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatisticsPage {
    pub data: Vec<DailyStatistics>,
    /// Whether anything was recorded before the requested period
    pub has_prev: bool,
}

/// Response of a per-game yearly fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyStatisticsPage {
    pub data: Vec<YearlyStatistics>,
    pub has_prev: bool,
    pub has_next: bool,
}
