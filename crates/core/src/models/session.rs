use chrono::NaiveDateTime;
use serde::Serialize;

use crate::utils::time::local_datetime;

/// A tracked play session, bounded by unix timestamps in seconds.
#[derive(Debug, Clone)]
pub struct PlaySession {
    pub game_id: String,
    pub started_at: f64,
    pub ended_at: f64,
    pub duration: f64,
}

impl PlaySession {
    pub fn new(game_id: String, started_at: f64, ended_at: f64) -> Self {
        Self {
            game_id,
            started_at,
            ended_at,
            duration: ended_at - started_at,
        }
    }

    pub fn started_date(&self) -> NaiveDateTime {
        local_datetime(self.started_at)
    }

    pub fn ended_date(&self) -> NaiveDateTime {
        local_datetime(self.ended_at)
    }

    pub fn is_multi_day(&self) -> bool {
        self.started_date().date() != self.ended_date().date()
    }
}

/// A stored session as reported back in statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub date: NaiveDateTime,
    /// Duration in seconds
    pub duration: f64,
    /// Marker of the import that produced this row, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrated: Option<String>,
}

impl Session {
    pub fn new(date: NaiveDateTime, duration: f64) -> Self {
        Self {
            date,
            duration,
            migrated: None,
        }
    }
}
