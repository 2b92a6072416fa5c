use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub id: String,
    pub name: String,
}

impl Game {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Overall playtime aggregate for one game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameWithTime {
    pub game: Game,
    /// Total playtime in seconds
    pub time: i64,
    pub total_sessions: i64,
    pub last_play_time_date: Option<NaiveDateTime>,
    pub last_play_duration_time: Option<f64>,
}
