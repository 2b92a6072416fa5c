//! PlayTime - Main PyO3 class for time tracking and statistics
//!
//! Stateless API that requires user_id and data_dir for each operation.
//! All methods use the global DB_CACHE for connection pooling. Statistics
//! are returned as JSON documents shaped for the plugin frontend.

use std::sync::Arc;

use chrono::NaiveDate;
use playtime_core::db::Database;
use playtime_core::domain::{GamesService, StatisticsService, TimeTrackingService};
use playtime_core::error::Error as CoreError;
use pyo3::exceptions::{PyException, PyValueError};
use pyo3::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::db::{get_or_create_database, user_db_path};

/// Convert core errors to Python exceptions
fn to_py_err(err: CoreError) -> PyErr {
    match err {
        CoreError::InvalidInput(_) | CoreError::UnknownIntervalType(_) => {
            PyValueError::new_err(err.to_string())
        }
        other => PyException::new_err(other.to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyException::new_err(e.to_string()))
}

#[pyclass]
pub struct PlayTime {}

#[pymethods]
impl PlayTime {
    #[new]
    fn new() -> PyResult<Self> {
        Ok(Self {})
    }

    #[pyo3(signature = (user_id, data_dir, game_id, game_name, started_at, ended_at, source=None))]
    #[allow(clippy::too_many_arguments)]
    fn add_time(
        &self,
        user_id: &str,
        data_dir: &str,
        game_id: &str,
        game_name: &str,
        started_at: f64,
        ended_at: f64,
        source: Option<&str>,
    ) -> PyResult<()> {
        let db = Self::get_database(user_id, data_dir).map_err(to_py_err)?;

        debug!(user_id, game_id, started_at, ended_at, "add_time");

        TimeTrackingService::new(db)
            .add_time(game_id, game_name, started_at, ended_at, source)
            .map_err(to_py_err)
    }

    fn apply_manual_time(
        &self,
        user_id: &str,
        data_dir: &str,
        game_id: &str,
        game_name: &str,
        new_overall_time: i64,
        source: &str,
    ) -> PyResult<()> {
        let db = Self::get_database(user_id, data_dir).map_err(to_py_err)?;

        TimeTrackingService::new(db)
            .apply_manual_correction(game_id, game_name, new_overall_time, source)
            .map_err(to_py_err)
    }

    /// `{"data": [...], "hasPrev": bool}` for every day of `start..=end`
    fn daily_statistics_for_period(
        &self,
        user_id: &str,
        data_dir: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PyResult<String> {
        let db = Self::get_database(user_id, data_dir).map_err(to_py_err)?;
        let page = StatisticsService::new(db)
            .get_daily(start, end)
            .map_err(to_py_err)?;

        to_json(&page)
    }

    /// `{"data": [12 months], "hasPrev": bool, "hasNext": bool}`
    fn statistics_for_game_per_year(
        &self,
        user_id: &str,
        data_dir: &str,
        game_id: &str,
        year: i32,
    ) -> PyResult<String> {
        let db = Self::get_database(user_id, data_dir).map_err(to_py_err)?;
        let page = StatisticsService::new(db)
            .get_per_year(game_id, year)
            .map_err(to_py_err)?;

        to_json(&page)
    }

    fn per_game_overall_statistics(&self, user_id: &str, data_dir: &str) -> PyResult<String> {
        let db = Self::get_database(user_id, data_dir).map_err(to_py_err)?;
        let stats = StatisticsService::new(db).get_overall().map_err(to_py_err)?;

        to_json(&stats)
    }

    /// `{"id", "name", "time"}` of one game
    fn get_game(&self, user_id: &str, data_dir: &str, game_id: &str) -> PyResult<String> {
        let db = Self::get_database(user_id, data_dir).map_err(to_py_err)?;
        let stats = GamesService::new(db).get_by_id(game_id).map_err(to_py_err)?;

        to_json(&serde_json::json!({
            "id": stats.game.id,
            "name": stats.game.name,
            "time": Value::from(stats.time),
        }))
    }
}

impl PlayTime {
    /// Get database connection for a user (cached)
    pub fn get_database(user_id: &str, data_dir: &str) -> Result<Arc<Database>, CoreError> {
        let user_id = user_id.trim();

        if user_id.is_empty() || !user_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidInput(format!(
                "Invalid Steam ID format: {:?}",
                user_id
            )));
        }

        get_or_create_database(user_db_path(data_dir, user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_database_rejects_bad_user_id() {
        let data_dir = std::env::temp_dir().to_string_lossy().to_string();

        for user_id in ["", "  ", "abc", "123/../../etc"] {
            let err = PlayTime::get_database(user_id, &data_dir).unwrap_err();
            assert!(matches!(err, CoreError::InvalidInput(_)), "{user_id}");
        }
    }
}
