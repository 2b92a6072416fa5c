use std::sync::Arc;

use tracing::info;

use crate::db::{Database, TimeTrackingDao};
use crate::error::{Error, Result};
use crate::models::PlaySession;

/// Write side of the store: records tracked and manually corrected playtime
#[derive(Clone)]
pub struct TimeTrackingService {
    dao: TimeTrackingDao,
}

impl TimeTrackingService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            dao: TimeTrackingDao::new(db),
        }
    }

    /// Record one tracked session given as unix timestamps
    pub fn add_time(
        &self,
        game_id: &str,
        game_name: &str,
        started_at: f64,
        ended_at: f64,
        source: Option<&str>,
    ) -> Result<()> {
        let (game_id, game_name) = game_identity(game_id, game_name)?;

        self.dao
            .add_time(game_id, game_name, started_at, ended_at, source)
    }

    /// Same as [`Self::add_time`] for an already built session
    pub fn record(&self, session: &PlaySession, game_name: &str, source: Option<&str>) -> Result<()> {
        self.add_time(
            &session.game_id,
            game_name,
            session.started_at,
            session.ended_at,
            source,
        )
    }

    /// Set the overall playtime of a game, recording the difference
    pub fn apply_manual_correction(
        &self,
        game_id: &str,
        game_name: &str,
        new_overall_time: i64,
        source: &str,
    ) -> Result<()> {
        if new_overall_time < 0 {
            return Err(Error::InvalidInput(format!(
                "Overall time cannot be negative: {}",
                new_overall_time
            )));
        }
        let (game_id, game_name) = game_identity(game_id, game_name)?;

        info!(game_id, new_overall_time, source, "manual time correction");

        self.dao
            .apply_manual_time_correction(game_id, game_name, new_overall_time, source)
    }

    pub fn get_game_sessions(&self, game_id: &str) -> Result<Vec<PlaySession>> {
        self.dao.get_game_sessions(game_id)
    }

    /// Total tracked seconds of a game
    pub fn get_total_playtime(&self, game_id: &str) -> Result<i64> {
        self.dao.get_total_playtime(game_id)
    }
}

/// Trimmed id and display name; a blank name falls back to the id
fn game_identity<'a>(game_id: &'a str, game_name: &'a str) -> Result<(&'a str, &'a str)> {
    let game_id = game_id.trim();
    if game_id.is_empty() {
        return Err(Error::InvalidInput("Game id must not be empty".into()));
    }

    let game_name = match game_name.trim() {
        "" => game_id,
        name => name,
    };

    Ok((game_id, game_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::GamesDao;
    use crate::db::testing::migrated_database;

    #[test]
    fn test_rejects_blank_game_id() {
        let service = TimeTrackingService::new(migrated_database());

        let err = service
            .add_time("  ", "Celeste", 1_000.0, 2_000.0, None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_blank_name_falls_back_to_id() {
        let db = migrated_database();
        let service = TimeTrackingService::new(db.clone());

        service
            .add_time(" 42 ", "", 1_000.0, 1_600.0, None)
            .unwrap();

        let game = GamesDao::new(db).get_game("42").unwrap().unwrap();
        assert_eq!(game.name, "42");
        assert_eq!(service.get_total_playtime("42").unwrap(), 600);
    }

    #[test]
    fn test_record_session() {
        let service = TimeTrackingService::new(migrated_database());
        let session = PlaySession::new("7".into(), 10_000.0, 10_900.0);

        service.record(&session, "Hades", Some("steam")).unwrap();

        assert_eq!(service.get_total_playtime("7").unwrap(), 900);
    }

    #[test]
    fn test_negative_correction_is_rejected() {
        let service = TimeTrackingService::new(migrated_database());

        let err = service
            .apply_manual_correction("7", "Hades", -1, "manual")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
