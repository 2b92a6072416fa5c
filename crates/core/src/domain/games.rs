use std::sync::Arc;

use crate::db::{Database, GamesDao, StatisticsDao};
use crate::error::{Error, Result};
use crate::models::{Game, GameWithTime};

#[derive(Clone)]
pub struct GamesService {
    dao: GamesDao,
    statistics: StatisticsDao,
}

impl GamesService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            dao: GamesDao::new(Arc::clone(&db)),
            statistics: StatisticsDao::new(db),
        }
    }

    /// Get a game with its overall playtime
    pub fn get_by_id(&self, game_id: &str) -> Result<GameWithTime> {
        if let Some(stats) = self.statistics.get_game_statistics(game_id)? {
            return Ok(stats);
        }

        // Known game that was never played
        self.dao
            .get_game(game_id)?
            .map(|game| GameWithTime {
                game,
                time: 0,
                total_sessions: 0,
                last_play_time_date: None,
                last_play_duration_time: None,
            })
            .ok_or_else(|| Error::NotFound(format!("game {}", game_id)))
    }

    /// Get all games
    pub fn get_all(&self) -> Result<Vec<Game>> {
        self.dao.get_all_games()
    }

    /// Save a game in dictionary
    pub fn save(&self, game: &Game) -> Result<()> {
        self.dao.save_game(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{insert_play_time, migrated_database};

    #[test]
    fn test_get_by_id() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Alpha", "2024-05-14T10:00:00", 600.0);
        let service = GamesService::new(db);
        service.save(&Game::new("2", "Unplayed")).unwrap();

        assert_eq!(service.get_by_id("1").unwrap().time, 600);
        assert_eq!(service.get_by_id("2").unwrap().total_sessions, 0);
        assert!(service.get_by_id("3").unwrap_err().is_not_found());
        assert_eq!(service.get_all().unwrap().len(), 2);
    }
}
