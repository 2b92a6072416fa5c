use std::sync::Arc;

use rusqlite::{OptionalExtension, params};

use crate::db::Database;
use crate::error::Result;
use crate::models::Game;

#[derive(Clone)]
pub struct GamesDao {
    db: Arc<Database>,
}

impl GamesDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get_game(&self, game_id: &str) -> Result<Option<Game>> {
        self.db.with_connection(|conn| {
            let game = conn
                .query_row(
                    "SELECT game_id, name FROM game_dict WHERE game_id = ?1",
                    params![game_id],
                    |row| Ok(Game::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;

            Ok(game)
        })
    }

    pub fn save_game(&self, game: &Game) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO game_dict (game_id, name)
                 VALUES (?1, ?2)
                 ON CONFLICT(game_id) DO UPDATE SET name = ?2
                 WHERE name != ?2",
                params![&game.id, &game.name],
            )?;
            Ok(())
        })
    }

    pub fn get_all_games(&self) -> Result<Vec<Game>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT game_id, name FROM game_dict ORDER BY name")?;

            let games = stmt
                .query_map([], |row| {
                    Ok(Game::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(games)
        })
    }
}
