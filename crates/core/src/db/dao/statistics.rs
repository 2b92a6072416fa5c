use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{OptionalExtension, Row, params};
use tracing::warn;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Game, GameWithTime, Session};
use crate::utils::time::{format_timestamp, parse_timestamp};

const GAME_WITH_TIME_SELECT: &str = r#"
    SELECT
        g.game_id,
        g.name,
        CAST(COALESCE(SUM(pt.duration), 0) AS INTEGER) AS total_time,
        COUNT(pt.game_id) AS total_sessions,
        MAX(pt.date_time) AS last_played,
        (
            SELECT last.duration
            FROM play_time last
            WHERE last.game_id = g.game_id
            ORDER BY last.date_time DESC
            LIMIT 1
        ) AS last_duration
    FROM game_dict g
    JOIN play_time pt ON g.game_id = pt.game_id
"#;

/// A session joined with the game it belongs to
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub game: Game,
    pub session: Session,
}

#[derive(Clone)]
pub struct StatisticsDao {
    db: Arc<Database>,
}

impl StatisticsDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get_overall_statistics(&self) -> Result<Vec<GameWithTime>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{GAME_WITH_TIME_SELECT}
                GROUP BY g.game_id, g.name
                HAVING total_time > 0
                ORDER BY total_time DESC"
            ))?;

            let stats = stmt
                .query_map([], game_with_time)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(stats)
        })
    }

    pub fn get_game_statistics(&self, game_id: &str) -> Result<Option<GameWithTime>> {
        self.db.with_connection(|conn| {
            let stats = conn
                .query_row(
                    &format!(
                        "{GAME_WITH_TIME_SELECT}
                        WHERE g.game_id = ?1
                        GROUP BY g.game_id, g.name"
                    ),
                    params![game_id],
                    game_with_time,
                )
                .optional()?;

            Ok(stats)
        })
    }

    /// Sessions whose local date falls in `[start_date, end_date]`, oldest first
    pub fn get_sessions_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<SessionRow>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT
                    pt.date_time,
                    pt.duration,
                    pt.migrated,
                    pt.game_id,
                    COALESCE(g.name, pt.game_id)
                FROM play_time pt
                LEFT JOIN game_dict g ON pt.game_id = g.game_id
                WHERE DATE(pt.date_time) BETWEEN ?1 AND ?2
                ORDER BY pt.date_time
                "#,
            )?;

            let rows = stmt
                .query_map(
                    params![start_date.to_string(), end_date.to_string()],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,         // date_time
                            row.get::<_, f64>(1)?,            // duration
                            row.get::<_, Option<String>>(2)?, // migrated
                            row.get::<_, String>(3)?,         // game_id
                            row.get::<_, String>(4)?,         // game_name
                        ))
                    },
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows
                .into_iter()
                .filter_map(|(date, duration, migrated, game_id, game_name)| {
                    session(&date, duration, migrated).map(|session| SessionRow {
                        game: Game::new(game_id, game_name),
                        session,
                    })
                })
                .collect())
        })
    }

    pub fn has_data_before(&self, at: NaiveDateTime) -> Result<bool> {
        self.db.with_connection(|conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM play_time WHERE date_time < ?1)",
                params![format_timestamp(at)],
                |row| row.get(0),
            )?)
        })
    }

    pub fn get_game_sessions_in_year(&self, game_id: &str, year: i32) -> Result<Vec<Session>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT date_time, duration, migrated
                FROM play_time
                WHERE game_id = ?1 AND STRFTIME('%Y', date_time) = ?2
                ORDER BY date_time
                "#,
            )?;

            let rows = stmt
                .query_map(params![game_id, format!("{:04}", year)], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows
                .into_iter()
                .filter_map(|(date, duration, migrated)| session(&date, duration, migrated))
                .collect())
        })
    }

    pub fn has_game_data_in_year(&self, game_id: &str, year: i32) -> Result<bool> {
        self.db.with_connection(|conn| {
            Ok(conn.query_row(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM play_time
                    WHERE game_id = ?1 AND STRFTIME('%Y', date_time) = ?2
                )
                "#,
                params![game_id, format!("{:04}", year)],
                |row| row.get(0),
            )?)
        })
    }
}

fn game_with_time(row: &Row<'_>) -> rusqlite::Result<GameWithTime> {
    Ok(GameWithTime {
        game: Game {
            id: row.get(0)?,
            name: row.get(1)?,
        },
        time: row.get(2)?,
        total_sessions: row.get(3)?,
        last_play_time_date: row
            .get::<_, Option<String>>(4)?
            .and_then(|s| parse_timestamp(&s)),
        last_play_duration_time: row.get(5)?,
    })
}

fn session(date: &str, duration: f64, migrated: Option<String>) -> Option<Session> {
    match parse_timestamp(date) {
        Some(date) => Some(Session {
            date,
            duration,
            migrated,
        }),
        None => {
            warn!(date, "skipping play_time row with unparsable date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{insert_play_time, migrated_database};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overall_statistics_ordered_by_time() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Short", "2024-01-01T10:00:00", 60.0);
        insert_play_time(&db, "2", "Long", "2024-01-01T11:00:00", 3600.0);
        insert_play_time(&db, "2", "Long", "2024-01-03T11:00:00", 1800.0);

        let stats = StatisticsDao::new(db).get_overall_statistics().unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].game.name, "Long");
        assert_eq!(stats[0].time, 5400);
        assert_eq!(stats[0].total_sessions, 2);
        assert_eq!(
            stats[0].last_play_time_date,
            parse_timestamp("2024-01-03T11:00:00")
        );
        assert_eq!(stats[0].last_play_duration_time, Some(1800.0));
        assert_eq!(stats[1].time, 60);
    }

    #[test]
    fn test_game_statistics_missing_game() {
        let db = migrated_database();
        let dao = StatisticsDao::new(db);

        assert!(dao.get_game_statistics("nope").unwrap().is_none());
    }

    #[test]
    fn test_sessions_between_is_inclusive() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Game", "2024-02-29T23:59:00", 30.0);
        insert_play_time(&db, "1", "Game", "2024-03-01T00:00:00", 40.0);
        insert_play_time(&db, "1", "Game", "2024-03-31T23:00:00", 50.0);
        insert_play_time(&db, "1", "Game", "2024-04-01T00:00:01", 60.0);

        let rows = StatisticsDao::new(db)
            .get_sessions_between(date(2024, 3, 1), date(2024, 3, 31))
            .unwrap();

        let durations: Vec<f64> = rows.iter().map(|r| r.session.duration).collect();
        assert_eq!(durations, vec![40.0, 50.0]);
        assert_eq!(rows[0].game, Game::new("1", "Game"));
    }

    #[test]
    fn test_unparsable_rows_are_skipped() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Game", "2024-03-05T10:00:00", 40.0);
        insert_play_time(&db, "1", "Game", "2024-03-05T10:00", 50.0);

        let rows = StatisticsDao::new(db)
            .get_sessions_between(date(2024, 3, 1), date(2024, 3, 31))
            .unwrap();

        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_has_data_before() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Game", "2024-03-05T10:00:00", 40.0);
        let dao = StatisticsDao::new(db);

        let at = |s: &str| parse_timestamp(s).unwrap();
        assert!(dao.has_data_before(at("2024-03-06T00:00:00")).unwrap());
        assert!(!dao.has_data_before(at("2024-03-05T00:00:00")).unwrap());
    }

    #[test]
    fn test_game_sessions_in_year() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Game", "2023-12-31T22:00:00", 10.0);
        insert_play_time(&db, "1", "Game", "2024-01-10T10:00:00", 20.0);
        insert_play_time(&db, "2", "Other", "2024-01-10T10:00:00", 30.0);
        let dao = StatisticsDao::new(db);

        let sessions = dao.get_game_sessions_in_year("1", 2024).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration, 20.0);

        assert!(dao.has_game_data_in_year("1", 2023).unwrap());
        assert!(!dao.has_game_data_in_year("1", 2025).unwrap());
        assert!(!dao.has_game_data_in_year("2", 2023).unwrap());
    }
}
