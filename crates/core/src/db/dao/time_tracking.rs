use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::PlaySession;
use crate::utils::time::{format_timestamp, local_timestamp, parse_timestamp, split_session_by_day};

#[derive(Clone)]
pub struct TimeTrackingDao {
    db: Arc<Database>,
}

impl TimeTrackingDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn add_time(
        &self,
        game_id: &str,
        game_name: &str,
        started_at: f64,
        ended_at: f64,
        source: Option<&str>,
    ) -> Result<()> {
        if !started_at.is_finite() || !ended_at.is_finite() {
            return Err(Error::InvalidInput(format!(
                "Session bounds must be finite: {} .. {}",
                started_at, ended_at
            )));
        }
        if ended_at <= started_at {
            return Err(Error::InvalidInput(
                "End time must be after start time".into(),
            ));
        }

        let session = PlaySession::new(game_id.to_string(), started_at, ended_at);
        let sessions = split_session_by_day(&session);

        self.db.transaction(|tx| {
            save_game_dict(tx, game_id, game_name)?;

            for session in sessions {
                let date = session.started_date();

                debug!(
                    game_id = %session.game_id,
                    date = %format_timestamp(date),
                    duration = session.duration,
                    "inserting playtime"
                );

                save_play_time(tx, date, session.duration, &session.game_id, source)?;
            }

            Ok(())
        })
    }

    /// Record the difference between `new_overall_time` and the stored total
    /// as one session stamped now
    pub fn apply_manual_time_correction(
        &self,
        game_id: &str,
        game_name: &str,
        new_overall_time: i64,
        source: &str,
    ) -> Result<()> {
        let now = Local::now().naive_local();

        self.db.transaction(|tx| {
            save_game_dict(tx, game_id, game_name)?;

            let current: f64 = tx.query_row(
                "SELECT COALESCE(SUM(duration), 0) FROM play_time WHERE game_id = ?1",
                params![game_id],
                |row| row.get(0),
            )?;

            let delta = new_overall_time as f64 - current;

            if delta != 0.0 {
                save_play_time(tx, now, delta, game_id, Some(source))?;
            }

            Ok(())
        })
    }

    pub fn get_game_sessions(&self, game_id: &str) -> Result<Vec<PlaySession>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT game_id, date_time, duration
                FROM play_time
                WHERE game_id = ?1
                ORDER BY date_time DESC
                "#,
            )?;

            let rows = stmt
                .query_map(params![game_id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let sessions = rows
                .into_iter()
                .filter_map(|(game_id, date, duration)| {
                    let Some(started) = parse_timestamp(&date) else {
                        warn!(%game_id, %date, "skipping session with unparsable date");
                        return None;
                    };
                    let started_at = local_timestamp(started);

                    Some(PlaySession::new(game_id, started_at, started_at + duration))
                })
                .collect();

            Ok(sessions)
        })
    }

    /// Running total kept in `overall_time`, 0 for a game never played
    pub fn get_total_playtime(&self, game_id: &str) -> Result<i64> {
        self.db.with_connection(|conn| {
            let total: Option<i64> = conn
                .query_row(
                    "SELECT CAST(ROUND(duration) AS INTEGER) FROM overall_time WHERE game_id = ?1",
                    params![game_id],
                    |row| row.get(0),
                )
                .optional()?;

            Ok(total.unwrap_or(0))
        })
    }
}

fn save_game_dict(conn: &Connection, game_id: &str, game_name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO game_dict (game_id, name) VALUES (?1, ?2)
         ON CONFLICT(game_id) DO UPDATE SET name = ?2",
        params![game_id, game_name],
    )?;
    Ok(())
}

fn save_play_time(
    conn: &Connection,
    at: NaiveDateTime,
    duration: f64,
    game_id: &str,
    source: Option<&str>,
) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO play_time(date_time, duration, game_id, migrated)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![format_timestamp(at), duration, game_id, source],
    )?;

    conn.execute(
        r#"
        INSERT INTO overall_time (game_id, duration)
        VALUES (?1, ?2)
        ON CONFLICT(game_id) DO UPDATE SET duration = duration + ?2
        "#,
        params![game_id, duration],
    )?;
    Ok(())
}
