use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime};
use tracing::debug;

use crate::db::{Database, SessionRow, StatisticsDao};
use crate::error::{Error, Result};
use crate::models::{
    DailyGameStats, DailyStatistics, DailyStatisticsPage, GameWithTime, YearlyStatistics,
    YearlyStatisticsPage,
};
use crate::utils::time::MONTH_NAMES;

/// Local statistics backend: aggregates stored sessions into report pages
#[derive(Clone)]
pub struct StatisticsService {
    dao: StatisticsDao,
}

impl StatisticsService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            dao: StatisticsDao::new(db),
        }
    }

    /// Get overall statistics for all games
    pub fn get_overall(&self) -> Result<Vec<GameWithTime>> {
        self.dao.get_overall_statistics()
    }

    /// Get statistics for a specific game
    pub fn get_for_game(&self, game_id: &str) -> Result<Option<GameWithTime>> {
        self.dao.get_game_statistics(game_id)
    }

    /// One entry per calendar day of `[start_date, end_date]`, oldest first
    pub fn get_daily(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<DailyStatisticsPage> {
        if start_date > end_date {
            return Err(Error::InvalidInput(format!(
                "Period start {} is after its end {}",
                start_date, end_date
            )));
        }

        debug!(%start_date, %end_date, "building daily statistics");

        let mut by_day: BTreeMap<NaiveDate, Vec<SessionRow>> = BTreeMap::new();
        for row in self.dao.get_sessions_between(start_date, end_date)? {
            by_day.entry(row.session.date.date()).or_default().push(row);
        }

        let data = start_date
            .iter_days()
            .take_while(|day| *day <= end_date)
            .map(|day| match by_day.remove(&day) {
                Some(rows) => DailyStatistics::new(day, group_by_game(rows)),
                None => DailyStatistics::empty(day),
            })
            .collect();

        let has_prev = self
            .dao
            .has_data_before(start_date.and_time(NaiveTime::MIN))?;

        Ok(DailyStatisticsPage { data, has_prev })
    }

    /// Month-by-month breakdown of one game's year
    pub fn get_per_year(&self, game_id: &str, year: i32) -> Result<YearlyStatisticsPage> {
        debug!(game_id, year, "building yearly statistics");

        let sessions = self.dao.get_game_sessions_in_year(game_id, year)?;

        let data = MONTH_NAMES
            .iter()
            .zip(1u32..)
            .map(|(month_name, month)| {
                let sessions: Vec<_> = sessions
                    .iter()
                    .filter(|s| s.date.month() == month)
                    .cloned()
                    .collect();

                YearlyStatistics {
                    month,
                    month_name: (*month_name).to_string(),
                    total: sessions.iter().map(|s| s.duration).sum(),
                    sessions_count: sessions.len(),
                    sessions,
                }
            })
            .collect();

        Ok(YearlyStatisticsPage {
            data,
            has_prev: self.dao.has_game_data_in_year(game_id, year - 1)?,
            has_next: self.dao.has_game_data_in_year(game_id, year + 1)?,
        })
    }
}

/// Collapse one day's sessions into per-game totals, in first-played order
fn group_by_game(rows: Vec<SessionRow>) -> Vec<DailyGameStats> {
    let mut games: Vec<DailyGameStats> = Vec::new();

    for SessionRow { game, session } in rows {
        match games.iter_mut().find(|g| g.game.id == game.id) {
            Some(stats) => stats.sessions.push(session),
            None => games.push(DailyGameStats {
                game,
                time: 0,
                sessions: vec![session],
            }),
        }
    }

    for stats in &mut games {
        let total: f64 = stats.sessions.iter().map(|s| s.duration).sum();
        stats.time = total.round() as i64;
    }

    games
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{insert_play_time, migrated_database};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_fills_every_day() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Alpha", "2024-05-14T10:00:00", 600.0);
        insert_play_time(&db, "2", "Beta", "2024-05-14T12:00:00", 300.0);
        insert_play_time(&db, "1", "Alpha", "2024-05-14T20:00:00", 900.0);
        insert_play_time(&db, "1", "Alpha", "2024-05-19T09:00:00", 60.0);

        let page = StatisticsService::new(db)
            .get_daily(date(2024, 5, 13), date(2024, 5, 19))
            .unwrap();

        assert_eq!(page.data.len(), 7);
        assert_eq!(page.data[0].date, date(2024, 5, 13));
        assert_eq!(page.data[6].date, date(2024, 5, 19));
        assert!(page.data[0].games.is_empty());
        assert_eq!(page.data[0].total, 0);

        let tuesday = &page.data[1];
        assert_eq!(tuesday.total, 1800);
        assert_eq!(tuesday.games.len(), 2);
        assert_eq!(tuesday.games[0].game.name, "Alpha");
        assert_eq!(tuesday.games[0].time, 1500);
        assert_eq!(tuesday.games[0].sessions.len(), 2);
        assert_eq!(page.data[6].total, 60);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_daily_has_prev() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Alpha", "2024-05-12T23:59:59", 1.0);

        let service = StatisticsService::new(db);

        assert!(service.get_daily(date(2024, 5, 13), date(2024, 5, 19)).unwrap().has_prev);
        assert!(!service.get_daily(date(2024, 5, 12), date(2024, 5, 18)).unwrap().has_prev);
    }

    #[test]
    fn test_daily_rejects_inverted_period() {
        let service = StatisticsService::new(migrated_database());

        let err = service
            .get_daily(date(2024, 5, 19), date(2024, 5, 13))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_per_year_breakdown() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Alpha", "2023-06-01T10:00:00", 10.0);
        insert_play_time(&db, "1", "Alpha", "2024-02-10T10:00:00", 100.0);
        insert_play_time(&db, "1", "Alpha", "2024-02-11T10:00:00", 50.0);
        insert_play_time(&db, "1", "Alpha", "2024-12-31T10:00:00", 25.0);

        let page = StatisticsService::new(db).get_per_year("1", 2024).unwrap();

        assert_eq!(page.data.len(), 12);
        assert_eq!(page.data[0].month, 1);
        assert_eq!(page.data[0].month_name, "Jan");
        assert_eq!(page.data[0].sessions_count, 0);
        assert_eq!(page.data[1].total, 150.0);
        assert_eq!(page.data[1].sessions_count, 2);
        assert_eq!(page.data[11].month_name, "Dec");
        assert_eq!(page.data[11].total, 25.0);
        assert!(page.has_prev);
        assert!(!page.has_next);
    }
}
