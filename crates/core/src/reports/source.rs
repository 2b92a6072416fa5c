use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::domain::StatisticsService;
use crate::error::Result;
use crate::models::{DailyStatisticsPage, GameWithTime, YearlyStatisticsPage};

/// Provider of the statistics that reports page through.
///
/// Only the source knows how far back (and, per game, forward) its data
/// reaches, so availability flags come from here.
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    /// Daily rows for the calendar days `start..=end`
    async fn daily_statistics(&self, start: NaiveDate, end: NaiveDate)
    -> Result<DailyStatisticsPage>;

    /// Month-by-month breakdown of `year` for one game
    async fn yearly_statistics(&self, game_id: &str, year: i32) -> Result<YearlyStatisticsPage>;

    /// Lifetime totals per game
    async fn overall_statistics(&self) -> Result<Vec<GameWithTime>>;
}

#[async_trait]
impl StatisticsSource for StatisticsService {
    async fn daily_statistics(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailyStatisticsPage> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.get_daily(start, end)).await?
    }

    async fn yearly_statistics(&self, game_id: &str, year: i32) -> Result<YearlyStatisticsPage> {
        let service = self.clone();
        let game_id = game_id.to_string();
        tokio::task::spawn_blocking(move || service.get_per_year(&game_id, year)).await?
    }

    async fn overall_statistics(&self) -> Result<Vec<GameWithTime>> {
        debug!("fetching overall statistics");

        let service = self.clone();
        tokio::task::spawn_blocking(move || service.get_overall()).await?
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{insert_play_time, migrated_database};

    #[tokio::test]
    async fn test_local_source_serves_daily_statistics() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Alpha", "2024-05-14T10:00:00", 600.0);
        let source = StatisticsService::new(db);

        let start = NaiveDate::from_ymd_opt(2024, 5, 13).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 19).unwrap();
        let page = source.daily_statistics(start, end).await.unwrap();

        assert_eq!(page.data.len(), 7);
        assert_eq!(page.data[1].total, 600);
    }

    #[tokio::test]
    async fn test_local_source_serves_yearly_and_overall() {
        let db = migrated_database();
        insert_play_time(&db, "1", "Alpha", "2024-05-14T10:00:00", 600.0);
        insert_play_time(&db, "1", "Alpha", "2025-01-02T10:00:00", 60.0);
        let source = StatisticsService::new(db);

        let page = source.yearly_statistics("1", 2024).await.unwrap();
        assert_eq!(page.data[4].total, 600.0);
        assert!(page.has_next);
        assert!(!page.has_prev);

        let overall = source.overall_statistics().await.unwrap();
        assert_eq!(overall.len(), 1);
        assert_eq!(overall[0].time, 660);
    }
}
