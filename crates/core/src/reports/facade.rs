use std::sync::Arc;

use crate::config::ReportsConfig;
use crate::error::Result;
use crate::models::{DailyStatistics, GameWithTime, YearlyStatistics};
use crate::reports::interval::{IntervalPager, IntervalType};
use crate::reports::paginated::{Paginated, PerDayLoader, PerYearLoader};
use crate::reports::source::StatisticsSource;
use crate::utils::{Clock, SystemClock};

/// Entry point for consumers: every report starts at the current moment.
#[derive(Clone)]
pub struct Reports {
    source: Arc<dyn StatisticsSource>,
    clock: Arc<dyn Clock>,
    config: ReportsConfig,
}

impl Reports {
    pub fn new(source: Arc<dyn StatisticsSource>) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            config: ReportsConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;

        self
    }

    pub fn with_config(mut self, config: ReportsConfig) -> Self {
        self.config = config;

        self
    }

    pub fn config(&self) -> &ReportsConfig {
        &self.config
    }

    pub async fn weekly_statistics(&self) -> Result<Paginated<DailyStatistics>> {
        self.per_day(IntervalType::Weekly).await
    }

    pub async fn monthly_statistics(&self) -> Result<Paginated<DailyStatistics>> {
        self.per_day(IntervalType::Monthly).await
    }

    pub async fn yearly_statistics(&self, game_id: &str) -> Result<Paginated<YearlyStatistics>> {
        let loader = PerYearLoader::new(Arc::clone(&self.source), game_id);

        Paginated::<YearlyStatistics>::create(
            Arc::new(loader),
            Arc::clone(&self.clock),
            self.pager(IntervalType::Yearly),
        )
        .await
    }

    /// Lifetime totals per game, without pagination
    pub async fn overall_statistics(&self) -> Result<Vec<GameWithTime>> {
        self.source.overall_statistics().await
    }

    async fn per_day(&self, kind: IntervalType) -> Result<Paginated<DailyStatistics>> {
        Paginated::<DailyStatistics>::create(
            Arc::new(PerDayLoader::new(Arc::clone(&self.source))),
            Arc::clone(&self.clock),
            self.pager(kind),
        )
        .await
    }

    fn pager(&self, kind: IntervalType) -> IntervalPager {
        IntervalPager::with_week_start(kind, self.clock.now(), self.config.week_start)
    }
}
