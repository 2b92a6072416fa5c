//! Pages of report data bound to the interval they cover.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

use crate::error::Result;
use crate::models::{DailyStatistics, YearlyStatistics};
use crate::reports::interval::{Interval, IntervalPager};
use crate::reports::source::StatisticsSource;
use crate::utils::{Clock, SystemClock};

/// Read-only snapshot of fetched data and the interval it covers
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub interval: Interval,
}

/// Result of one fetch, before it is bound to a [`Page`]
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub data: Vec<T>,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Fetches the data behind a pager's current interval and decides whether
/// neighbouring pages exist.
#[async_trait]
pub trait PageLoader<T>: Send + Sync {
    async fn load(&self, pager: &IntervalPager, now: NaiveDateTime) -> Result<Fetched<T>>;
}

/// Day-granularity pages (weekly and monthly reports).
///
/// `has_prev` comes from the source; `has_next` is decided locally since a
/// report never pages into the future.
pub struct PerDayLoader {
    source: Arc<dyn StatisticsSource>,
}

impl PerDayLoader {
    pub fn new(source: Arc<dyn StatisticsSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PageLoader<DailyStatistics> for PerDayLoader {
    async fn load(
        &self,
        pager: &IntervalPager,
        now: NaiveDateTime,
    ) -> Result<Fetched<DailyStatistics>> {
        let interval = pager.current();

        debug!(
            kind = %pager.kind(),
            start = %interval.start_date(),
            end = %interval.end_date(),
            "fetching daily page"
        );

        let response = self
            .source
            .daily_statistics(interval.start_date(), interval.end_date())
            .await?;

        Ok(Fetched {
            data: response.data,
            has_prev: response.has_prev,
            has_next: pager.next_at(now).current().start <= now,
        })
    }
}

/// One game's year, broken down per month. Both flags mirror the source.
pub struct PerYearLoader {
    source: Arc<dyn StatisticsSource>,
    game_id: String,
}

impl PerYearLoader {
    pub fn new(source: Arc<dyn StatisticsSource>, game_id: impl Into<String>) -> Self {
        Self {
            source,
            game_id: game_id.into(),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }
}

#[async_trait]
impl PageLoader<YearlyStatistics> for PerYearLoader {
    async fn load(
        &self,
        pager: &IntervalPager,
        _now: NaiveDateTime,
    ) -> Result<Fetched<YearlyStatistics>> {
        let year = pager.current().start.year();

        debug!(game_id = %self.game_id, year, "fetching yearly page");

        let response = self.source.yearly_statistics(&self.game_id, year).await?;

        Ok(Fetched {
            data: response.data,
            has_prev: response.has_prev,
            has_next: response.has_next,
        })
    }
}

/// A fetched page together with everything needed to reach its neighbours
pub struct LoadedPage<T> {
    loader: Arc<dyn PageLoader<T>>,
    clock: Arc<dyn Clock>,
    pager: IntervalPager,
    page: Page<T>,
    has_next: bool,
    has_prev: bool,
}

impl<T: Clone> Clone for LoadedPage<T> {
    fn clone(&self) -> Self {
        Self {
            loader: Arc::clone(&self.loader),
            clock: Arc::clone(&self.clock),
            pager: self.pager,
            page: self.page.clone(),
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Current page of a report plus navigation to adjacent pages.
///
/// Navigation never mutates: `next()`/`prev()` step the pager, issue exactly
/// one fetch and return a new value. Callers must not rely on the result of
/// an older navigation once a newer one was issued; [`super::Navigator`]
/// enforces that.
#[derive(Clone)]
pub enum Paginated<T> {
    Loaded(LoadedPage<T>),
    /// Placeholder shown before the first real page arrives
    Empty(Page<T>),
}

impl<T: Send + Sync + 'static> Paginated<T> {
    /// Fetch the page for `pager`'s current interval
    pub async fn create(
        loader: Arc<dyn PageLoader<T>>,
        clock: Arc<dyn Clock>,
        pager: IntervalPager,
    ) -> Result<Self> {
        let fetched = loader.load(&pager, clock.now()).await?;

        Ok(Self::Loaded(LoadedPage {
            page: Page {
                data: fetched.data,
                interval: pager.current(),
            },
            has_next: fetched.has_next,
            has_prev: fetched.has_prev,
            loader,
            clock,
            pager,
        }))
    }

    pub fn empty() -> Self {
        Self::empty_at(SystemClock.now())
    }

    pub fn empty_at(now: NaiveDateTime) -> Self {
        Self::Empty(Page {
            data: Vec::new(),
            interval: Interval::instant(now),
        })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    pub fn has_next(&self) -> bool {
        match self {
            Self::Loaded(loaded) => loaded.has_next,
            Self::Empty(_) => false,
        }
    }

    pub fn has_prev(&self) -> bool {
        match self {
            Self::Loaded(loaded) => loaded.has_prev,
            Self::Empty(_) => false,
        }
    }

    pub fn current(&self) -> &Page<T> {
        match self {
            Self::Loaded(loaded) => &loaded.page,
            Self::Empty(page) => page,
        }
    }

    pub fn pager(&self) -> Option<&IntervalPager> {
        match self {
            Self::Loaded(loaded) => Some(&loaded.pager),
            Self::Empty(_) => None,
        }
    }

    /// Page for the following interval. Not guarded by [`Self::has_next`]:
    /// stepping past the last page fetches a period that may simply be empty.
    pub async fn next(&self) -> Result<Self> {
        match self {
            Self::Loaded(loaded) => {
                let pager = loaded.pager.next_at(loaded.clock.now());
                Self::create(Arc::clone(&loaded.loader), Arc::clone(&loaded.clock), pager).await
            }
            Self::Empty(_) => Ok(Self::empty()),
        }
    }

    /// Page for the preceding interval, see [`Self::next`]
    pub async fn prev(&self) -> Result<Self> {
        match self {
            Self::Loaded(loaded) => {
                let pager = loaded.pager.prev_at(loaded.clock.now());
                Self::create(Arc::clone(&loaded.loader), Arc::clone(&loaded.clock), pager).await
            }
            Self::Empty(_) => Ok(Self::empty()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Paginated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(loaded) => f
                .debug_struct("Paginated")
                .field("pager", &loaded.pager)
                .field("page", &loaded.page)
                .field("has_next", &loaded.has_next)
                .field("has_prev", &loaded.has_prev)
                .finish(),
            Self::Empty(page) => f.debug_tuple("Empty").field(page).finish(),
        }
    }
}
