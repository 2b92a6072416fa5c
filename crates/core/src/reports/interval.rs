//! Calendar buckets for reports and the stepper that walks between them.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::utils::time::{
    end_of_day, end_of_month, end_of_week, end_of_year, start_of_month, start_of_week,
    start_of_year,
};

/// One reporting bucket. `start` is midnight of the first day and `end` is
/// 23:59:59 of the last day, both in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// Interval covering whole calendar days `first..=last`
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: end_of_day(last.and_time(NaiveTime::MIN)),
        }
    }

    /// Degenerate interval collapsed onto one instant
    pub fn instant(at: NaiveDateTime) -> Self {
        Self { start: at, end: at }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum IntervalType {
    Weekly,
    /// Also the fallback for unrecognised codes, see [`IntervalType::from_code_or_default`]
    #[default]
    Monthly,
    Yearly,
}

impl IntervalType {
    /// Wire code used by the plugin frontend
    pub fn code(self) -> u8 {
        match self {
            Self::Weekly => 0,
            Self::Monthly => 1,
            Self::Yearly => 2,
        }
    }

    /// Lenient decoding: unknown codes become [`IntervalType::Monthly`]
    pub fn from_code_or_default(code: u8) -> Self {
        Self::try_from(code).unwrap_or_else(|err| {
            warn!(%err, "falling back to monthly interval");
            Self::default()
        })
    }
}

impl TryFrom<u8> for IntervalType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Weekly),
            1 => Ok(Self::Monthly),
            2 => Ok(Self::Yearly),
            other => Err(Error::UnknownIntervalType(other.to_string())),
        }
    }
}

impl FromStr for IntervalType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            _ => Err(Error::UnknownIntervalType(s.to_string())),
        }
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
}

/// Immutable calendar stepper: every move returns a new pager of the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalPager {
    kind: IntervalType,
    interval: Interval,
    week_start: Weekday,
}

impl IntervalPager {
    /// Pager whose current interval contains `anchor`; weeks start on Monday
    pub fn create(kind: IntervalType, anchor: NaiveDateTime) -> Self {
        Self::with_week_start(kind, anchor, Weekday::Mon)
    }

    pub fn with_week_start(kind: IntervalType, anchor: NaiveDateTime, week_start: Weekday) -> Self {
        Self {
            kind,
            interval: bounds(kind, anchor.date(), week_start),
            week_start,
        }
    }

    pub fn kind(&self) -> IntervalType {
        self.kind
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn current(&self) -> Interval {
        self.interval
    }

    pub fn next(&self) -> Self {
        self.next_at(Local::now().naive_local())
    }

    pub fn prev(&self) -> Self {
        self.prev_at(Local::now().naive_local())
    }

    /// Following bucket. `now` only matters for yearly pagers, whose shifted
    /// interval ends at `now` rather than at the end of the target year.
    pub fn next_at(&self, now: NaiveDateTime) -> Self {
        self.step(Step::Forward, now)
    }

    /// Preceding bucket; see [`IntervalPager::next_at`] for the role of `now`.
    pub fn prev_at(&self, now: NaiveDateTime) -> Self {
        self.step(Step::Backward, now)
    }

    fn step(&self, step: Step, now: NaiveDateTime) -> Self {
        let interval = match self.kind {
            IntervalType::Yearly => {
                let start = self.interval.start;
                let year = match step {
                    Step::Forward => start.year() + 1,
                    Step::Backward => start.year() - 1,
                };

                Interval {
                    start: start.with_year(year).unwrap_or(start),
                    end: now,
                }
            }
            IntervalType::Weekly | IntervalType::Monthly => {
                // Re-derive from a neighbouring calendar day so lengths never drift
                let neighbour = match step {
                    Step::Forward => self.interval.end_date() + Duration::days(1),
                    Step::Backward => self.interval.start_date() - Duration::days(1),
                };

                bounds(self.kind, neighbour, self.week_start)
            }
        };

        Self { interval, ..*self }
    }
}

fn bounds(kind: IntervalType, date: NaiveDate, week_start: Weekday) -> Interval {
    match kind {
        IntervalType::Weekly => Interval::days(
            start_of_week(date, week_start),
            end_of_week(date, week_start),
        ),
        IntervalType::Monthly => Interval::days(start_of_month(date), end_of_month(date)),
        IntervalType::Yearly => Interval::days(start_of_year(date), end_of_year(date)),
    }
}
