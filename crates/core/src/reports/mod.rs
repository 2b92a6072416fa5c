//! Calendar-paged playtime reports.

pub mod facade;
pub mod interval;
pub mod navigator;
pub mod paginated;
pub mod source;

pub use facade::Reports;
pub use interval::{Interval, IntervalPager, IntervalType};
pub use navigator::Navigator;
pub use paginated::{Fetched, Page, PageLoader, Paginated, PerDayLoader, PerYearLoader};
pub use source::StatisticsSource;
