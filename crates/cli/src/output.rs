//! Plain-text rendering of report pages.

use std::fmt::{self, Write};

use playtime_core::models::{DailyStatistics, GameWithTime, YearlyStatistics};
use playtime_core::reports::Page;

/// `1h 05m`, `12m 30s`, `45s`
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let (hours, minutes, secs) = (seconds / 3600, seconds % 3600 / 60, seconds % 60);

    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}

fn header<T>(page: &Page<T>) -> String {
    format!(
        "{} .. {}",
        page.interval.start_date(),
        page.interval.end_date()
    )
}

pub fn daily(page: &Page<DailyStatistics>) -> Result<String, fmt::Error> {
    let mut out = header(page);
    let total: i64 = page.data.iter().map(|day| day.total).sum();

    for day in &page.data {
        write!(out, "\n{}  {:>9}", day.date, format_duration(day.total))?;
        for game in &day.games {
            write!(out, "\n    {:<32} {:>9}", game.game.name, format_duration(game.time))?;
        }
    }
    write!(out, "\ntotal       {:>9}", format_duration(total))?;

    Ok(out)
}

pub fn yearly(page: &Page<YearlyStatistics>) -> Result<String, fmt::Error> {
    let mut out = header(page);

    for month in &page.data {
        write!(
            out,
            "\n{:<10} {:>9}  ({} sessions)",
            month.month_name,
            format_duration(month.total as i64),
            month.sessions_count
        )?;
    }

    Ok(out)
}

pub fn overall(games: &[GameWithTime]) -> Result<String, fmt::Error> {
    let mut out = String::new();

    for (i, stats) in games.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write!(
            out,
            "{:<32} {:>9}  ({} sessions)",
            stats.game.name,
            format_duration(stats.time),
            stats.total_sessions
        )?;
    }

    Ok(out)
}
