use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};

use crate::models::PlaySession;

/// Format used for `play_time.date_time`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Get the end of day (23:59:59) for a given timestamp
pub fn end_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_hms_opt(23, 59, 59).unwrap_or(dt)
}

/// Get the start of day (00:00:00) for a given timestamp
pub fn start_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;

    date - Duration::days(i64::from(offset))
}

pub fn end_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    start_of_week(date, week_start) + Duration::days(6)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last calendar day of the month containing `date`
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Parse a stored timestamp; fractional seconds and a space separator are accepted
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Convert unix seconds into local wall-clock time
pub fn local_datetime(timestamp: f64) -> NaiveDateTime {
    let secs = timestamp.trunc() as i64;
    let nanos = ((timestamp.fract() * 1_000_000_000.0) as u32).min(999_999_999);

    Local
        .timestamp_opt(secs, nanos)
        .single()
        .map(|dt| dt.naive_local())
        .unwrap_or_else(|| Local::now().naive_local())
}

/// Convert local wall-clock time into unix seconds
pub fn local_timestamp(dt: NaiveDateTime) -> f64 {
    let millis = dt
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.timestamp_millis())
        .unwrap_or_else(|| dt.and_utc().timestamp_millis());

    millis as f64 / 1000.0
}

/// Split a play session that spans multiple days into separate sessions,
/// each one bounded by local midnight
pub fn split_session_by_day(session: &PlaySession) -> Vec<PlaySession> {
    if !session.is_multi_day() {
        return vec![session.clone()];
    }

    let end = session.ended_date();
    let days_count = (end.date() - session.started_date().date()).num_days() as usize + 1;

    let mut sessions = Vec::with_capacity(days_count);
    let mut current_at = session.started_at;

    while current_at < session.ended_at {
        let next_midnight = start_of_day(local_datetime(current_at)) + Duration::days(1);
        let piece_end_at = if next_midnight >= end {
            session.ended_at
        } else {
            local_timestamp(next_midnight)
        };

        if piece_end_at <= current_at {
            break;
        }

        sessions.push(PlaySession::new(
            session.game_id.clone(),
            current_at,
            piece_end_at,
        ));

        current_at = piece_end_at;
    }

    sessions
}
