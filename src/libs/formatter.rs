//! Formatting and parsing of durations and dates for the terminal.

use super::config::DurationFormat;
use chrono::{Datelike, Local, NaiveDate, TimeDelta, Weekday};

/// Formats a duration the way the user configured.
pub fn format_duration(duration: &TimeDelta, format: DurationFormat) -> String {
    match format {
        DurationFormat::Text => format_duration_text(duration),
        DurationFormat::Decimal => format_duration_decimal(duration),
    }
}

/// `1h2m3s`, dropping leading zero units. Zero is `0s`.
pub fn format_duration_text(duration: &TimeDelta) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();

    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

/// Hours with two decimals, `1.50` for ninety minutes.
pub fn format_duration_decimal(duration: &TimeDelta) -> String {
    format!("{:.2}", duration.num_seconds() as f64 / 3600.0)
}

/// Parses durations like `1h30m`, `45m`, `90s` or `-15m`.
///
/// A bare number is taken as minutes.
pub fn parse_duration(input: &str) -> Option<TimeDelta> {
    let input = input.trim();
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    if body.is_empty() {
        return None;
    }

    let seconds = if let Ok(minutes) = body.parse::<i64>() {
        minutes.checked_mul(60)?
    } else {
        let mut total: i64 = 0;
        let mut number = String::new();

        for c in body.chars() {
            if c.is_ascii_digit() {
                number.push(c);
                continue;
            }

            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            let value: i64 = number.parse().ok()?;
            total = total.checked_add(value.checked_mul(unit)?)?;
            number.clear();
        }

        if !number.is_empty() {
            return None;
        }
        total
    };

    TimeDelta::try_seconds(if negative { -seconds } else { seconds })
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// The most recent `weekday` on or before `today`.
pub fn last_weekday_from(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let back = (7 + today.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    today - TimeDelta::days(back as i64)
}

/// The most recent `weekday`, counting today.
pub fn last_weekday(weekday: Weekday) -> NaiveDate {
    last_weekday_from(Local::now().date_naive(), weekday)
}
