//! RFC 3339 parsing and formatting for whole-second timestamps.
//!
//! The wire carries signed seconds since the Unix epoch. Formatting always
//! produces UTC (`Z`); parsing accepts any offset and drops fractional
//! seconds.

use thiserror::Error;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Error type for RFC 3339 parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DateTimeParseError {
    pub message: String,
}

impl DateTimeParseError {
    fn invalid(what: &str, input: &str) -> Self {
        Self {
            message: format!("Invalid {} in datetime: {}", what, input),
        }
    }
}

/// Parses a timezone offset string (Z, +HH:MM, -HH:MM) and returns offset in minutes.
fn parse_timezone_offset(offset: &str) -> Result<i16, DateTimeParseError> {
    if offset == "Z" || offset == "z" {
        return Ok(0);
    }

    let invalid = || DateTimeParseError {
        message: format!("Invalid timezone offset: {}", offset),
    };

    if offset.len() != 6 || offset.as_bytes()[3] != b':' {
        return Err(invalid());
    }

    let sign = match offset.as_bytes()[0] {
        b'+' => 1i16,
        b'-' => -1i16,
        _ => return Err(invalid()),
    };

    let hours: i16 = offset[1..3].parse().map_err(|_| invalid())?;
    let minutes: i16 = offset[4..6].parse().map_err(|_| invalid())?;

    // 24:00 is the only offset allowed past 23:59
    if hours > 24 || (hours == 24 && minutes != 0) || minutes > 59 {
        return Err(invalid());
    }

    Ok(sign * (hours * 60 + minutes))
}

/// Returns true if the given year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Returns the number of days in a given month (1-indexed).
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Calculates days since Unix epoch for a given date (Howard Hinnant's algorithm).
fn date_to_days(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year } as i64;
    let m = if month <= 2 {
        month as i64 + 9
    } else {
        month as i64 - 3
    };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32; // year of era
    let doy = (153 * m as u32 + 2) / 5 + day - 1; // day of year
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // day of era

    era * 146097 + doe as i64 - 719468
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i64, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index
    let d = doy - (153 * mp + 2) / 5 + 1; // day
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // month

    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

fn parse_component<T: std::str::FromStr>(
    s: &str,
    what: &str,
    input: &str,
) -> Result<T, DateTimeParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateTimeParseError::invalid(what, input));
    }
    s.parse().map_err(|_| DateTimeParseError::invalid(what, input))
}

/// Parses an RFC 3339 datetime and returns whole seconds since the Unix epoch.
///
/// Fractional seconds are accepted and discarded.
pub fn parse_timestamp_rfc3339(input: &str) -> Result<i64, DateTimeParseError> {
    // Minimum length is 19 (YYYY-MM-DDTHH:MM:SS)
    if input.len() < 19 || !input.is_ascii() {
        return Err(DateTimeParseError {
            message: format!("Invalid RFC 3339 datetime: {}", input),
        });
    }

    let bytes = input.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' || bytes[13] != b':' || bytes[16] != b':' {
        return Err(DateTimeParseError {
            message: format!("Invalid RFC 3339 datetime: {}", input),
        });
    }
    if !matches!(bytes[10], b'T' | b't' | b' ') {
        return Err(DateTimeParseError {
            message: format!("Invalid RFC 3339 datetime: {}", input),
        });
    }

    let year: i32 = parse_component(&input[..4], "year", input)?;
    let month: u32 = parse_component(&input[5..7], "month", input)?;
    let day: u32 = parse_component(&input[8..10], "day", input)?;
    let hours: i64 = parse_component(&input[11..13], "hours", input)?;
    let minutes: i64 = parse_component(&input[14..16], "minutes", input)?;
    let seconds: i64 = parse_component(&input[17..19], "seconds", input)?;

    if !(1..=12).contains(&month) {
        return Err(DateTimeParseError::invalid("month", input));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(DateTimeParseError::invalid("day", input));
    }
    if hours > 23 {
        return Err(DateTimeParseError::invalid("hours", input));
    }
    if minutes > 59 {
        return Err(DateTimeParseError::invalid("minutes", input));
    }
    if seconds > 59 {
        return Err(DateTimeParseError::invalid("seconds", input));
    }

    // Skip fractional seconds, then parse the offset
    let mut rest = &input[19..];
    if let Some(frac) = rest.strip_prefix('.') {
        let digits = frac.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return Err(DateTimeParseError::invalid("fractional seconds", input));
        }
        rest = &frac[digits..];
    }
    let offset_min = if rest.is_empty() {
        0
    } else {
        parse_timezone_offset(rest)?
    };

    let local = date_to_days(year, month, day) * SECONDS_PER_DAY
        + hours * SECONDS_PER_HOUR
        + minutes * SECONDS_PER_MINUTE
        + seconds;

    // local time = UTC + offset
    Ok(local - offset_min as i64 * SECONDS_PER_MINUTE)
}

/// Formats seconds since the Unix epoch as an RFC 3339 UTC datetime.
pub fn format_timestamp_rfc3339(epoch_seconds: i64) -> String {
    let days = epoch_seconds.div_euclid(SECONDS_PER_DAY);
    let time = epoch_seconds.rem_euclid(SECONDS_PER_DAY);

    let (year, month, day) = days_to_date(days);
    let hours = time / SECONDS_PER_HOUR;
    let minutes = (time % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = time % SECONDS_PER_MINUTE;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year, month, day, hours, minutes, seconds
    )
}
