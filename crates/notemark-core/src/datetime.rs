//! Timestamp canonicalisation
//!
//! Source timestamps arrive as RFC 3339 strings with arbitrary offsets and
//! optional fractional seconds. Output always uses one form, in UTC:
//! `YYYY-MM-DDTHH:MM:SSZ`, or `YYYY-MM-DD` for a date without a time.

use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

/// A parsed timestamp normalised to UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    year: i64,
    month: u32,
    day: u32,
    /// Hours, minutes, seconds; absent for date-only values
    time: Option<(u32, u32, u32)>,
}

impl Timestamp {
    /// Parse `YYYY-MM-DD` or an RFC 3339 date-time
    ///
    /// A date-time without an offset is taken as UTC.
    ///
    /// ```
    /// use notemark_core::datetime::Timestamp;
    ///
    /// let ts = Timestamp::parse("2024-03-05T23:30:00.000-02:00").unwrap();
    /// assert_eq!(ts.to_string(), "2024-03-06T01:30:00Z");
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (date, rest) = (input.get(..10)?, input.get(10..)?);
        let (year, month, day) = parse_date(date)?;

        if rest.is_empty() {
            return Some(Self {
                year,
                month,
                day,
                time: None,
            });
        }

        let rest = rest.strip_prefix(['T', 't', ' '])?;
        let (hour, minute, second, offset) = parse_time(rest)?;

        let total = days_from_civil(year, month, day) * SECONDS_PER_DAY
            + i64::from(hour) * 3600
            + i64::from(minute) * 60
            + i64::from(second)
            - offset;
        let (year, month, day) = civil_from_days(total.div_euclid(SECONDS_PER_DAY));
        let secs = total.rem_euclid(SECONDS_PER_DAY);

        Some(Self {
            year,
            month,
            day,
            time: Some((
                (secs / 3600) as u32,
                (secs % 3600 / 60) as u32,
                (secs % 60) as u32,
            )),
        })
    }

    /// The calendar date as `YYYY-MM-DD`
    pub fn date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// Whether a time of day is present
    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date())?;
        if let Some((h, m, s)) = self.time {
            write!(f, "T{:02}:{:02}:{:02}Z", h, m, s)?;
        }
        Ok(())
    }
}

/// Canonical form of a timestamp string, or `None` if it does not parse
pub fn canonical(input: &str) -> Option<String> {
    Timestamp::parse(input).map(|ts| ts.to_string())
}

fn parse_date(date: &str) -> Option<(i64, u32, u32)> {
    let bytes = date.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let year = parse_digits(&date[0..4])? as i64;
    let month = parse_digits(&date[5..7])?;
    let day = parse_digits(&date[8..10])?;

    if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
        return None;
    }
    Some((year, month, day))
}

/// Parse `HH:MM[:SS[.fff]][Z|±HH:MM|±HHMM]`, returning the offset in seconds
fn parse_time(time: &str) -> Option<(u32, u32, u32, i64)> {
    let hour = parse_digits(time.get(0..2)?)?;
    if time.get(2..3)? != ":" {
        return None;
    }
    let minute = parse_digits(time.get(3..5)?)?;
    let mut rest = time.get(5..)?;

    let mut second = 0;
    if let Some(stripped) = rest.strip_prefix(':') {
        second = parse_digits(stripped.get(0..2)?)?;
        rest = stripped.get(2..)?;
        if let Some(fraction) = rest.strip_prefix(['.', ',']) {
            let digits = fraction.len() - fraction.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits == 0 {
                return None;
            }
            rest = &fraction[digits..];
        }
    }

    // Leap seconds are clamped
    if hour > 23 || minute > 59 || second > 60 {
        return None;
    }
    let second = second.min(59);

    let offset = match rest {
        "" | "Z" | "z" => 0,
        _ => {
            let sign = match rest.as_bytes()[0] {
                b'+' => 1,
                b'-' => -1,
                _ => return None,
            };
            let digits = rest[1..].replace(':', "");
            if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let hours = i64::from(parse_digits(&digits[0..2])?);
            let minutes = i64::from(parse_digits(&digits[2..4])?);
            if hours > 23 || minutes > 59 {
                return None;
            }
            sign * (hours * 3600 + minutes * 60)
        }
    };

    Some((hour, minute, second, offset))
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let month = i64::from(month);
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`]
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(days_from_civil(2024, 2, 29)), (2024, 2, 29));
    }

    #[test]
    fn test_utc_with_fraction() {
        assert_eq!(
            canonical("2024-03-05T10:00:00.000Z").as_deref(),
            Some("2024-03-05T10:00:00Z")
        );
    }

    #[test]
    fn test_offsets_converted_to_utc() {
        assert_eq!(
            canonical("2024-03-05T23:30:00+02:00").as_deref(),
            Some("2024-03-05T21:30:00Z")
        );
        assert_eq!(
            canonical("2024-01-01T00:30:00+0100").as_deref(),
            Some("2023-12-31T23:30:00Z")
        );
        assert_eq!(
            canonical("2024-02-28T23:00:00-05:00").as_deref(),
            Some("2024-02-29T04:00:00Z")
        );
    }

    #[test]
    fn test_same_instant_same_output() {
        assert_eq!(
            canonical("2024-06-01T12:00:00+09:00"),
            canonical("2024-06-01T03:00:00Z")
        );
    }

    #[test]
    fn test_date_only() {
        let ts = Timestamp::parse("2024-03-06").unwrap();
        assert!(!ts.has_time());
        assert_eq!(ts.to_string(), "2024-03-06");
    }

    #[test]
    fn test_minutes_only_and_no_offset() {
        assert_eq!(
            canonical("2024-03-05T08:15").as_deref(),
            Some("2024-03-05T08:15:00Z")
        );
    }

    #[test]
    fn test_invalid() {
        assert!(canonical("").is_none());
        assert!(canonical("yesterday").is_none());
        assert!(canonical("2023-02-29").is_none());
        assert!(canonical("2024-13-01").is_none());
        assert!(canonical("2024-03-05T25:00:00Z").is_none());
        assert!(canonical("2024-03-05T10:00:00+2").is_none());
    }
}
