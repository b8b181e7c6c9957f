//! Recency bands for the last-contribution timestamp.
//!
//! Elapsed time is measured in days (24 × 3600 s, fractional) from the
//! parsed instant to now, and mapped through half-open intervals:
//!
//! | Days | Label | Slug |
//! |---|---|---|
//! | `[0, 30)` | `< 1mo` | `lt1mo` |
//! | `[30, 180)` | `< 6mo` | `lt6mo` |
//! | `[180, 365)` | `< 1y` | `lt1y` |
//! | `[365, 730)` | `< 2y` | `lt2y` |
//! | `[730, ∞)` | `2y+` | `2y` |
//!
//! Future dates land in the first band. Missing or unparseable input yields
//! no band at all; it is cosmetic, so it never becomes an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBand {
    UnderOneMonth,
    UnderSixMonths,
    UnderOneYear,
    UnderTwoYears,
    TwoYearsPlus,
}

impl AgeBand {
    pub fn label(self) -> &'static str {
        match self {
            Self::UnderOneMonth => "< 1mo",
            Self::UnderSixMonths => "< 6mo",
            Self::UnderOneYear => "< 1y",
            Self::UnderTwoYears => "< 2y",
            Self::TwoYearsPlus => "2y+",
        }
    }

    /// CSS-friendly identifier, used as the `pill-updated-*` class suffix.
    pub fn slug(self) -> &'static str {
        match self {
            Self::UnderOneMonth => "lt1mo",
            Self::UnderSixMonths => "lt6mo",
            Self::UnderOneYear => "lt1y",
            Self::UnderTwoYears => "lt2y",
            Self::TwoYearsPlus => "2y",
        }
    }

    /// Band for a number of elapsed days. Negative values count as fresh.
    pub fn from_days(days: f64) -> Self {
        if days < 30.0 {
            Self::UnderOneMonth
        } else if days < 180.0 {
            Self::UnderSixMonths
        } else if days < 365.0 {
            Self::UnderOneYear
        } else if days < 730.0 {
            Self::UnderTwoYears
        } else {
            Self::TwoYearsPlus
        }
    }
}

/// Parse a last-contribution timestamp.
///
/// Accepts the ISO-8601 shapes a collection is likely to carry:
/// - RFC 3339 (`2024-03-04T10:00:00Z`, `2024-03-04T10:00:00+02:00`);
/// - compact offsets and minute precision (`2024-03-04T10:00:00.000+0000`,
///   `2024-03-04T10:00Z`);
/// - naive date-times (`2024-03-04T10:00:00`, read as UTC);
/// - reduced-precision dates, at UTC midnight of their first day (`2024-03-04`,
///   `2024-03`, `2024`).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_with_offset(raw)
        .or_else(|| parse_naive(raw))
        .or_else(|| parse_date(raw))
}

fn parse_with_offset(raw: &str) -> Option<DateTime<Utc>> {
    let zoned = match raw.strip_suffix(['Z', 'z']) {
        Some(local) => format!("{local}+0000"),
        None => raw.to_string(),
    };
    ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"]
        .into_iter()
        .find_map(|format| DateTime::parse_from_str(&zoned, format).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(raw: &str) -> Option<DateTime<Utc>> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let is_year = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());
    let date = match raw.len() {
        4 if is_year(raw) => NaiveDate::from_ymd_opt(raw.parse().ok()?, 1, 1),
        7 if raw.get(..4).is_some_and(is_year) => {
            NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok()
        }
        _ => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
    }?;
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

/// Classify a timestamp against the current time.
pub fn classify(iso_date: Option<&str>) -> Option<AgeBand> {
    classify_at(iso_date, Utc::now())
}

/// Classify a timestamp against an explicit `now`.
pub fn classify_at(iso_date: Option<&str>, now: DateTime<Utc>) -> Option<AgeBand> {
    let then = parse_timestamp(iso_date?)?;
    let days = (now - then).num_milliseconds() as f64 / MILLIS_PER_DAY;
    Some(AgeBand::from_days(days))
}
