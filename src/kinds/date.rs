//! Date/time kind.
//!
//! Inputs are matched against an ordered list of format regexes whose named
//! capture groups supply date components:
//!
//! | Group         | Meaning                                        |
//! |---------------|------------------------------------------------|
//! | `year`        | non-negative year                              |
//! | `month`       | `1`-`12`, or an English month name (3+ letters)|
//! | `day`         | day of month, leap-year aware                  |
//! | `hour`        | `0`-`23`                                       |
//! | `minute`      | `0`-`59`                                       |
//! | `second`      | `0`-`59`                                       |
//! | `millisecond` | fraction of a second (`5` is 500ms)            |
//! | `zulu`        | `Z` marker for UTC                             |
//! | `offset`      | `+HH:MM`, `-HHMM` or `+HH`                     |
//!
//! The first format that matches decides; later formats are not tried even if
//! the components fail validation. Missing components come from
//! [`DateObject::DEFAULT`], so date-only and time-only formats work.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::result::{failure, failure_all, success, VarResult};
use crate::variable::{Kind, Optional, Transformed, Variable};

const ZONE: &str = r"(?P<zulu>[Zz])?(?P<offset>[+-][0-9]{2}(?::?[0-9]{2})?)?";

static ISO_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<year>[+-]?[0-9]{{4,}})-(?P<month>[0-9]{{1,2}}|[A-Za-z]{{3,}})-(?P<day>[0-9]{{1,2}})(?:[Tt ](?P<hour>[0-9]{{1,2}}):(?P<minute>[0-9]{{2}})(?::(?P<second>[0-9]{{2}})(?:[.,](?P<millisecond>[0-9]+))?)?)?{}$",
        ZONE
    ))
    .expect("iso date regex")
});

static TIME_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^[Tt]?(?P<hour>[0-9]{{1,2}}):(?P<minute>[0-9]{{2}})(?::(?P<second>[0-9]{{2}})(?:[.,](?P<millisecond>[0-9]+))?)?{}$",
        ZONE
    ))
    .expect("time regex")
});

static OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-])([0-9]{1,2})(?::?([0-9]{2}))?$").expect("offset regex"));

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Largest offset from UTC in minutes (14:00).
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Timezone of a [`DateObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Timezone {
    /// No marker; interpreted in the local zone.
    Local,
    /// `Z` marker.
    Utc,
    /// Explicit offset east of UTC, in minutes.
    Offset { minutes: i32 },
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Local => Ok(()),
            Timezone::Utc => write!(f, "Z"),
            Timezone::Offset { minutes } => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                let abs = minutes.abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
            }
        }
    }
}

/// Calendar components extracted from a date string.
///
/// Components are validated on parse but not against a real calendar beyond
/// days-per-month; use [`DateObject::to_datetime`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateObject {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
    pub timezone: Timezone,
}

impl DateObject {
    /// Source of components a format does not capture.
    pub const DEFAULT: DateObject = DateObject {
        year: 2000,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
        timezone: Timezone::Local,
    };

    /// Every range violation in this object, in component order.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.year < 0 {
            issues.push("year must be a non-negative integer".to_string());
        }
        if !(1..=12).contains(&self.month) {
            issues.push("month must be between 1 and 12".to_string());
        }
        let last_day = days_in_month(self.year, self.month);
        if !(1..=last_day).contains(&self.day) {
            issues.push(format!("day must be between 1 and {}", last_day));
        }
        if self.hour > 23 {
            issues.push("hour must be between 0 and 23".to_string());
        }
        if self.minute > 59 {
            issues.push("minute must be between 0 and 59".to_string());
        }
        if self.second > 59 {
            issues.push("second must be between 0 and 59".to_string());
        }
        if self.millisecond > 999 {
            issues.push("millisecond must be between 0 and 999".to_string());
        }
        if let Timezone::Offset { minutes } = self.timezone {
            if minutes.abs() > MAX_OFFSET_MINUTES {
                issues.push("timezone offset must be within ±14:00".to_string());
            }
        }
        issues
    }

    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_milli_opt(
            self.hour,
            self.minute,
            self.second,
            self.millisecond,
        )
    }

    /// Resolve to an instant. Local times that are skipped or repeated by a
    /// DST transition yield None.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let naive = self.to_naive_datetime()?;
        match self.timezone {
            Timezone::Utc => {
                let utc = Utc.from_utc_datetime(&naive);
                Some(utc.with_timezone(&utc.offset().fix()))
            }
            Timezone::Offset { minutes } => FixedOffset::east_opt(minutes * 60)?
                .from_local_datetime(&naive)
                .single(),
            Timezone::Local => {
                let local = Local.from_local_datetime(&naive).single()?;
                Some(local.with_timezone(&local.offset().fix()))
            }
        }
    }
}

impl Default for DateObject {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DateObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}{}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.millisecond,
            self.timezone
        )
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in `month`; 31 when the month itself is out of range.
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    if lower.chars().count() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(&lower))
        .map(|index| index as u32 + 1)
}

/// Digits of a fraction of a second as milliseconds, truncating extra digits.
fn fraction_to_millis(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut padded: String = digits.chars().take(3).collect();
    while padded.len() < 3 {
        padded.push('0');
    }
    padded.parse().ok()
}

/// Offset in minutes, or the issue describing why it is invalid.
fn parse_offset(raw: &str) -> Result<i32, String> {
    let caps = OFFSET
        .captures(raw)
        .ok_or_else(|| "timezone offset must look like +HH:MM".to_string())?;
    let hours: i32 = caps[2]
        .parse()
        .map_err(|_| "timezone offset must be within ±14:00".to_string())?;
    let minutes: i32 = match caps.get(3) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| "timezone offset minutes must be between 0 and 59".to_string())?,
        None => 0,
    };
    if minutes > 59 {
        return Err("timezone offset minutes must be between 0 and 59".to_string());
    }
    let total = hours * 60 + minutes;
    Ok(if &caps[1] == "-" { -total } else { total })
}

fn group<'a>(caps: &'a Captures<'_>, name: &str) -> Option<&'a str> {
    caps.name(name).map(|m| m.as_str()).filter(|s| !s.is_empty())
}

/// Build a date from a structural match, collecting every component issue.
fn extract(caps: &Captures<'_>) -> VarResult<DateObject> {
    let mut date = DateObject::DEFAULT;
    let mut issues = Vec::new();

    // Unparseable numbers become values the range checks reject.
    let number = |raw: &str| raw.parse::<u32>().unwrap_or(u32::MAX);

    if let Some(raw) = group(caps, "year") {
        date.year = raw.parse().unwrap_or(-1);
    }
    if let Some(raw) = group(caps, "month") {
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            date.month = number(raw);
        } else {
            match month_from_name(raw) {
                Some(month) => date.month = month,
                None => {
                    issues.push("month name is not recognized".to_string());
                    date.month = DateObject::DEFAULT.month;
                }
            }
        }
    }
    if let Some(raw) = group(caps, "day") {
        date.day = number(raw);
    }
    if let Some(raw) = group(caps, "hour") {
        date.hour = number(raw);
    }
    if let Some(raw) = group(caps, "minute") {
        date.minute = number(raw);
    }
    if let Some(raw) = group(caps, "second") {
        date.second = number(raw);
    }
    if let Some(raw) = group(caps, "millisecond") {
        date.millisecond = fraction_to_millis(raw).unwrap_or(u32::MAX);
    }

    match (group(caps, "zulu"), group(caps, "offset")) {
        (Some(_), Some(_)) => {
            issues.push("timezone cannot be both Z and an explicit offset".to_string())
        }
        (Some(_), None) => date.timezone = Timezone::Utc,
        (None, Some(raw)) => match parse_offset(raw) {
            Ok(minutes) => date.timezone = Timezone::Offset { minutes },
            Err(issue) => issues.push(issue),
        },
        (None, None) => {}
    }

    issues.extend(date.issues());
    if issues.is_empty() {
        success(date)
    } else {
        failure_all(issues)
    }
}

/// Dates matched against an ordered list of formats.
#[derive(Debug, Clone)]
pub struct Date {
    formats: Vec<Regex>,
}

impl Default for Date {
    fn default() -> Self {
        Self {
            formats: vec![ISO_DATE_TIME.clone(), TIME_ONLY.clone()],
        }
    }
}

impl Date {
    pub fn formats(&self) -> &[Regex] {
        &self.formats
    }
}

impl Kind for Date {
    type Output = DateObject;

    fn parse_str(&self, input: &str) -> VarResult<DateObject> {
        let trimmed = input.trim();
        match self.formats.iter().find_map(|format| format.captures(trimmed)) {
            Some(caps) => extract(&caps),
            None => failure("must be in a valid date format"),
        }
    }

    fn type_name(&self) -> String {
        "date".to_string()
    }
}

impl Variable<Date> {
    /// Try `format` after the existing formats.
    pub fn format(&self, format: Regex) -> Self {
        let mut formats = self.kind().formats.clone();
        formats.push(format);
        self.with_kind(Date { formats })
    }

    /// Replace the format list.
    pub fn formats<I>(&self, formats: I) -> Self
    where
        I: IntoIterator<Item = Regex>,
    {
        self.with_kind(Date {
            formats: formats.into_iter().collect(),
        })
    }

    /// Resolve parsed components to a `chrono` instant, rejecting
    /// combinations the calendar cannot represent.
    pub fn to_datetime(&self) -> Variable<Transformed<Date, DateTime<FixedOffset>>> {
        self.transform(resolve_instant)
    }
}

impl Variable<Optional<Date>> {
    /// Resolve present dates to `chrono` instants; missing input stays `None`.
    pub fn to_datetime(&self) -> Variable<Optional<Transformed<Date, DateTime<FixedOffset>>>> {
        self.transform_some(resolve_instant)
    }
}

fn resolve_instant(date: DateObject) -> VarResult<DateTime<FixedOffset>> {
    match date.to_datetime() {
        Some(instant) => success(instant),
        None => failure("is not a representable date and time"),
    }
}
