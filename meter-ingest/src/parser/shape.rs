use serde_json::Value;
use time::{util::days_in_year_month, Date, Duration, Month, OffsetDateTime};

use super::{record::field, ParseError, RawRecord};
use crate::timezone::ReadingTimezone;

pub const MONTH_FIELD: &str = "Month";
pub const START_TIME_FIELD: &str = "start_time";
pub const DURATION_FIELD: &str = "duration";

/// Layout of an import batch, decided from its first record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// One row per property and calendar month.
    Monthly,
    /// One row per interval starting at an epoch second.
    Interval,
}

impl Shape {
    pub fn detect(records: &[RawRecord]) -> Option<Self> {
        records.first().map(|first| {
            if first.contains_key(MONTH_FIELD) {
                Self::Monthly
            } else {
                Self::Interval
            }
        })
    }

    /// Start and end of the period a record covers.
    ///
    /// Fails on records that lack the fields of this shape, so mixed batches are
    /// rejected rather than read with the wrong layout.
    pub fn interval(
        self,
        record: &RawRecord,
        index: usize,
        tz: impl Into<ReadingTimezone>,
    ) -> Result<(OffsetDateTime, OffsetDateTime), ParseError> {
        let tz = tz.into();
        match self {
            Self::Monthly => {
                let month = field(record, index, MONTH_FIELD)?;
                let month = month.as_str().ok_or_else(|| ParseError::InvalidMonth {
                    index,
                    value: month.to_string(),
                })?;
                month_interval(month, tz).ok_or_else(|| ParseError::InvalidMonth {
                    index,
                    value: month.to_string(),
                })
            }
            Self::Interval => {
                let start = field(record, index, START_TIME_FIELD)?;
                let duration = field(record, index, DURATION_FIELD)?;
                epoch_interval(start, duration, tz)
                    .map_err(|reason| ParseError::InvalidInterval { index, reason })
            }
        }
    }
}

/// Parse a `Mon-YY` label into the first instants of that month and the next.
///
/// Both boundaries are local midnight in `tz`, each with the offset in effect
/// on its own date. Month abbreviations match case-insensitively; two-digit
/// years pivot at 69 (`69`..`99` are 1900s, `00`..`68` are 2000s).
pub fn month_interval(
    month_year: &str,
    tz: impl Into<ReadingTimezone>,
) -> Option<(OffsetDateTime, OffsetDateTime)> {
    let tz = tz.into();
    let (month, year) = month_year.split_once('-')?;
    let month = parse_month_abbr(month)?;

    if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = year.parse().ok()?;
    let year = if yy < 69 { 2000 + yy } else { 1900 + yy };

    let first_day = Date::from_calendar_date(year, month, 1).ok()?;
    let days = i64::from(days_in_year_month(year, month));
    let next_first_day = first_day.checked_add(Duration::days(days))?;

    let start = tz.local_midnight(first_day)?;
    let end = tz.local_midnight(next_first_day)?;
    Some((start, end))
}

fn parse_month_abbr(s: &str) -> Option<Month> {
    let month = match s.to_ascii_lowercase().as_str() {
        "jan" => Month::January,
        "feb" => Month::February,
        "mar" => Month::March,
        "apr" => Month::April,
        "may" => Month::May,
        "jun" => Month::June,
        "jul" => Month::July,
        "aug" => Month::August,
        "sep" => Month::September,
        "oct" => Month::October,
        "nov" => Month::November,
        "dec" => Month::December,
        _ => return None,
    };
    Some(month)
}

/// Interval from an epoch-seconds start and a duration in seconds.
pub fn epoch_interval(
    start: &Value,
    duration: &Value,
    tz: impl Into<ReadingTimezone>,
) -> Result<(OffsetDateTime, OffsetDateTime), String> {
    let tz = tz.into();
    let start_time = if let Some(secs) = start.as_i64() {
        OffsetDateTime::from_unix_timestamp(secs).map_err(|e| format!("start_time {secs}: {e}"))?
    } else if let Some(secs) = start.as_f64() {
        OffsetDateTime::from_unix_timestamp_nanos((secs * 1e9) as i128)
            .map_err(|e| format!("start_time {secs}: {e}"))?
    } else {
        return Err(format!("start_time is not numeric: {start}"));
    };

    let length = if let Some(secs) = duration.as_i64() {
        Duration::seconds(secs)
    } else if let Some(length) = duration.as_f64().and_then(Duration::checked_seconds_f64) {
        length
    } else {
        return Err(format!("duration is not numeric: {duration}"));
    };

    if !length.is_positive() {
        return Err(format!("duration must be positive, got {duration}"));
    }

    let end_time = start_time
        .checked_add(length)
        .ok_or_else(|| "end_time out of range".to_string())?;

    let localize = |t: OffsetDateTime| tz.localize(t).ok_or_else(|| format!("{t} outside timezone range"));
    Ok((localize(start_time)?, localize(end_time)?))
}
