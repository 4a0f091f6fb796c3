use std::str::FromStr;

use chrono::{Offset, TimeZone};
use chrono_tz::Tz;
use time::{macros::format_description, Date, OffsetDateTime, Time, UtcOffset};

#[derive(thiserror::Error, Debug)]
#[error("unknown timezone '{0}', expected an IANA zone name or a +HH:MM offset")]
pub struct UnknownTimezone(String);

/// Timezone reading instants are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingTimezone {
    /// Same offset all year.
    Fixed(UtcOffset),
    /// IANA zone; the offset follows its DST rules at each instant.
    Zone(Tz),
}

impl ReadingTimezone {
    /// First instant of `date` in this zone.
    ///
    /// Where a DST change skips midnight the day starts at the first local
    /// hour that exists.
    pub fn local_midnight(self, date: Date) -> Option<OffsetDateTime> {
        match self {
            Self::Fixed(offset) => Some(date.with_time(Time::MIDNIGHT).assume_offset(offset)),
            Self::Zone(tz) => {
                let (year, month, day) = (date.year(), u32::from(u8::from(date.month())), u32::from(date.day()));
                let local = (0..=2).find_map(|hour| tz.with_ymd_and_hms(year, month, day, hour, 0, 0).earliest())?;
                let offset = UtcOffset::from_whole_seconds(local.offset().fix().local_minus_utc()).ok()?;
                let instant = OffsetDateTime::from_unix_timestamp(local.timestamp()).ok()?;
                Some(instant.to_offset(offset))
            }
        }
    }

    /// The same instant, expressed with this zone's offset at that moment.
    pub fn localize(self, instant: OffsetDateTime) -> Option<OffsetDateTime> {
        let offset = match self {
            Self::Fixed(offset) => offset,
            Self::Zone(tz) => {
                let utc = chrono::DateTime::from_timestamp(instant.unix_timestamp(), 0)?;
                let seconds = tz.offset_from_utc_datetime(&utc.naive_utc()).fix().local_minus_utc();
                UtcOffset::from_whole_seconds(seconds).ok()?
            }
        };
        Some(instant.to_offset(offset))
    }
}

impl From<UtcOffset> for ReadingTimezone {
    fn from(offset: UtcOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl From<Tz> for ReadingTimezone {
    fn from(tz: Tz) -> Self {
        Self::Zone(tz)
    }
}

impl FromStr for ReadingTimezone {
    type Err = UnknownTimezone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(tz) = s.parse::<Tz>() {
            return Ok(Self::Zone(tz));
        }

        let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
        UtcOffset::parse(s, &format)
            .map(Self::Fixed)
            .map_err(|_| UnknownTimezone(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    #[test]
    fn parses_zone_names_and_offsets() {
        assert_eq!(
            "America/Los_Angeles".parse::<ReadingTimezone>().unwrap(),
            ReadingTimezone::Zone(Tz::America__Los_Angeles)
        );
        assert_eq!(
            " -08:00 ".parse::<ReadingTimezone>().unwrap(),
            ReadingTimezone::Fixed(offset!(-8))
        );
        assert!("Pacific Time".parse::<ReadingTimezone>().is_err());
    }

    #[test]
    fn local_midnight_follows_dst() {
        let la = ReadingTimezone::Zone(Tz::America__Los_Angeles);

        let summer = la.local_midnight(date!(2020 - 07 - 01)).unwrap();
        assert_eq!(summer, datetime!(2020-07-01 07:00:00 UTC));
        assert_eq!(summer.offset(), offset!(-7));

        let winter = la.local_midnight(date!(2020 - 12 - 01)).unwrap();
        assert_eq!(winter, datetime!(2020-12-01 08:00:00 UTC));
        assert_eq!(winter.offset(), offset!(-8));
    }

    #[test]
    fn skipped_midnight_starts_at_first_existing_hour() {
        // Havana springs forward at midnight.
        let havana = ReadingTimezone::Zone(Tz::America__Havana);
        let start = havana.local_midnight(date!(2020 - 03 - 08)).unwrap();
        assert_eq!(start, datetime!(2020-03-08 05:00:00 UTC));
    }

    #[test]
    fn localize_uses_offset_in_effect() {
        let la = ReadingTimezone::Zone(Tz::America__Los_Angeles);
        let summer = la.localize(datetime!(2020-07-15 12:00:00 UTC)).unwrap();
        assert_eq!(summer.offset(), offset!(-7));
        let winter = la.localize(datetime!(2020-01-15 12:00:00 UTC)).unwrap();
        assert_eq!(winter.offset(), offset!(-8));
        assert_eq!(winter, datetime!(2020-01-15 12:00:00 UTC));
    }
}
