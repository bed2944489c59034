use std::fmt;

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Earliest year representable in the 7-bit DOS year field.
pub const DOS_EPOCH_YEAR: i32 = 1980;

/// Latest year representable in the 7-bit DOS year field.
pub const DOS_MAX_YEAR: i32 = DOS_EPOCH_YEAR + 0x7F;

/// MS-DOS packed modification time and date, as stored in ZIP headers.
///
/// Layout:
/// - `time`: `hour << 11 | minute << 5 | second / 2`
/// - `date`: `(year - 1980) << 9 | month << 5 | day`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DosDateTime {
    pub time: u16,
    pub date: u16,
}

impl DosDateTime {
    /// Encode a calendar timestamp.
    ///
    /// Seconds are truncated to the format's 2-second resolution. Years the
    /// date field cannot hold are an error rather than a wrapped value.
    pub fn from_datetime(datetime: &NaiveDateTime) -> Result<Self> {
        let year = datetime.year();
        if !(DOS_EPOCH_YEAR..=DOS_MAX_YEAR).contains(&year) {
            bail!(
                "Timestamp {datetime} cannot be stored in a ZIP header (supported years: {DOS_EPOCH_YEAR}-{DOS_MAX_YEAR})"
            );
        }

        let time = (datetime.hour() << 11) | (datetime.minute() << 5) | (datetime.second() / 2);
        let date = (((year - DOS_EPOCH_YEAR) as u32) << 9) | (datetime.month() << 5) | datetime.day();

        Ok(Self {
            time: time as u16,
            date: date as u16,
        })
    }

    /// Parse modification date to (year, month, day)
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let day = (self.date & 0x1F) as u8;
        let month = ((self.date >> 5) & 0x0F) as u8;
        let year = ((self.date >> 9) & 0x7F) + DOS_EPOCH_YEAR as u16;
        (year, month, day)
    }

    /// Parse modification time to (hour, minute, second)
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let second = ((self.time & 0x1F) * 2) as u8;
        let minute = ((self.time >> 5) & 0x3F) as u8;
        let hour = ((self.time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}

impl fmt::Display for DosDateTime {
    /// Formats the stored (2-second resolution) value as `YYYY-MM-DD HH:MM:SS`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.mod_date();
        let (hour, minute, second) = self.mod_time();
        write!(
            f,
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
        )
    }
}
