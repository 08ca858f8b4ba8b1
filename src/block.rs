//! Tariff time-block classification
//!
//! A moment in local wall-clock time is mapped to one of five ordinal blocks.
//! The day is split into three bands (peak, shoulder, off-peak); the season
//! and whether the day is a workday pick the row of the tariff table and the
//! band picks the column. Lower block numbers are higher-demand periods.

use crate::error::{Result, TimeBlockError};
use crate::holiday::is_holiday;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use std::ops::Range;

/// Block reported when no band matched. Never a valid tariff block.
pub const UNMATCHED_BLOCK: u8 = 0;

/// High or low tariff season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// November to February
    High,
    /// March to October
    Low,
}

impl Season {
    pub const fn from_month(month: u32) -> Self {
        match month {
            11 | 12 | 1 | 2 => Self::High,
            _ => Self::Low,
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

/// Partition of the day into demand bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Peak,
    Shoulder,
    OffPeak,
}

const PEAK: &[Range<f64>] = &[7.0..14.0, 16.0..20.0];
const SHOULDER: &[Range<f64>] = &[6.0..7.0, 14.0..16.0, 20.0..22.0];
const OFF_PEAK: &[Range<f64>] = &[0.0..6.0, 22.0..24.0];

impl Band {
    /// Bands in column order of the tariff table
    pub const ALL: [Self; 3] = [Self::Peak, Self::Shoulder, Self::OffPeak];

    /// Half-open hour intervals covered by this band
    pub const fn ranges(self) -> &'static [Range<f64>] {
        match self {
            Self::Peak => PEAK,
            Self::Shoulder => SHOULDER,
            Self::OffPeak => OFF_PEAK,
        }
    }

    pub fn contains(self, time_of_day: f64) -> bool {
        self.ranges().iter().any(|r| r.contains(&time_of_day))
    }

    /// Band covering `time_of_day`, `None` outside `[0, 24)`
    pub fn from_time_of_day(time_of_day: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.contains(time_of_day))
    }

    const fn column(self) -> u8 {
        match self {
            Self::Peak => 0,
            Self::Shoulder => 1,
            Self::OffPeak => 2,
        }
    }
}

/// Block number for a season/workday row and band column
pub const fn tier(season: Season, is_workday: bool, band: Band) -> u8 {
    let row_base = match (season, is_workday) {
        (Season::High, true) => 1,
        (Season::High, false) | (Season::Low, true) => 2,
        (Season::Low, false) => 3,
    };
    row_base + band.column()
}

/// Fractional hour of day, seconds ignored
pub fn time_of_day(hour: u32, minute: u32) -> f64 {
    f64::from(hour) + f64::from(minute) / 60.0
}

/// Monday to Friday and not a holiday
pub fn is_workday(weekday: Weekday, holiday: bool) -> bool {
    !matches!(weekday, Weekday::Sat | Weekday::Sun) && !holiday
}

/// Result of classifying a single moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeBlockReading {
    /// Tariff block 1-5; 0 flags an uncovered time of day
    pub block: u8,
    pub is_workday: bool,
    pub is_high_season: bool,
    /// Hour of day with minutes as a fraction
    pub current_time: f64,
    pub month: u32,
    pub hour: u32,
    pub minute: u32,
    pub is_holiday: bool,
}

impl TimeBlockReading {
    /// Whether the block is a real tariff block
    pub const fn is_valid(&self) -> bool {
        self.block != UNMATCHED_BLOCK
    }

    /// Supplementary attributes published next to the block value
    pub fn attributes(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut attrs = serde_json::Map::new();
        attrs.insert("is_workday".into(), self.is_workday.into());
        attrs.insert("is_high_season".into(), self.is_high_season.into());
        attrs.insert("current_time".into(), self.current_time.into());
        attrs.insert("month".into(), self.month.into());
        attrs.insert("hour".into(), self.hour.into());
        attrs.insert("minute".into(), self.minute.into());
        attrs.insert("is_holiday".into(), self.is_holiday.into());
        attrs
    }
}

/// Classify a local wall-clock timestamp.
///
/// Holiday status is derived first, then workday status, then season. A time
/// of day outside every band yields block 0 and an error log; the band table
/// covers the whole day so this only happens if the table is broken.
pub fn classify(timestamp: NaiveDateTime) -> TimeBlockReading {
    let date = timestamp.date();
    let hour = timestamp.hour();
    let minute = timestamp.minute();
    let month = date.month();

    let holiday = is_holiday(date);
    let workday = is_workday(date.weekday(), holiday);
    let season = Season::from_month(month);
    let current_time = time_of_day(hour, minute);

    let block = match Band::from_time_of_day(current_time) {
        Some(band) => tier(season, workday, band),
        None => {
            tracing::error!(
                current_time,
                ?season,
                workday,
                "Time of day not covered by any band; reporting block 0"
            );
            UNMATCHED_BLOCK
        }
    };

    TimeBlockReading {
        block,
        is_workday: workday,
        is_high_season: season.is_high(),
        current_time,
        month,
        hour,
        minute,
        is_holiday: holiday,
    }
}

/// Parse a local timestamp such as `2024-07-15T08:30` or `2024-07-15 08:30:15`
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    let input = input.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| TimeBlockError::invalid_date(format!("unrecognized timestamp '{input}'")))
}

/// Like [`classify`], but an uncovered time of day is an error
pub fn classify_checked(timestamp: NaiveDateTime) -> Result<TimeBlockReading> {
    let reading = classify(timestamp);
    if reading.is_valid() {
        Ok(reading)
    } else {
        Err(TimeBlockError::unmatched_time_band(reading.current_time))
    }
}
