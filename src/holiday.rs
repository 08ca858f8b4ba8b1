//! Slovenian public holiday calendar
//!
//! The calendar is the union of a closed set of twelve fixed-date holidays and
//! two holidays that move with Easter Sunday. Easter is recomputed for the
//! year of every date that is checked, so answers never depend on call order
//! or on which years were looked at before.

use crate::error::{Result, TimeBlockError};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// A holiday that falls on the same month and day every year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHoliday {
    /// Calendar month (1-12)
    pub month: u32,
    /// Day of month
    pub day: u32,
    /// Display name
    pub name: &'static str,
}

/// The fixed-date holidays, observed regardless of weekday
pub static FIXED_HOLIDAYS: [FixedHoliday; 12] = [
    FixedHoliday { month: 1, day: 1, name: "New Year's Day" },
    FixedHoliday { month: 1, day: 2, name: "New Year Holiday" },
    FixedHoliday { month: 2, day: 8, name: "Prešeren Day" },
    FixedHoliday { month: 4, day: 27, name: "Day of Uprising Against Occupation" },
    FixedHoliday { month: 5, day: 1, name: "Labour Day" },
    FixedHoliday { month: 5, day: 2, name: "Labour Day Holiday" },
    FixedHoliday { month: 6, day: 25, name: "Statehood Day" },
    FixedHoliday { month: 8, day: 15, name: "Assumption Day" },
    FixedHoliday { month: 10, day: 31, name: "Reformation Day" },
    FixedHoliday { month: 11, day: 1, name: "Remembrance Day" },
    FixedHoliday { month: 12, day: 25, name: "Christmas Day" },
    FixedHoliday { month: 12, day: 26, name: "Independence and Unity Day" },
];

/// Holidays whose date is an offset from Easter Sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VariableHoliday {
    /// Easter Sunday + 1 day
    EasterMonday,
    /// Easter Sunday + 50 days
    Pentecost,
}

impl VariableHoliday {
    /// All variable holidays in calendar order
    pub const ALL: [Self; 2] = [Self::EasterMonday, Self::Pentecost];

    /// Days after Easter Sunday
    pub const fn offset_days(self) -> u64 {
        match self {
            Self::EasterMonday => 1,
            Self::Pentecost => 50,
        }
    }

    /// Display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::EasterMonday => "Easter Monday",
            Self::Pentecost => "Pentecost",
        }
    }

    /// Date of this holiday in `year`
    pub fn date_in(self, year: i32) -> Option<NaiveDate> {
        easter_sunday(year)?.checked_add_days(Days::new(self.offset_days()))
    }
}

/// Whether a holiday is fixed or Easter-relative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    Fixed,
    Variable,
}

/// A concrete holiday occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: &'static str,
    pub kind: HolidayKind,
}

/// Build a calendar date, rejecting malformed input instead of clamping it
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        TimeBlockError::invalid_date(format!(
            "{year:04}-{month:02}-{day:02} is not a valid calendar date"
        ))
    })
}

/// Compute Easter Sunday for a Gregorian `year`.
///
/// Anonymous Gregorian algorithm (Meeus/Jones/Butcher). Euclidean division
/// keeps it correct for proleptic years before 1 AD as well. Returns `None`
/// only when the result is outside the range `NaiveDate` can represent.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let n = h + l - 7 * m + 114;
    let month = u32::try_from(n.div_euclid(31)).ok()?;
    let day = u32::try_from(n.rem_euclid(31) + 1).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn fixed_holiday_on(date: NaiveDate) -> Option<&'static FixedHoliday> {
    FIXED_HOLIDAYS
        .iter()
        .find(|h| h.month == date.month() && h.day == date.day())
}

fn variable_holiday_on(date: NaiveDate) -> Option<VariableHoliday> {
    let easter = easter_sunday(date.year())?;
    VariableHoliday::ALL
        .into_iter()
        .find(|h| easter.checked_add_days(Days::new(h.offset_days())) == Some(date))
}

/// Whether `date` is a recognized public holiday.
///
/// True when the month and day match a fixed holiday, or the full date equals
/// Easter Monday or Pentecost of the same year.
pub fn is_holiday(date: NaiveDate) -> bool {
    fixed_holiday_on(date).is_some() || variable_holiday_on(date).is_some()
}

/// Name of the holiday falling on `date`, if any
pub fn holiday_name(date: NaiveDate) -> Option<&'static str> {
    fixed_holiday_on(date)
        .map(|h| h.name)
        .or_else(|| variable_holiday_on(date).map(VariableHoliday::name))
}

/// Easter Monday and Pentecost for `year`
pub fn variable_holidays(year: i32) -> Vec<(NaiveDate, &'static str)> {
    VariableHoliday::ALL
        .into_iter()
        .filter_map(|h| h.date_in(year).map(|d| (d, h.name())))
        .collect()
}

/// Every holiday of `year`, sorted by date
pub fn holidays_in_year(year: i32) -> Vec<Holiday> {
    let fixed = FIXED_HOLIDAYS.iter().filter_map(|h| {
        NaiveDate::from_ymd_opt(year, h.month, h.day).map(|date| Holiday {
            date,
            name: h.name,
            kind: HolidayKind::Fixed,
        })
    });
    let variable = variable_holidays(year)
        .into_iter()
        .map(|(date, name)| Holiday {
            date,
            name,
            kind: HolidayKind::Variable,
        });

    let mut all: Vec<Holiday> = fixed.chain(variable).collect();
    all.sort_by_key(|h| h.date);
    all
}
