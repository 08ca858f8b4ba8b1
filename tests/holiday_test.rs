use chrono::NaiveDate;
use timeblock::TimeBlockError;
use timeblock::holiday::{
    FIXED_HOLIDAYS, calendar_date, easter_sunday, holidays_in_year, is_holiday,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn fixed_holidays_hold_every_year() {
    assert_eq!(FIXED_HOLIDAYS.len(), 12);
    for year in [2023, 2024, 2025] {
        for h in &FIXED_HOLIDAYS {
            assert!(
                is_holiday(date(year, h.month, h.day)),
                "{}-{:02}-{:02} ({})",
                year,
                h.month,
                h.day,
                h.name
            );
        }
    }
}

#[test]
fn fixed_set_matches_literal_dates() {
    let expected = [
        (1, 1),
        (1, 2),
        (2, 8),
        (4, 27),
        (5, 1),
        (5, 2),
        (6, 25),
        (8, 15),
        (10, 31),
        (11, 1),
        (12, 25),
        (12, 26),
    ];
    let actual: Vec<(u32, u32)> = FIXED_HOLIDAYS.iter().map(|h| (h.month, h.day)).collect();
    assert_eq!(actual, expected);
}

#[test]
fn easter_monday_and_pentecost_2024() {
    assert!(is_holiday(date(2024, 4, 1)));
    assert!(!is_holiday(date(2024, 4, 2)));
    assert!(!is_holiday(date(2024, 3, 31)));
    assert!(is_holiday(date(2024, 5, 20)));
    assert!(!is_holiday(date(2024, 5, 19)));
}

#[test]
fn variable_holidays_compare_full_date() {
    // Easter Monday 2024 is April 1; the same day in 2025 is an ordinary day
    assert!(is_holiday(date(2024, 4, 1)));
    assert!(!is_holiday(date(2025, 4, 1)));
    // Easter Monday 2025
    assert!(is_holiday(date(2025, 4, 21)));
    assert!(!is_holiday(date(2024, 4, 21)));
}

#[test]
fn answers_do_not_depend_on_call_order() {
    let probes = [
        date(2024, 4, 1),
        date(2025, 4, 21),
        date(1999, 4, 5),
        date(2024, 4, 2),
        date(2100, 3, 29),
    ];
    let first: Vec<bool> = probes.iter().map(|d| is_holiday(*d)).collect();
    let reversed: Vec<bool> = probes.iter().rev().map(|d| is_holiday(*d)).collect();
    let again: Vec<bool> = probes.iter().map(|d| is_holiday(*d)).collect();
    assert_eq!(first, again);
    assert_eq!(first, reversed.into_iter().rev().collect::<Vec<_>>());
    assert_eq!(first, vec![true, true, true, false, true]);
}

#[test]
fn ordinary_days_are_not_holidays() {
    assert!(!is_holiday(date(2024, 7, 15)));
    assert!(!is_holiday(date(2024, 3, 1)));
    assert!(!is_holiday(date(2024, 12, 24)));
}

#[test]
fn historical_and_future_years() {
    assert_eq!(easter_sunday(1700), Some(date(1700, 4, 11)));
    assert_eq!(easter_sunday(2200), Some(date(2200, 4, 6)));
    assert!(is_holiday(date(1700, 4, 12)));
    assert!(is_holiday(date(2200, 4, 7)));
}

#[test]
fn year_listing_contains_variable_dates() {
    let list = holidays_in_year(2024);
    let dates: Vec<NaiveDate> = list.iter().map(|h| h.date).collect();
    assert!(dates.contains(&date(2024, 4, 1)));
    assert!(dates.contains(&date(2024, 5, 20)));
    assert!(list.iter().all(|h| is_holiday(h.date)));
}

#[test]
fn calendar_date_accepts_exactly_the_real_dates() {
    for year in [1900, 2000, 2023, 2024] {
        for month in 0..=13 {
            for day in 0..=32 {
                let checked = calendar_date(year, month, day);
                match NaiveDate::from_ymd_opt(year, month, day) {
                    Some(expected) => assert_eq!(checked.ok(), Some(expected)),
                    None => assert!(
                        matches!(checked, Err(TimeBlockError::InvalidDate { .. })),
                        "{year}-{month}-{day} should be rejected"
                    ),
                }
            }
        }
    }
}
