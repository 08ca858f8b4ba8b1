#![no_main]
use chrono::{NaiveDate, NaiveTime};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    // Any representable day, any minute of the day
    let days = i32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let minute_of_day = u32::from(u16::from_be_bytes([data[4], data[5]])) % (24 * 60);
    let Some(date) = NaiveDate::from_num_days_from_ce_opt(days) else {
        return;
    };
    let Some(time) = NaiveTime::from_hms_opt(minute_of_day / 60, minute_of_day % 60, 0) else {
        return;
    };

    let reading = timeblock::classify(date.and_time(time));
    assert!((1..=5).contains(&reading.block));
    assert_eq!(reading.is_holiday, timeblock::is_holiday(date));

    let (year, month, day) = (
        i32::from(data[6]) * 16,
        u32::from(data[7] >> 4),
        u32::from(data[7] & 0x0f) * 2,
    );
    let checked = timeblock::holiday::calendar_date(year, month, day);
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(expected) => assert_eq!(checked.ok(), Some(expected)),
        None => assert!(matches!(
            checked,
            Err(timeblock::TimeBlockError::InvalidDate { .. })
        )),
    }
});
