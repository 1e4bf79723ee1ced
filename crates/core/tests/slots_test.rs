use chrono::{Duration, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use courtside_core::slots::plan_hourly_slots;
use pretty_assertions::assert_eq;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

#[test]
fn test_hourly_slots_for_each_day() {
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
    let planned = plan_hourly_slots(8, 22, day(2), 7, Tz::UTC, now);

    assert_eq!(planned.len(), 14 * 7);
    for slot in &planned {
        assert_eq!(slot.end_time - slot.start_time, Duration::hours(1));
        assert!((8..22).contains(&slot.start_time.hour()));
    }
    assert!(planned.windows(2).all(|w| w[0].start_time < w[1].start_time));
}

#[test]
fn test_past_slots_are_skipped() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
    let planned = plan_hourly_slots(8, 12, day(19), 1, Tz::UTC, now);

    let hours: Vec<u32> = planned.iter().map(|s| s.start_time.hour()).collect();
    assert_eq!(hours, vec![10, 11]);
}

#[test]
fn test_closing_at_midnight() {
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
    let planned = plan_hourly_slots(22, 24, day(2), 1, Tz::UTC, now);

    assert_eq!(planned.len(), 2);
    assert_eq!(
        planned[1].end_time,
        Utc.with_ymd_and_hms(2026, 10, 3, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_local_hours_convert_to_utc() {
    let madrid: Tz = "Europe/Madrid".parse().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
    let planned = plan_hourly_slots(
        9,
        10,
        NaiveDate::from_ymd_opt(2026, 7, 2).unwrap(),
        1,
        madrid,
        now,
    );

    // CEST is UTC+2 in July.
    assert_eq!(
        planned[0].start_time,
        Utc.with_ymd_and_hms(2026, 7, 2, 7, 0, 0).unwrap()
    );
}

#[test]
fn test_dst_gap_hour_is_dropped() {
    // 2026-03-29 02:00 does not exist in Europe/Madrid.
    let madrid: Tz = "Europe/Madrid".parse().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let planned = plan_hourly_slots(
        1,
        4,
        NaiveDate::from_ymd_opt(2026, 3, 29).unwrap(),
        1,
        madrid,
        now,
    );

    assert_eq!(planned.len(), 2);
}

#[test]
fn test_inverted_hours_yield_nothing() {
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
    assert!(plan_hourly_slots(10, 8, day(2), 3, Tz::UTC, now).is_empty());
}

#[test]
fn test_local_day_bounds() {
    use courtside_core::slots::local_day_bounds;

    let (start, end) = local_day_bounds(day(19), Tz::UTC);
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap());
    assert_eq!(end - start, Duration::hours(24));

    // The day of the autumn clock change in Madrid lasts 25 hours.
    let madrid: Tz = "Europe/Madrid".parse().unwrap();
    let (start, end) = local_day_bounds(day(25), madrid);
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 24, 22, 0, 0).unwrap());
    assert_eq!(end - start, Duration::hours(25));
}
