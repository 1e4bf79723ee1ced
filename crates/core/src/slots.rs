//! Slot planning for the generation sweep.

use chrono::{DateTime, Days, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Hourly slots from `opening_hour` to `closing_hour` (local time) for `days`
/// consecutive days starting at `first_day`. Slots that already started are
/// dropped, as are local hours that do not exist because of a DST jump.
pub fn plan_hourly_slots(
    opening_hour: i32,
    closing_hour: i32,
    first_day: NaiveDate,
    days: u32,
    timezone: Tz,
    now: DateTime<Utc>,
) -> Vec<PlannedSlot> {
    let mut planned = Vec::new();
    if closing_hour <= opening_hour {
        return planned;
    }

    for offset in 0..days {
        let Some(day) = first_day.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        for hour in opening_hour.max(0)..closing_hour.min(24) {
            let Some(local) = day.and_hms_opt(hour as u32, 0, 0) else {
                continue;
            };
            let start = match timezone.from_local_datetime(&local) {
                LocalResult::Single(t) => t,
                LocalResult::Ambiguous(earliest, _) => earliest,
                LocalResult::None => continue,
            }
            .with_timezone(&Utc);

            if start <= now {
                continue;
            }
            planned.push(PlannedSlot {
                start_time: start,
                end_time: start + Duration::hours(1),
            });
        }
    }

    planned
}

/// UTC bounds `[start, end)` of a local calendar day.
pub fn local_day_bounds(date: NaiveDate, timezone: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let to_utc = |day: NaiveDate| {
        let midnight = day.and_time(NaiveTime::MIN);
        timezone
            .from_local_datetime(&midnight)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    };
    let next = date.succ_opt().unwrap_or(NaiveDate::MAX);
    (to_utc(date), to_utc(next))
}
