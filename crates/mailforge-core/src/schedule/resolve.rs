//! Resolution of schedule specs to timestamps.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone, Weekday};
use tracing::debug;

use super::model::{SchedulePreset, ScheduleSpec};

/// Wall-clock `hour:00:00` on `date` in `now`'s time zone.
///
/// A time skipped by a DST transition falls back to `fallback`.
fn at_hour<Tz: TimeZone>(
    now: &DateTime<Tz>,
    date: NaiveDate,
    hour: u32,
    fallback: DateTime<Tz>,
) -> DateTime<Tz> {
    NaiveTime::from_hms_opt(hour, 0, 0)
        .and_then(|time| {
            now.timezone()
                .from_local_datetime(&date.and_time(time))
                .earliest()
        })
        .unwrap_or(fallback)
}

fn resolve_preset<Tz: TimeZone>(preset: SchedulePreset, now: &DateTime<Tz>) -> DateTime<Tz> {
    let tomorrow = now.clone() + Duration::hours(24);
    match preset {
        SchedulePreset::InHours(hours) => now.clone() + Duration::hours(i64::from(hours)),
        SchedulePreset::TomorrowAt9 => at_hour(now, tomorrow.date_naive(), 9, tomorrow),
        SchedulePreset::TomorrowAt14 => at_hour(now, tomorrow.date_naive(), 14, tomorrow),
        SchedulePreset::NextMondayAt9 => {
            let mut date = tomorrow.date_naive();
            while date.weekday() != Weekday::Mon {
                date = date + Days::new(1);
            }
            let fallback = now.clone() + Duration::days(i64::from(days_between(now, date)));
            at_hour(now, date, 9, fallback)
        }
    }
}

fn days_between<Tz: TimeZone>(now: &DateTime<Tz>, date: NaiveDate) -> u32 {
    u32::try_from((date - now.date_naive()).num_days()).unwrap_or(7)
}

/// Resolves a spec against `now`.
///
/// Returns `None` for [`ScheduleSpec::Immediate`], unrecognised input and
/// explicit times that do not exist in `now`'s time zone. Preset hours are
/// wall-clock hours in that time zone.
#[must_use]
pub fn resolve_schedule<Tz: TimeZone>(
    spec: &ScheduleSpec,
    now: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    match spec {
        ScheduleSpec::Immediate => None,
        ScheduleSpec::Unrecognized(input) => {
            debug!("Unrecognized schedule {input:?}, sending immediately");
            None
        }
        ScheduleSpec::Preset(preset) => Some(resolve_preset(*preset, now)),
        ScheduleSpec::At { date, time } => now
            .timezone()
            .from_local_datetime(&date.and_time(*time))
            .earliest(),
    }
}
