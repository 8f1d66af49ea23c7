//! Worked-hours arithmetic over attendance records.
//!
//! Every function here takes `now` as an argument. Hours are `Option<f64>`,
//! where `None` stands for a record with no punch data ("N/A").

use chrono::{DateTime, Utc};

use crate::model::attendance::{AttendanceRecord, TimerStatus};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn hours_from_millis(millis: i64) -> f64 {
    round2(millis.max(0) as f64 / MILLIS_PER_HOUR)
}

/// Freezes the clock at the pause start for paused sessions.
///
/// Time spent in the current pause is only folded into
/// `total_paused_duration` on resume, so a paused record must not see
/// the clock move past `paused_at`.
pub fn effective_now(record: &AttendanceRecord, now: DateTime<Utc>) -> DateTime<Utc> {
    match (record.timer_status, record.paused_at) {
        (TimerStatus::Paused, Some(paused_at)) => paused_at.min(now),
        _ => now,
    }
}

/// Hours accrued so far by an open session.
///
/// `(now - punch_in - total_paused_duration)` in hours, never negative.
pub fn compute_live_hours(record: &AttendanceRecord, now: DateTime<Utc>) -> Option<f64> {
    let punch_in = record.punch_in?;
    let elapsed = now.signed_duration_since(punch_in).num_milliseconds();
    let paused = record.total_paused_duration.max(0);

    Some(hours_from_millis(elapsed.saturating_sub(paused)))
}

/// Hours of a closed session, straight from the stored interval.
///
/// Paused time is not subtracted here.
pub fn compute_closed_hours(record: &AttendanceRecord) -> Option<f64> {
    let (punch_in, punch_out) = (record.punch_in?, record.punch_out?);

    Some(hours_from_millis(
        punch_out.signed_duration_since(punch_in).num_milliseconds(),
    ))
}

/// Closed hours for closed records, live hours for open ones.
pub fn compute_hours(record: &AttendanceRecord, now: DateTime<Utc>) -> Option<f64> {
    if record.is_closed() {
        compute_closed_hours(record)
    } else {
        compute_live_hours(record, effective_now(record, now))
    }
}

pub fn compute_salary_for_period(hours: Option<f64>, hourly_rate: Option<f64>) -> Option<f64> {
    Some(round2(hours? * hourly_rate?))
}

/// Folds the pause in progress into the accumulated paused milliseconds.
pub fn accrue_pause(
    total_paused: i64,
    paused_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    let current = paused_at
        .map(|start| now.signed_duration_since(start).num_milliseconds().max(0))
        .unwrap_or(0);

    total_paused.max(0).saturating_add(current)
}

/// Total closed hours across a period. `None` when no record was closed.
pub fn sum_hours<'a, I>(records: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    records
        .into_iter()
        .filter_map(compute_closed_hours)
        .fold(None, |total, hours| Some(total.unwrap_or(0.0) + hours))
        .map(round2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn open_record(punch_in: &str, paused_ms: i64) -> AttendanceRecord {
        let mut record = AttendanceRecord::blank(1, 7, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        record.punch_in = Some(at(punch_in));
        record.total_paused_duration = paused_ms;
        record.timer_status = TimerStatus::Active;
        record
    }

    #[test]
    fn live_hours_full_day() {
        let record = open_record("2025-01-10T09:00:00Z", 0);
        let hours = compute_live_hours(&record, at("2025-01-10T17:30:00Z"));
        assert_eq!(hours, Some(8.5));
    }

    #[test]
    fn live_hours_subtracts_pauses() {
        let record = open_record("2025-01-10T09:00:00Z", 1_800_000);
        let hours = compute_live_hours(&record, at("2025-01-10T17:30:00Z"));
        assert_eq!(hours, Some(8.0));
    }

    #[test]
    fn live_hours_rounds_to_two_decimals() {
        let record = open_record("2025-01-10T09:00:00Z", 0);
        // 20 minutes = 0.3333.. hours
        let hours = compute_live_hours(&record, at("2025-01-10T09:20:00Z"));
        assert_eq!(hours, Some(0.33));
    }

    #[test]
    fn live_hours_never_negative() {
        let record = open_record("2025-01-10T09:00:00Z", 10 * 3_600_000);
        assert_eq!(compute_live_hours(&record, at("2025-01-10T10:00:00Z")), Some(0.0));

        // clock skew: now before punch-in
        let record = open_record("2025-01-10T09:00:00Z", 0);
        assert_eq!(compute_live_hours(&record, at("2025-01-10T08:59:00Z")), Some(0.0));
    }

    #[test]
    fn live_hours_ignores_negative_pause_total() {
        let record = open_record("2025-01-10T09:00:00Z", -3_600_000);
        assert_eq!(compute_live_hours(&record, at("2025-01-10T10:00:00Z")), Some(1.0));
    }

    #[test]
    fn missing_punch_in_is_not_available() {
        let record = AttendanceRecord::blank(1, 7, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(compute_live_hours(&record, at("2025-01-10T10:00:00Z")), None);
        assert_eq!(compute_closed_hours(&record), None);
        assert_eq!(compute_hours(&record, at("2025-01-10T10:00:00Z")), None);
    }

    #[test]
    fn closed_hours_use_stored_interval() {
        let mut record = open_record("2025-01-10T09:00:00Z", 0);
        record.punch_out = Some(at("2025-01-10T13:00:00Z"));
        assert_eq!(compute_closed_hours(&record), Some(4.0));
        assert_eq!(compute_closed_hours(&record), compute_closed_hours(&record));
    }

    #[test]
    fn closed_hours_do_not_subtract_pauses() {
        let mut record = open_record("2025-01-10T09:00:00Z", 1_800_000);
        record.punch_out = Some(at("2025-01-10T13:00:00Z"));
        assert_eq!(compute_closed_hours(&record), Some(4.0));
    }

    #[test]
    fn closed_hours_clamp_reversed_interval() {
        let mut record = open_record("2025-01-10T13:00:00Z", 0);
        record.punch_out = Some(at("2025-01-10T09:00:00Z"));
        assert_eq!(compute_closed_hours(&record), Some(0.0));
    }

    #[test]
    fn closed_hours_need_punch_in() {
        let mut record = AttendanceRecord::blank(1, 7, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        record.punch_out = Some(at("2025-01-10T13:00:00Z"));
        assert_eq!(compute_closed_hours(&record), None);
    }

    #[test]
    fn paused_session_stops_accruing() {
        let mut record = open_record("2025-01-10T09:00:00Z", 0);
        record.timer_status = TimerStatus::Paused;
        record.paused_at = Some(at("2025-01-10T12:00:00Z"));

        let later = at("2025-01-10T15:00:00Z");
        assert_eq!(effective_now(&record, later), at("2025-01-10T12:00:00Z"));
        assert_eq!(compute_hours(&record, later), Some(3.0));
    }

    #[test]
    fn active_session_follows_clock() {
        let record = open_record("2025-01-10T09:00:00Z", 0);
        let now = at("2025-01-10T11:15:00Z");
        assert_eq!(effective_now(&record, now), now);
        assert_eq!(compute_hours(&record, now), Some(2.25));
    }

    #[test]
    fn accrue_pause_adds_current_span() {
        let total = accrue_pause(
            600_000,
            Some(at("2025-01-10T12:00:00Z")),
            at("2025-01-10T12:30:00Z"),
        );
        assert_eq!(total, 2_400_000);
    }

    #[test]
    fn accrue_pause_without_open_pause_keeps_total() {
        assert_eq!(accrue_pause(600_000, None, at("2025-01-10T12:30:00Z")), 600_000);
        assert_eq!(
            accrue_pause(0, Some(at("2025-01-10T13:00:00Z")), at("2025-01-10T12:30:00Z")),
            0
        );
    }

    #[test]
    fn salary_needs_both_inputs() {
        assert_eq!(compute_salary_for_period(Some(8.5), Some(12.0)), Some(102.0));
        assert_eq!(compute_salary_for_period(Some(1.0 / 3.0), Some(10.0)), Some(3.33));
        assert_eq!(compute_salary_for_period(None, Some(12.0)), None);
        assert_eq!(compute_salary_for_period(Some(8.5), None), None);
    }

    #[test]
    fn sum_hours_counts_closed_records_only() {
        let mut monday = open_record("2025-01-06T09:00:00Z", 0);
        monday.punch_out = Some(at("2025-01-06T17:00:00Z"));
        let mut tuesday = open_record("2025-01-07T09:00:00Z", 0);
        tuesday.punch_out = Some(at("2025-01-07T13:30:00Z"));
        let still_open = open_record("2025-01-08T09:00:00Z", 0);

        assert_eq!(sum_hours([&monday, &tuesday, &still_open]), Some(12.5));
        assert_eq!(sum_hours([&still_open]), None);
        assert_eq!(sum_hours(std::iter::empty::<&AttendanceRecord>()), None);
    }
}
