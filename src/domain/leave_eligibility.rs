//! Paid-leave maturity from an employee's joining date.
//!
//! Month counts are calendar-month deltas; the day of month is ignored.

use chrono::{Datelike, Months, NaiveDate};
use derive_more::Display;
use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_MATURATION_MONTHS: u32 = 6;

/// Whole calendar months from `joining` to `now`. Negative for future joining dates.
pub fn months_between(joining: NaiveDate, now: NaiveDate) -> i32 {
    (now.year() - joining.year()) * 12 + (now.month() as i32 - joining.month() as i32)
}

pub fn is_eligible(joining: NaiveDate, now: NaiveDate, maturation_months: u32) -> bool {
    i64::from(months_between(joining, now)) >= i64::from(maturation_months)
}

/// `joining` plus the maturation period, clamped to the last day of the target month.
pub fn eligibility_date(joining: NaiveDate, maturation_months: u32) -> Option<NaiveDate> {
    joining.checked_add_months(Months::new(maturation_months))
}

pub fn months_remaining(joining: NaiveDate, now: NaiveDate, maturation_months: u32) -> u32 {
    let remaining = i64::from(maturation_months) - i64::from(months_between(joining, now));
    u32::try_from(remaining.max(0)).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReason {
    #[display(fmt = "joining date unavailable")]
    JoiningDateUnavailable,
    #[display(fmt = "maturation period not yet completed")]
    MaturationPending,
}

/// Paid-leave status as shown on the profile and dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({
    "eligible": false,
    "eligibility_date": "2025-04-01",
    "months_remaining": 3,
    "reason": "maturation_pending"
}))]
pub struct LeaveEligibility {
    pub eligible: bool,
    #[schema(value_type = Option<String>, format = "date")]
    pub eligibility_date: Option<NaiveDate>,
    pub months_remaining: Option<u32>,
    pub reason: Option<IneligibleReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaturationPolicy {
    months: u32,
}

impl Default for MaturationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MATURATION_MONTHS)
    }
}

impl MaturationPolicy {
    pub fn new(months: u32) -> Self {
        Self { months }
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    /// Never reports eligible without a joining date.
    pub fn assess(&self, joining: Option<NaiveDate>, today: NaiveDate) -> LeaveEligibility {
        let Some(joining) = joining else {
            return LeaveEligibility {
                eligible: false,
                eligibility_date: None,
                months_remaining: None,
                reason: Some(IneligibleReason::JoiningDateUnavailable),
            };
        };

        let eligible = is_eligible(joining, today, self.months);

        LeaveEligibility {
            eligible,
            eligibility_date: eligibility_date(joining, self.months),
            months_remaining: Some(months_remaining(joining, today, self.months)),
            reason: (!eligible).then_some(IneligibleReason::MaturationPending),
        }
    }
}
