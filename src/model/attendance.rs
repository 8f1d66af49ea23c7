use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// Whether an open session is accruing time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimerStatus {
    Active,
    Paused,
    #[default]
    Inactive,
}

impl TimerStatus {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

// stored as VARCHAR
impl TryFrom<String> for TimerStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "employee_id": 1000,
        "employee_name": "John Doe",
        "date": "2025-01-10",
        "punch_in": "2025-01-10T09:00:00Z",
        "punch_out": null,
        "total_paused_duration": 1800000,
        "paused_at": null,
        "timer_status": "active",
        "holiday": false,
        "half_day": false
    })
)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    pub employee_name: String,

    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub punch_in: Option<DateTime<Utc>>,

    /// Never earlier than `punch_in` once set
    #[schema(value_type = Option<String>, format = "date-time")]
    pub punch_out: Option<DateTime<Utc>>,

    /// Milliseconds spent paused in the current session
    pub total_paused_duration: i64,

    /// Start of the pause in progress, only while `timer_status` is paused
    #[schema(value_type = Option<String>, format = "date-time")]
    pub paused_at: Option<DateTime<Utc>>,

    #[sqlx(try_from = "String")]
    pub timer_status: TimerStatus,

    pub holiday: bool,
    pub half_day: bool,
}

impl AttendanceRecord {
    /// A closed record keeps its stored interval; an open one grows with the clock.
    pub fn is_closed(&self) -> bool {
        self.punch_out.is_some()
    }

    #[cfg(test)]
    pub(crate) fn blank(id: u64, employee_id: u64, date: NaiveDate) -> Self {
        Self {
            id,
            employee_id,
            employee_name: "Test Employee".to_string(),
            date,
            punch_in: None,
            punch_out: None,
            total_paused_duration: 0,
            paused_at: None,
            timer_status: TimerStatus::Inactive,
            holiday: false,
            half_day: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_status_parses_stored_strings() {
        assert_eq!(TimerStatus::try_from("paused".to_string()).unwrap(), TimerStatus::Paused);
        assert_eq!(TimerStatus::Active.as_str(), "active");
        assert_eq!(TimerStatus::Inactive.to_string(), "inactive");
        assert!(TimerStatus::try_from("running".to_string()).is_err());
    }

    #[test]
    fn timer_status_serializes_lowercase() {
        let json = serde_json::to_string(&TimerStatus::Paused).unwrap();
        assert_eq!(json, "\"paused\"");
    }
}
