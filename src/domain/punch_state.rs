//! Per-day punch gate: which of punch-in / punch-out is allowed today.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use derive_more::Display;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceRecord, TimerStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PunchState {
    NoRecord,
    PunchedInOnly,
    PunchedInAndOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchAction {
    PunchIn,
    PunchOut,
    Pause,
    Resume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PunchError {
    #[display(fmt = "Already punched in today")]
    AlreadyPunchedIn,
    #[display(fmt = "No active punch-in found for today")]
    NotPunchedIn,
    #[display(fmt = "Already punched out today")]
    AlreadyPunchedOut,
    #[display(fmt = "Timer is not running")]
    TimerNotRunning,
    #[display(fmt = "Timer is not paused")]
    TimerNotPaused,
}

impl std::error::Error for PunchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PunchGate {
    pub can_punch_in: bool,
    pub can_punch_out: bool,
}

impl PunchState {
    /// A row with no punch-in (e.g. created by an admin override) still allows punching in.
    pub fn of(record: Option<&AttendanceRecord>) -> Self {
        match record.map(|r| (r.punch_in, r.punch_out)) {
            None | Some((None, None)) => PunchState::NoRecord,
            Some((Some(_), None)) => PunchState::PunchedInOnly,
            Some((_, Some(_))) => PunchState::PunchedInAndOut,
        }
    }

    pub fn gate(self) -> PunchGate {
        match self {
            PunchState::NoRecord => PunchGate { can_punch_in: true, can_punch_out: false },
            PunchState::PunchedInOnly => PunchGate { can_punch_in: false, can_punch_out: true },
            PunchState::PunchedInAndOut => PunchGate { can_punch_in: false, can_punch_out: false },
        }
    }

    /// Validates `action` against today's state and returns the state after it.
    ///
    /// Pause and resume stay inside `PunchedInOnly`; `timer` is the record's
    /// timer status.
    pub fn apply(self, action: PunchAction, timer: TimerStatus) -> Result<PunchState, PunchError> {
        use PunchAction::*;
        use PunchState::*;

        match (self, action) {
            (NoRecord, PunchIn) => Ok(PunchedInOnly),
            (PunchedInOnly, PunchIn) => Err(PunchError::AlreadyPunchedIn),

            (PunchedInOnly, PunchOut) => Ok(PunchedInAndOut),

            (PunchedInOnly, Pause) if timer == TimerStatus::Active => Ok(PunchedInOnly),
            (PunchedInOnly, Pause) => Err(PunchError::TimerNotRunning),

            (PunchedInOnly, Resume) if timer == TimerStatus::Paused => Ok(PunchedInOnly),
            (PunchedInOnly, Resume) => Err(PunchError::TimerNotPaused),

            (NoRecord, _) => Err(PunchError::NotPunchedIn),
            (PunchedInAndOut, _) => Err(PunchError::AlreadyPunchedOut),
        }
    }
}

/// Today's record among an employee's records.
#[derive(Debug)]
pub struct TodayRecord<'a> {
    pub record: Option<&'a AttendanceRecord>,
    /// Rows dated today; more than one is a data anomaly.
    pub matches: usize,
}

impl TodayRecord<'_> {
    pub fn is_duplicated(&self) -> bool {
        self.matches > 1
    }

    pub fn state(&self) -> PunchState {
        PunchState::of(self.record)
    }
}

/// Picks the lowest-id record dated `today`.
pub fn locate_today(records: &[AttendanceRecord], today: NaiveDate) -> TodayRecord<'_> {
    let mut matches = 0;
    let mut first: Option<&AttendanceRecord> = None;

    for record in records.iter().filter(|r| r.date == today) {
        matches += 1;
        if first.is_none_or(|f| record.id < f.id) {
            first = Some(record);
        }
    }

    TodayRecord { record: first, matches }
}

/// Calendar day of `now` in the portal's timezone.
pub fn today_in(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}
