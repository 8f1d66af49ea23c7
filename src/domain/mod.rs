//! Pure attendance and leave computations. No I/O, no clock reads.

pub mod leave_eligibility;
pub mod punch_state;
pub mod time_accounting;
