use crate::api::attendance::{
    AttendanceListResponse, AttendanceView, PunchResponse, TodayStatus, UpdateAttendance,
};
use crate::api::employee::EmployeeProfile;
use crate::api::leave_request::{CreateLeave, LeaveDecision, LeaveListResponse};
use crate::api::payroll::EarningsResponse;
use crate::domain::leave_eligibility::{IneligibleReason, LeaveEligibility};
use crate::domain::punch_state::{PunchGate, PunchState};
use crate::model::attendance::{AttendanceRecord, TimerStatus};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Portal API",
        version = "1.0.0",
        description = r#"
## HR Portal: attendance, leave and earnings

### Key Features
- **Attendance**
  - Punch in/out, pause and resume the work timer
  - Live hours for today, derived hours and earnings for history
  - HR/Admin overrides (holiday, half day, corrected punches)
- **Leave**
  - Apply for leave; annual (paid) leave requires the maturation period
  - Approve/reject requests, view leave history
- **Employee**
  - Profile with paid-leave eligibility, eligibility date and months remaining
- **Payroll**
  - Hourly earnings over a date range

### Security
Every endpoint requires a **JWT Bearer** access token.
Employees see their own data; **HR** and **Admin** may see anyone.
"#,
    ),
    paths(
        crate::api::attendance::punch_in,
        crate::api::attendance::punch_out,
        crate::api::attendance::pause,
        crate::api::attendance::resume,
        crate::api::attendance::today,
        crate::api::attendance::list_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::employee::get_employee,
        crate::api::employee::leave_eligibility,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::decide_leave,
        crate::api::leave_request::leave_list,

        crate::api::payroll::earnings
    ),
    components(
        schemas(
            AttendanceRecord,
            TimerStatus,
            PunchState,
            PunchGate,
            PunchResponse,
            TodayStatus,
            AttendanceView,
            AttendanceListResponse,
            UpdateAttendance,
            Employee,
            EmployeeProfile,
            LeaveEligibility,
            IneligibleReason,
            CreateLeave,
            LeaveType,
            LeaveStatus,
            LeaveDecision,
            LeaveRequest,
            LeaveListResponse,
            EarningsResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Attendance", description = "Punch and attendance history APIs"),
        (name = "Employee", description = "Employee profile APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Payroll", description = "Earnings APIs"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_attendance_paths_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/v1/attendance/punch-in"));
        assert!(doc.paths.paths.contains_key("/api/v1/employee/{employee_id}/leave-eligibility"));
        assert!(doc.paths.paths.contains_key("/api/v1/payroll/earnings"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("LeaveEligibility"));
    }
}
