use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::domain::leave_eligibility::LeaveEligibility;
use crate::domain::punch_state::today_in;
use crate::error::ApiError;
use crate::model::employee::Employee;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct EmployeeProfile {
    #[serde(flatten)]
    pub employee: Employee,
    pub paid_leave: LeaveEligibility,
}

pub(crate) async fn fetch_employee(pool: &MySqlPool, employee_id: u64) -> Result<Employee, ApiError> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, first_name, last_name, email,
               joining_date, hourly_rate, salary, status
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch employee");
        ApiError::Internal
    })?
    .ok_or(ApiError::NotFound("Employee not found"))
}

/// Paid-leave status of `employee` as of today in the portal calendar.
pub(crate) fn paid_leave_status(config: &Config, employee: &Employee) -> LeaveEligibility {
    let today = today_in(Utc::now(), config.portal_utc_offset);
    let eligibility = config.maturation_policy().assess(employee.joining_date, today);

    if employee.joining_date.is_none() {
        tracing::warn!(employee_id = employee.id, "Employee has no joining date");
    }

    eligibility
}

/// Employee profile with paid-leave status
#[utoipa::path(
    get,
    path = "/api/v1/employee/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee profile", body = EmployeeProfile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    auth.ensure_can_view(employee_id)?;

    let employee = fetch_employee(pool.get_ref(), employee_id).await?;
    let paid_leave = paid_leave_status(&config, &employee);

    Ok(HttpResponse::Ok().json(EmployeeProfile { employee, paid_leave }))
}

/// Paid-leave eligibility only
#[utoipa::path(
    get,
    path = "/api/v1/employee/{employee_id}/leave-eligibility",
    params(
        ("employee_id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Paid-leave eligibility", body = LeaveEligibility),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn leave_eligibility(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    auth.ensure_can_view(employee_id)?;

    let employee = fetch_employee(pool.get_ref(), employee_id).await?;

    Ok(HttpResponse::Ok().json(paid_leave_status(&config, &employee)))
}
