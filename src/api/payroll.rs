use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::attendance::RECORD_COLUMNS;
use crate::api::employee::fetch_employee;
use crate::auth::auth::AuthUser;
use crate::domain::time_accounting::{compute_salary_for_period, sum_hours};
use crate::error::ApiError;
use crate::model::attendance::AttendanceRecord;

#[derive(Deserialize, IntoParams)]
pub struct EarningsQuery {
    /// Defaults to the caller
    #[param(example = 1001)]
    pub employee_id: Option<u64>,

    #[param(example = "2025-01-01", value_type = String)]
    pub from: NaiveDate,

    #[param(example = "2025-01-31", value_type = String)]
    pub to: NaiveDate,
}

#[derive(Serialize, ToSchema)]
pub struct EarningsResponse {
    pub employee_id: u64,
    pub employee_name: String,

    #[schema(value_type = String, format = "date")]
    pub from: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub to: NaiveDate,

    /// Closed days in the period
    pub days_worked: usize,
    pub hours_worked: Option<f64>,
    pub hourly_rate: Option<f64>,
    /// hours x rate; null when either is unknown
    pub amount: Option<f64>,
}

/// Hourly earnings over a date range, from closed attendance records
#[utoipa::path(
    get,
    path = "/api/v1/payroll/earnings",
    params(EarningsQuery),
    responses(
        (status = 200, description = "Earnings for the period", body = EarningsResponse),
        (status = 400, description = "from is after to"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn earnings(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EarningsQuery>,
) -> Result<impl Responder, ApiError> {
    if query.from > query.to {
        return Err(ApiError::BadRequest("from cannot be after to".into()));
    }

    let employee_id = auth.scope_to(query.employee_id)?;
    let employee = fetch_employee(pool.get_ref(), employee_id).await?;

    let sql = format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM attendance a JOIN employees e ON e.id = a.employee_id
        WHERE a.employee_id = ? AND a.date BETWEEN ? AND ? AND a.punch_out IS NOT NULL
        ORDER BY a.date
        "#
    );
    let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(pool.get_ref())
        .await
        .map_err(ApiError::db("Failed to fetch attendance for earnings"))?;

    let hours_worked = sum_hours(&records);

    Ok(HttpResponse::Ok().json(EarningsResponse {
        employee_id,
        employee_name: employee.full_name(),
        from: query.from,
        to: query.to,
        days_worked: records.iter().filter(|r| r.is_closed()).count(),
        hours_worked,
        hourly_rate: employee.hourly_rate,
        amount: compute_salary_for_period(hours_worked, employee.hourly_rate),
    }))
}
