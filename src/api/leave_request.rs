use crate::api::employee::{fetch_employee, paid_leave_status};
use crate::api::paginate;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    #[schema(example = "sick")]
    pub leave_type: LeaveType, // enum ensures Swagger dropdown
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveFilter {
    /// Filter by employee ID; employees always see their own
    #[param(example = 123)]
    pub employee_id: Option<u64>,
    /// Filter by leave status
    #[param(example = "pending", value_type = Option<String>)]
    pub status: Option<LeaveStatus>,
    /// Pagination page number (start with 1)
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[param(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaveDecision {
    Approve,
    Reject,
}

impl LeaveDecision {
    fn outcome(self) -> LeaveStatus {
        match self {
            LeaveDecision::Approve => LeaveStatus::Approved,
            LeaveDecision::Reject => LeaveStatus::Rejected,
        }
    }
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(&'static str),
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "status": "pending"
         })
        ),
        (status = 400, description = "Bad dates, or not yet eligible for paid leave", body = Object, example = json!({
            "message": "Not eligible for paid leave",
            "eligibility": {
                "eligible": false,
                "eligibility_date": "2026-04-01",
                "months_remaining": 3,
                "reason": "maturation_pending"
            }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CreateLeave>,
) -> Result<impl Responder, ApiError> {
    let employee_id = auth.employee_id()?;

    if payload.start_date > payload.end_date {
        return Err(ApiError::BadRequest(
            "start_date cannot be after end_date".into(),
        ));
    }

    if payload.leave_type.is_paid() {
        let employee = fetch_employee(pool.get_ref(), employee_id).await?;
        let eligibility = paid_leave_status(&config, &employee);
        if !eligibility.eligible {
            tracing::info!(employee_id, reason = ?eligibility.reason, "Paid leave refused");
            return Err(ApiError::NotEligible(eligibility));
        }
    }

    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, start_date, end_date, leave_type, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.leave_type.as_str())
    .bind(LeaveStatus::Pending.as_str())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave request");
        ApiError::Internal
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "status": LeaveStatus::Pending
    })))
}

/* =========================
Approve / reject leave (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/{decision}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request"),
        ("decision" = LeaveDecision, Path, description = "approve or reject")
    ),
    responses(
        (status = 200, description = "Leave decided", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 400, description = "Leave request not found or already processed", body = Object, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn decide_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(u64, LeaveDecision)>,
) -> Result<impl Responder, ApiError> {
    auth.require_hr_or_admin()?;

    let (leave_id, decision) = path.into_inner();
    let outcome = decision.outcome();

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?
        WHERE id = ?
        AND status = ?
        "#,
    )
    .bind(outcome.as_str())
    .bind(leave_id)
    .bind(LeaveStatus::Pending.as_str())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Leave decision failed");
        ApiError::Internal
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::BadRequest(
            "Leave request not found or already processed".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Leave {outcome}")
    })))
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> Result<impl Responder, ApiError> {
    let employee_filter = match query.employee_id {
        None if auth.is_hr_or_admin() => None,
        requested => Some(auth.scope_to(requested)?),
    };

    // -------------------------
    // Pagination
    // -------------------------
    let window = paginate(query.page, query.per_page, 10)?;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = employee_filter {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.as_str()));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q
        .fetch_one(pool.get_ref())
        .await
        .map_err(ApiError::db("Failed to count leave requests"))?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, start_date, end_date, leave_type, status, created_at
        FROM leave_requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(window.per_page)
        .bind(window.offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(ApiError::db("Failed to fetch leave list"))?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: window.page,
        per_page: window.per_page,
        total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_map_to_final_status() {
        assert_eq!(LeaveDecision::Approve.outcome(), LeaveStatus::Approved);
        assert_eq!(LeaveDecision::Reject.outcome(), LeaveStatus::Rejected);
        assert_eq!(format!("Leave {}", LeaveDecision::Reject.outcome()), "Leave rejected");
    }

    #[test]
    fn decision_parses_from_path_segment() {
        let decision: LeaveDecision = serde_json::from_str("\"approve\"").unwrap();
        assert_eq!(decision, LeaveDecision::Approve);
        assert!(serde_json::from_str::<LeaveDecision>("\"cancel\"").is_err());
    }

    #[test]
    fn only_annual_leave_is_paid() {
        assert!(LeaveType::Annual.is_paid());
        assert!(!LeaveType::Sick.is_paid());
        assert!(!LeaveType::Unpaid.is_paid());
        assert_eq!(LeaveType::Unpaid.as_str(), "unpaid");
    }

    #[test]
    fn create_payload_rejects_unknown_type() {
        let ok: CreateLeave = serde_json::from_str(
            r#"{"start_date":"2026-01-01","end_date":"2026-01-02","leave_type":"annual"}"#,
        )
        .unwrap();
        assert_eq!(ok.leave_type, LeaveType::Annual);

        let bad = serde_json::from_str::<CreateLeave>(
            r#"{"start_date":"2026-01-01","end_date":"2026-01-02","leave_type":"vacation"}"#,
        );
        assert!(bad.is_err());
    }
}
