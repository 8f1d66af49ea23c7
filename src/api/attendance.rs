use crate::api::paginate;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::domain::punch_state::{
    PunchAction, PunchError, PunchGate, PunchState, locate_today, today_in,
};
use crate::domain::time_accounting::{
    accrue_pause, compute_closed_hours, compute_hours, compute_salary_for_period,
};
use crate::error::{ApiError, is_duplicate_key};
use crate::model::attendance::{AttendanceRecord, TimerStatus};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlPool};
use utoipa::{IntoParams, ToSchema};

/// Columns for `query_as::<_, AttendanceRecord>`; `a` is attendance, `e` employees.
pub(crate) const RECORD_COLUMNS: &str = r#"
    a.id, a.employee_id,
    CONCAT(e.first_name, ' ', e.last_name) AS employee_name,
    a.date, a.punch_in, a.punch_out, a.total_paused_duration, a.paused_at,
    a.timer_status, a.holiday, a.half_day
"#;

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "message": "Punched in successfully",
    "can_punch_in": false,
    "can_punch_out": true,
    "hours_worked": null
}))]
pub struct PunchResponse {
    pub message: String,
    #[serde(flatten)]
    pub gate: PunchGate,
    /// Set on punch-out
    pub hours_worked: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct TodayStatus {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub state: PunchState,
    #[serde(flatten)]
    pub gate: PunchGate,
    pub timer_status: TimerStatus,
    /// Live hours for an open session, stored hours once closed
    pub hours_worked: Option<f64>,
    pub record: Option<AttendanceRecord>,
}

#[derive(Deserialize, IntoParams)]
pub struct AttendanceQuery {
    /// Defaults to the caller; HR/Admin may query anyone
    #[param(example = 1000)]
    pub employee_id: Option<u64>,
    /// First day of the range, inclusive
    #[param(example = "2025-01-01", value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Last day of the range, inclusive
    #[param(example = "2025-01-31", value_type = Option<String>)]
    pub to: Option<NaiveDate>,
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 31)]
    pub per_page: Option<u64>,
}

#[derive(FromRow)]
struct AttendanceWithRate {
    #[sqlx(flatten)]
    record: AttendanceRecord,
    hourly_rate: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceView {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub hours_worked: Option<f64>,
    pub earnings: Option<f64>,
}

impl AttendanceView {
    fn new(record: AttendanceRecord, hourly_rate: Option<f64>, now: DateTime<Utc>) -> Self {
        let hours_worked = compute_hours(&record, now);
        Self {
            earnings: compute_salary_for_period(hours_worked, hourly_rate),
            hours_worked,
            record,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceView>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 31)]
    pub per_page: u32,
    #[schema(example = 20)]
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateAttendance {
    pub holiday: Option<bool>,
    pub half_day: Option<bool>,
    #[schema(example = "2025-01-10T09:00:00Z", format = "date-time", value_type = Option<String>)]
    pub punch_in: Option<DateTime<Utc>>,
    #[schema(example = "2025-01-10T17:00:00Z", format = "date-time", value_type = Option<String>)]
    pub punch_out: Option<DateTime<Utc>>,
}

impl UpdateAttendance {
    /// Applies the override; a punch-out closes the session, a bare punch-in opens one.
    fn apply_to(&self, record: &mut AttendanceRecord) -> Result<(), ApiError> {
        if let Some(holiday) = self.holiday {
            record.holiday = holiday;
        }
        if let Some(half_day) = self.half_day {
            record.half_day = half_day;
        }
        if let Some(punch_in) = self.punch_in {
            record.punch_in = Some(punch_in);
        }
        if let Some(punch_out) = self.punch_out {
            record.punch_out = Some(punch_out);
        }

        match (record.punch_in, record.punch_out) {
            (None, Some(_)) => {
                return Err(ApiError::BadRequest("punch_out requires punch_in".into()));
            }
            (Some(punch_in), Some(punch_out)) if punch_out < punch_in => {
                return Err(ApiError::BadRequest(
                    "punch_out cannot be before punch_in".into(),
                ));
            }
            _ => {}
        }

        if record.is_closed() {
            record.timer_status = TimerStatus::Inactive;
            record.paused_at = None;
        } else if record.punch_in.is_some() && record.timer_status == TimerStatus::Inactive {
            // an open session always has a running or paused timer
            record.timer_status = TimerStatus::Active;
        }

        Ok(())
    }
}

fn portal_clock(config: &Config) -> (DateTime<Utc>, NaiveDate) {
    let now = Utc::now();
    (now, today_in(now, config.portal_utc_offset))
}

async fn todays_record(
    pool: &MySqlPool,
    employee_id: u64,
    today: NaiveDate,
) -> Result<Option<AttendanceRecord>, ApiError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM attendance a JOIN employees e ON e.id = a.employee_id \
         WHERE a.employee_id = ? AND a.date = ? ORDER BY a.id"
    );

    let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(today)
        .fetch_all(pool)
        .await
        .map_err(ApiError::db("Failed to fetch today's attendance"))?;

    let located = locate_today(&records, today);
    if located.is_duplicated() {
        tracing::warn!(
            employee_id,
            %today,
            matches = located.matches,
            chosen_id = ?located.record.map(|r| r.id),
            "Duplicate attendance records for today"
        );
    }

    Ok(located.record.cloned())
}

async fn fetch_record(pool: &MySqlPool, id: u64) -> Result<AttendanceRecord, ApiError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM attendance a JOIN employees e ON e.id = a.employee_id \
         WHERE a.id = ?"
    );

    sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to fetch attendance record"))?
        .ok_or(ApiError::NotFound("Attendance record not found"))
}

fn timer_of(record: Option<&AttendanceRecord>) -> TimerStatus {
    record.map(|r| r.timer_status).unwrap_or_default()
}

/// Punch-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/punch-in",
    responses(
        (status = 200, description = "Punched in successfully", body = PunchResponse),
        (status = 400, description = "Already punched in today", body = Object, example = json!({
            "message": "Already punched in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Concurrent punch-in"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn punch_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, ApiError> {
    let employee_id = auth.employee_id()?;
    let (now, today) = portal_clock(&config);

    let current = todays_record(pool.get_ref(), employee_id, today).await?;
    let next = PunchState::of(current.as_ref()).apply(PunchAction::PunchIn, timer_of(current.as_ref()))?;

    let result = match &current {
        // row created ahead of time by an admin override
        Some(record) => {
            sqlx::query(
                r#"
                UPDATE attendance
                SET punch_in = ?, timer_status = ?, total_paused_duration = 0, paused_at = NULL
                WHERE id = ? AND punch_in IS NULL
                "#,
            )
            .bind(now)
            .bind(TimerStatus::Active.as_str())
            .bind(record.id)
            .execute(pool.get_ref())
            .await
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO attendance (employee_id, date, punch_in, timer_status, total_paused_duration)
                VALUES (?, ?, ?, ?, 0)
                "#,
            )
            .bind(employee_id)
            .bind(today)
            .bind(now)
            .bind(TimerStatus::Active.as_str())
            .execute(pool.get_ref())
            .await
        }
    };

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            Err(ApiError::Conflict("Attendance changed concurrently, retry".into()))
        }
        Ok(_) => {
            tracing::info!(employee_id, %today, "Punched in");
            Ok(HttpResponse::Ok().json(PunchResponse {
                message: "Punched in successfully".to_string(),
                gate: next.gate(),
                hours_worked: None,
            }))
        }
        // unique (employee_id, date) lost a race
        Err(e) if is_duplicate_key(&e) => Err(ApiError::Conflict("Already punched in today".into())),
        Err(e) => {
            tracing::error!(error = %e, employee_id, "Punch-in failed");
            Err(ApiError::Internal)
        }
    }
}

/// Punch-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/punch-out",
    responses(
        (status = 200, description = "Punched out successfully", body = PunchResponse),
        (status = 400, description = "No active punch-in found for today", body = Object, example = json!({
            "message": "No active punch-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn punch_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, ApiError> {
    let employee_id = auth.employee_id()?;
    let (now, today) = portal_clock(&config);

    let current = todays_record(pool.get_ref(), employee_id, today).await?;
    let next = PunchState::of(current.as_ref()).apply(PunchAction::PunchOut, timer_of(current.as_ref()))?;
    let Some(mut record) = current else {
        return Err(PunchError::NotPunchedIn.into());
    };

    // a pause still running at punch-out ends with it
    let open_pause = (record.timer_status == TimerStatus::Paused).then_some(record.paused_at).flatten();
    record.total_paused_duration = accrue_pause(record.total_paused_duration, open_pause, now);
    record.punch_out = Some(now);
    record.paused_at = None;
    record.timer_status = TimerStatus::Inactive;

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET punch_out = ?, total_paused_duration = ?, paused_at = NULL, timer_status = ?
        WHERE id = ? AND punch_out IS NULL
        "#,
    )
    .bind(now)
    .bind(record.total_paused_duration)
    .bind(TimerStatus::Inactive.as_str())
    .bind(record.id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Punch-out failed");
        ApiError::Internal
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::Conflict("Already punched out today".into()));
    }

    let hours_worked = compute_closed_hours(&record);
    tracing::info!(employee_id, %today, ?hours_worked, "Punched out");

    Ok(HttpResponse::Ok().json(PunchResponse {
        message: "Punched out successfully".to_string(),
        gate: next.gate(),
        hours_worked,
    }))
}

/// Pause endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/pause",
    responses(
        (status = 200, description = "Timer paused", body = TodayStatus),
        (status = 400, description = "Timer is not running"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn pause(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, ApiError> {
    toggle_timer(auth, pool.get_ref(), &config, PunchAction::Pause).await
}

/// Resume endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/resume",
    responses(
        (status = 200, description = "Timer resumed", body = TodayStatus),
        (status = 400, description = "Timer is not paused"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn resume(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, ApiError> {
    toggle_timer(auth, pool.get_ref(), &config, PunchAction::Resume).await
}

async fn toggle_timer(
    auth: AuthUser,
    pool: &MySqlPool,
    config: &Config,
    action: PunchAction,
) -> Result<HttpResponse, ApiError> {
    let employee_id = auth.employee_id()?;
    let (now, today) = portal_clock(config);

    let current = todays_record(pool, employee_id, today).await?;
    let state = PunchState::of(current.as_ref()).apply(action, timer_of(current.as_ref()))?;
    let Some(mut record) = current else {
        return Err(PunchError::NotPunchedIn.into());
    };

    let expected = record.timer_status;
    if action == PunchAction::Pause {
        record.timer_status = TimerStatus::Paused;
        record.paused_at = Some(now);
    } else {
        record.total_paused_duration = accrue_pause(record.total_paused_duration, record.paused_at, now);
        record.timer_status = TimerStatus::Active;
        record.paused_at = None;
    }

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET timer_status = ?, paused_at = ?, total_paused_duration = ?
        WHERE id = ? AND timer_status = ? AND punch_out IS NULL
        "#,
    )
    .bind(record.timer_status.as_str())
    .bind(record.paused_at)
    .bind(record.total_paused_duration)
    .bind(record.id)
    .bind(expected.as_str())
    .execute(pool)
    .await
    .map_err(ApiError::db("Failed to toggle attendance timer"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::Conflict("Attendance changed concurrently, retry".into()));
    }

    tracing::info!(employee_id, timer_status = %record.timer_status, "Timer toggled");

    Ok(HttpResponse::Ok().json(TodayStatus {
        date: today,
        state,
        gate: state.gate(),
        timer_status: record.timer_status,
        hours_worked: compute_hours(&record, now),
        record: Some(record),
    }))
}

/// Today's punch status for the calling employee
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Today's punch state and live hours", body = TodayStatus),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, ApiError> {
    let employee_id = auth.employee_id()?;
    let (now, today) = portal_clock(&config);

    let record = todays_record(pool.get_ref(), employee_id, today).await?;
    let state = PunchState::of(record.as_ref());

    Ok(HttpResponse::Ok().json(TodayStatus {
        date: today,
        state,
        gate: state.gate(),
        timer_status: timer_of(record.as_ref()),
        hours_worked: record.as_ref().and_then(|r| compute_hours(r, now)),
        record,
    }))
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
}

/// Attendance history with derived hours
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse),
        (status = 400, description = "from is after to"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> Result<impl Responder, ApiError> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(ApiError::BadRequest("from cannot be after to".into()));
        }
    }

    // HR/Admin without a filter list everyone
    let employee_filter = match query.employee_id {
        None if auth.is_hr_or_admin() => None,
        requested => Some(auth.scope_to(requested)?),
    };

    let window = paginate(query.page, query.per_page, 31)?;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = employee_filter {
        where_sql.push_str(" AND a.employee_id = ?");
        args.push(FilterValue::U64(employee_id));
    }
    if let Some(from) = query.from {
        where_sql.push_str(" AND a.date >= ?");
        args.push(FilterValue::Date(from));
    }
    if let Some(to) = query.to {
        where_sql.push_str(" AND a.date <= ?");
        args.push(FilterValue::Date(to));
    }

    let count_sql = format!(
        "SELECT COUNT(*) FROM attendance a JOIN employees e ON e.id = a.employee_id{where_sql}"
    );
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }
    let total = count_q
        .fetch_one(pool.get_ref())
        .await
        .map_err(ApiError::db("Failed to count attendance"))?;

    let data_sql = format!(
        r#"
        SELECT {RECORD_COLUMNS}, e.hourly_rate
        FROM attendance a JOIN employees e ON e.id = a.employee_id
        {where_sql}
        ORDER BY a.date DESC, a.id
        LIMIT ? OFFSET ?
        "#
    );
    let mut data_q = sqlx::query_as::<_, AttendanceWithRate>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }
    let rows = data_q
        .bind(window.per_page)
        .bind(window.offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(ApiError::db("Failed to fetch attendance list"))?;

    let now = Utc::now();
    let data = rows
        .into_iter()
        .map(|row| AttendanceView::new(row.record, row.hourly_rate, now))
        .collect();

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        page: window.page,
        per_page: window.per_page,
        total,
    }))
}

/// Administrative override of an attendance record
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{attendance_id}",
    request_body = UpdateAttendance,
    params(
        ("attendance_id" = u64, Path, description = "ID of the attendance record")
    ),
    responses(
        (status = 200, description = "Attendance updated", body = AttendanceView),
        (status = 400, description = "punch_out before punch_in"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Attendance record not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateAttendance>,
) -> Result<impl Responder, ApiError> {
    auth.require_hr_or_admin()?;

    let attendance_id = path.into_inner();
    let mut record = fetch_record(pool.get_ref(), attendance_id).await?;
    body.apply_to(&mut record)?;

    sqlx::query(
        r#"
        UPDATE attendance
        SET punch_in = ?, punch_out = ?, paused_at = ?, timer_status = ?, holiday = ?, half_day = ?
        WHERE id = ?
        "#,
    )
    .bind(record.punch_in)
    .bind(record.punch_out)
    .bind(record.paused_at)
    .bind(record.timer_status.as_str())
    .bind(record.holiday)
    .bind(record.half_day)
    .bind(attendance_id)
    .execute(pool.get_ref())
    .await
    .map_err(ApiError::db("Failed to update attendance"))?;

    tracing::info!(
        attendance_id,
        by = auth.user_id,
        username = %auth.username,
        "Attendance overridden"
    );

    Ok(HttpResponse::Ok().json(AttendanceView::new(record, None, Utc::now())))
}

/// Delete an attendance record (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{attendance_id}",
    params(
        ("attendance_id" = u64, Path, description = "ID of the attendance record")
    ),
    responses(
        (status = 200, description = "Attendance deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Attendance record not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let attendance_id = path.into_inner();
    let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(attendance_id)
        .execute(pool.get_ref())
        .await
        .map_err(ApiError::db("Failed to delete attendance"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Attendance record not found"));
    }

    tracing::info!(
        attendance_id,
        by = auth.user_id,
        username = %auth.username,
        "Attendance deleted"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Attendance deleted"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn open_record() -> AttendanceRecord {
        let mut record = AttendanceRecord::blank(1, 7, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        record.punch_in = Some(at("2025-01-10T09:00:00Z"));
        record.timer_status = TimerStatus::Paused;
        record.paused_at = Some(at("2025-01-10T12:00:00Z"));
        record
    }

    fn override_with(punch_in: Option<&str>, punch_out: Option<&str>) -> UpdateAttendance {
        UpdateAttendance {
            holiday: None,
            half_day: Some(true),
            punch_in: punch_in.map(at),
            punch_out: punch_out.map(at),
        }
    }

    #[test]
    fn override_closing_session_resets_timer() {
        let mut record = open_record();
        override_with(None, Some("2025-01-10T13:00:00Z")).apply_to(&mut record).unwrap();

        assert!(record.half_day);
        assert!(!record.holiday);
        assert_eq!(record.timer_status, TimerStatus::Inactive);
        assert_eq!(record.paused_at, None);
        assert_eq!(compute_closed_hours(&record), Some(4.0));
    }

    #[test]
    fn override_rejects_reversed_interval() {
        let mut record = open_record();
        let err = override_with(None, Some("2025-01-10T08:00:00Z"))
            .apply_to(&mut record)
            .unwrap_err();
        assert_eq!(err.to_string(), "punch_out cannot be before punch_in");
    }

    #[test]
    fn override_rejects_punch_out_alone() {
        let mut record = AttendanceRecord::blank(2, 7, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        let err = override_with(None, Some("2025-01-10T17:00:00Z"))
            .apply_to(&mut record)
            .unwrap_err();
        assert_eq!(err.to_string(), "punch_out requires punch_in");
    }

    #[test]
    fn override_keeps_open_session_running() {
        let mut record = open_record();
        override_with(Some("2025-01-10T08:30:00Z"), None).apply_to(&mut record).unwrap();

        assert_eq!(record.timer_status, TimerStatus::Paused);
        assert_eq!(record.punch_in, Some(at("2025-01-10T08:30:00Z")));
    }

    #[test]
    fn override_punch_in_on_blank_row_starts_timer() {
        let mut record = AttendanceRecord::blank(4, 7, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        override_with(Some("2025-01-10T09:00:00Z"), None).apply_to(&mut record).unwrap();

        assert_eq!(record.timer_status, TimerStatus::Active);
        assert_eq!(PunchState::of(Some(&record)), PunchState::PunchedInOnly);
        assert_eq!(
            PunchState::PunchedInOnly.apply(PunchAction::Pause, record.timer_status),
            Ok(PunchState::PunchedInOnly)
        );
        assert_eq!(compute_hours(&record, at("2025-01-10T12:00:00Z")), Some(3.0));
    }

    #[test]
    fn view_derives_hours_and_earnings() {
        let mut record = open_record();
        record.timer_status = TimerStatus::Active;
        record.paused_at = None;
        record.total_paused_duration = 1_800_000;

        let view = AttendanceView::new(record, Some(20.0), at("2025-01-10T17:30:00Z"));
        assert_eq!(view.hours_worked, Some(8.0));
        assert_eq!(view.earnings, Some(160.0));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["hours_worked"], 8.0);
        assert_eq!(json["employee_id"], 7);
        assert_eq!(json["timer_status"], "active");
    }

    #[test]
    fn view_without_punch_is_not_available() {
        let record = AttendanceRecord::blank(3, 7, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        let view = AttendanceView::new(record, Some(20.0), at("2025-01-10T17:30:00Z"));

        assert_eq!(view.hours_worked, None);
        assert_eq!(view.earnings, None);
    }
}
