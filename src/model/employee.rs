use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@company.com",
        "joining_date": "2024-07-15",
        "hourly_rate": 12.5,
        "salary": 2000.0,
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    /// Missing for records imported without an HR start date
    #[schema(
        example = "2024-07-15",
        value_type = Option<String>,
        format = "date",
        nullable = true
    )]
    pub joining_date: Option<NaiveDate>,

    #[schema(example = 12.5, nullable = true)]
    pub hourly_rate: Option<f64>,

    /// Monthly salary
    #[schema(example = 2000.0, nullable = true)]
    pub salary: Option<f64>,

    #[schema(example = "active")]
    pub status: String,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
