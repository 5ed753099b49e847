use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Existence of a row means the (month, year) period is CLOSED.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PayrollClosure {
    pub id: i64,
    pub month: u32,
    pub year: i32,
    pub is_closed: bool,
    pub closed_by_user_id: i64,
    #[schema(value_type = String, format = "date-time")]
    pub closed_at: NaiveDateTime,
}
