use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Holiday {
    pub id: i64,
    #[schema(value_type = String, format = "date")]
    pub holiday_date: NaiveDate,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HolidayCreate {
    #[schema(value_type = String, format = "date", example = "2026-09-07")]
    pub holiday_date: NaiveDate,
    #[schema(example = "Independência")]
    pub name: String,
}
