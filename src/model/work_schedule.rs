use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Expected daily hours for one weekday (0 = Monday .. 6 = Sunday).
/// At most one row per (user_id, day_of_week); the set is replaced wholesale.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct WorkSchedule {
    pub id: i64,
    pub user_id: i64,
    pub day_of_week: u8,
    pub daily_hours: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WorkScheduleEntry {
    #[schema(example = 0)]
    pub day_of_week: u8,
    #[schema(example = 8.0)]
    pub daily_hours: f64,
}
