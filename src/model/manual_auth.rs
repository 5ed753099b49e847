use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Manager-granted window during which a user may punch from the web UI.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ManualPunchAuthorization {
    pub id: i64,
    pub user_id: i64,
    pub authorized_by: i64,
    #[schema(value_type = String, format = "date-time")]
    pub valid_from: NaiveDateTime,
    #[schema(value_type = String, format = "date-time")]
    pub valid_until: NaiveDateTime,
    pub reason: String,
}
