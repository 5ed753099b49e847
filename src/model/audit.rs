use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::enums::RecordType;

/// Append-only action log written by administrative mutations.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AuditLog {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
    pub target_user_id: Option<i64>,
    pub justification: Option<String>,
    pub reason: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

/// Audit row appended whenever a record's ENTRY/EXIT type is toggled.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ManualAdjustment {
    pub id: i64,
    pub time_record_id: i64,
    pub previous_type: RecordType,
    pub new_type: RecordType,
    pub adjusted_by_user_id: i64,
    #[schema(value_type = String, format = "date-time")]
    pub adjusted_at: NaiveDateTime,
}
