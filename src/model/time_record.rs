use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::enums::RecordType;

/// One punch. `record_datetime` is already normalized to the company
/// timezone, so ordering it within a user defines the punch sequence.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TimeRecord {
    pub id: i64,
    pub user_id: i64,
    pub record_type: RecordType,
    #[schema(value_type = String, format = "date-time")]
    pub record_datetime: NaiveDateTime,
    pub is_manual: bool,
    pub is_time_verified: bool,
    pub biometric_id: Option<i64>,
    pub edited_by: Option<i64>,
    pub edit_justification: Option<String>,
    pub edit_reason: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub original_timestamp: Option<NaiveDateTime>,
}
