use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::enums::{AdjustmentStatus, AdjustmentType};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AdjustmentRequest {
    pub id: i64,
    pub user_id: i64,
    pub adjustment_type: AdjustmentType,
    #[schema(value_type = String, format = "date")]
    pub target_date: NaiveDate,
    #[schema(value_type = Option<String>, format = "time")]
    pub entry_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub exit_time: Option<NaiveTime>,
    /// Explicit hours granted by a WAIVER/CERTIFICATE; when absent the
    /// balance calculator tops up the day's shortfall instead.
    pub amount_hours: Option<f64>,
    pub reason_text: Option<String>,
    pub status: AdjustmentStatus,
    pub manager_id: Option<i64>,
    pub manager_comment: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub reviewed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustmentRequestCreate {
    pub adjustment_type: AdjustmentType,
    #[schema(value_type = String, format = "date")]
    pub target_date: NaiveDate,
    #[schema(value_type = Option<String>, format = "time", example = "08:00:00")]
    pub entry_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time", example = "17:00:00")]
    pub exit_time: Option<NaiveTime>,
    pub amount_hours: Option<f64>,
    pub reason_text: Option<String>,
}
