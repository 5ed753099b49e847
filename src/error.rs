use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Caller-visible failure taxonomy. Everything the engine can reject is a
/// variant here; handlers return it directly and the device endpoints
/// translate it into a display-safe feedback payload instead.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "Duplicated request")]
    DuplicateRequest,

    #[display(fmt = "Biometria não cadastrada")]
    UnknownBiometric,

    #[display(fmt = "Usuário inativo")]
    InactiveUser,

    #[display(fmt = "Payroll for {}/{} is CLOSED. No modifications allowed.", month, year)]
    PeriodClosed { month: u32, year: i32 },

    #[display(fmt = "Time record not found")]
    RecordNotFound,

    #[display(fmt = "Adjustment request not found")]
    AdjustmentNotFound,

    #[display(fmt = "Not authenticated")]
    Unauthorized,

    #[display(fmt = "{}", _0)]
    Forbidden(String),

    #[display(fmt = "Invalid schedule: daily hours must be between 0 and 24")]
    InvalidSchedule,

    #[display(fmt = "Invalid date range")]
    InvalidDateRange,

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "database error")]
    Database(sqlx::Error),

    #[display(fmt = "internal error")]
    Internal(anyhow::Error),
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e)
    }
}

impl AppError {
    pub fn forbidden(msg: &str) -> Self {
        AppError::Forbidden(msg.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateRequest => StatusCode::CONFLICT,
            AppError::UnknownBiometric
            | AppError::InactiveUser
            | AppError::PeriodClosed { .. }
            | AppError::InvalidSchedule
            | AppError::InvalidDateRange
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RecordNotFound | AppError::AdjustmentNotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database failure");
                HttpResponse::InternalServerError().json(json!({"detail": "Internal Server Error"}))
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal failure");
                HttpResponse::InternalServerError().json(json!({"detail": "Internal Server Error"}))
            }
            other => {
                HttpResponse::build(other.status_code()).json(json!({"detail": other.to_string()}))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_closed_message_names_the_period() {
        let err = AppError::PeriodClosed { month: 3, year: 2024 };
        assert_eq!(
            err.to_string(),
            "Payroll for 3/2024 is CLOSED. No modifications allowed."
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), "database error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
