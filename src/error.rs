use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Failures raised by the scheduling engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Unknown payment frequency '{0}'.")]
    UnknownFrequency(String),
    #[error("Invalid date '{0}'. Expected YYYY-MM-DD or an RFC 3339 timestamp.")]
    InvalidDate(String),
    #[error("Invalid payment day {0}. Expected a day between 1 and 31.")]
    InvalidPaymentDay(u32),
    #[error("Date arithmetic overflowed the supported calendar range.")]
    DateOutOfRange,
    #[error("A schedule needs an end_date or a number of periods.")]
    EmptyWindow,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    UnprocessableEntity(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(error: ScheduleError) -> Self {
        match error {
            ScheduleError::DateOutOfRange => Self::UnprocessableEntity(error.to_string()),
            _ => Self::BadRequest(error.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
