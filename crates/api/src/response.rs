//! JSON response envelope and error rendering.
//!
//! Every response carries `success`, a `message`, and an operation-specific
//! payload. Errors additionally carry the machine-readable `error` code.
//! Internal detail (database, email) is logged and exposed in the body only
//! outside production mode.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use riderledger_core::account::{InvalidEmploymentType, PictureError};
use riderledger_core::auth::{PasswordError, PolicyError};
use riderledger_core::billing::BillingError;
use riderledger_core::record::RecordError;
use riderledger_db::repositories::DailyRecordError;
use riderledger_shared::{AppError, JwtError};

static EXPOSE_ERROR_DETAIL: AtomicBool = AtomicBool::new(false);

/// Configures whether 5xx responses include the internal error detail.
pub fn set_expose_error_detail(expose: bool) {
    EXPOSE_ERROR_DETAIL.store(expose, Ordering::Relaxed);
}

/// Handler result type rendering failures through `ApiError`.
pub type ApiResult<T> = Result<T, ApiError>;

/// An `AppError` rendered as the JSON error envelope.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if err.is_internal() {
            error!(error = %err, "request failed");
            if EXPOSE_ERROR_DETAIL.load(Ordering::Relaxed) {
                err.to_string()
            } else {
                "Internal server error".to_string()
            }
        } else {
            err.message().to_string()
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": err.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<DailyRecordError> for ApiError {
    fn from(err: DailyRecordError) -> Self {
        match err {
            DailyRecordError::DuplicateDate => Self(AppError::Conflict(err.to_string())),
            DailyRecordError::Db(e) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InvalidDateRange | BillingError::EmptyIncludeSet(_) => {
                Self(AppError::Validation(err.to_string()))
            }
            BillingError::Store(e) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Internal(format!("token generation failed: {err}")))
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<PictureError> for ApiError {
    fn from(err: PictureError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<InvalidEmploymentType> for ApiError {
    fn from(err: InvalidEmploymentType) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}
