//! HTTP mapping for `AppError`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sb_core::AppError;
use serde_json::json;

/// Wraps `AppError` so handlers can use `?` and still answer with a JSON body.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(msg) = &self.0 {
            log::error!("Internal error: {}", msg);
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.0.user_message() }))
    }
}

pub type ApiResult = Result<HttpResponse, ApiError>;
