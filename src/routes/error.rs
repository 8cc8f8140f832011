use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use eventdesk_core::CoreError;

/// Domain error on its way out as an HTTP response. Bodies are plain text.
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            CoreError::Validation(_) | CoreError::Referential { .. } => StatusCode::BAD_REQUEST,
            CoreError::Duplicate { .. } => StatusCode::CONFLICT,
            CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            CoreError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal carries no detail; the cause was logged where it happened.
        (self.status(), self.0.to_string()).into_response()
    }
}

/// Response for the validate-only endpoints: "valid", or the joined messages.
pub fn validation_report(messages: String) -> Response {
    if messages.is_empty() {
        (StatusCode::OK, "valid").into_response()
    } else {
        (StatusCode::BAD_REQUEST, messages).into_response()
    }
}
