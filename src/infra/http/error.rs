use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::validate::{FieldErrors, INVALID_CREDENTIALS};

/// Structured diagnostic attached to error responses so the shared logging
/// middleware can emit rich context without parsing bodies.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub detail: String,
}

impl ErrorReport {
    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            detail: detail.into(),
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

pub mod codes {
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL: &str = "internal_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
enum ApiErrorPayload {
    /// Flat field-keyed map, e.g. `{"email": ["Enter a valid email address."]}`.
    Fields(FieldErrors),
    /// Uniform envelope for non-validation failures.
    Envelope {
        code: &'static str,
        message: &'static str,
    },
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    payload: ApiErrorPayload,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: &'static str) -> Self {
        Self {
            status,
            payload: ApiErrorPayload::Envelope { code, message },
            detail: format!("{code}: {message}"),
        }
    }

    /// 400 with the field-keyed error map as the response body.
    pub fn validation(fields: FieldErrors) -> Self {
        let detail = serde_json::to_string(&fields)
            .unwrap_or_else(|_| "unserializable field errors".to_string());
        Self {
            status: StatusCode::BAD_REQUEST,
            payload: ApiErrorPayload::Fields(fields),
            detail,
        }
    }

    /// Aggregated login failure that does not reveal which credential was
    /// wrong; serialized under `non_field_errors`.
    pub fn invalid_credentials() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            payload: ApiErrorPayload::Fields(FieldErrors::non_field(INVALID_CREDENTIALS)),
            detail: "invalid credentials".to_string(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "Authentication credentials were not provided",
        )
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        let mut error = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            "Internal server error",
        );
        error.detail = detail.into();
        error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut response = match self.payload {
            ApiErrorPayload::Fields(fields) => (status, Json(fields)).into_response(),
            ApiErrorPayload::Envelope { code, message } => {
                let body = ApiErrorBody {
                    error: ApiErrorMessage {
                        code: code.to_string(),
                        message: message.to_string(),
                    },
                };
                (status, Json(body)).into_response()
            }
        };
        ErrorReport::from_message("infra::http", status, self.detail).attach(&mut response);
        response
    }
}
