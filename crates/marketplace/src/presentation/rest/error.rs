use crate::presentation::rest::dto::ErrorResponse;
use ashmart_ports::MarketError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            code: "validation_error",
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError {
            code: "unauthenticated",
            message: message.into(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn invalid_parameter(param: &str, reason: &str) -> Self {
        Self::bad_request(format!("Illegal parameter '{}': {}", param, reason))
    }
}

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        let (code, status) = match &err {
            MarketError::Validation(_) => ("validation_error", StatusCode::BAD_REQUEST),
            MarketError::NotFound { .. } => ("not_found", StatusCode::NOT_FOUND),
            MarketError::InsufficientQuantity { .. } => {
                ("insufficient_quantity", StatusCode::CONFLICT)
            }
            MarketError::InvalidTransition { .. } => ("invalid_transition", StatusCode::CONFLICT),
            MarketError::Authorization(_) => ("forbidden", StatusCode::FORBIDDEN),
            MarketError::Timeout { .. } => ("timeout", StatusCode::GATEWAY_TIMEOUT),
        };
        ApiError {
            code,
            message: err.to_string(),
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.code, self.message));
        (self.status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Malformed request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("Malformed query string: {}", rejection.body_text()))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
