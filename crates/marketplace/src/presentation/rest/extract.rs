//! Request extractors whose rejections use the API error body

use axum::extract::{FromRequest, FromRequestParts};

use super::ApiError;

/// `Json<T>` that rejects undecodable bodies with a 400 `validation_error`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `Query<T>` that rejects bad query strings with a 400 `validation_error`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
