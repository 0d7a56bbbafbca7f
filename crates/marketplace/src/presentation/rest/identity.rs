//! Caller identity forwarded by the authentication layer

use ashmart_core::{Actor, Role, UserId};
use axum::http::HeaderMap;

use super::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Resolve the `(user, role)` pair from request headers.
///
/// Credentials are checked upstream; a request that reaches the engine
/// without both headers is rejected.
pub fn extract_actor(headers: &HeaderMap) -> Result<Actor, ApiError> {
    let user_id = header(headers, USER_ID_HEADER)?;
    let role = header(headers, USER_ROLE_HEADER)?;

    let user_id = UserId::new(user_id).map_err(ApiError::unauthenticated)?;
    let role = Role::try_from(role).map_err(ApiError::unauthenticated)?;
    Ok(Actor::new(user_id, role))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ApiError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthenticated(format!("Missing or unreadable {} header", name)))
}
