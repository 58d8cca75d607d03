//! The acting user, read from headers set by the upstream gateway.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::models::{Actor, Role};

use super::response::{ApiError, ApiErrorResponse};

/// Header carrying the acting user's id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Header carrying the acting user's role.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_value(parts, ACTOR_ID_HEADER)?;
        let role = match header_value(parts, ACTOR_ROLE_HEADER)? {
            Some(raw) => raw.parse::<Role>().map_err(|message| {
                ApiErrorResponse::bad_request(ApiError::invalid_field(ACTOR_ROLE_HEADER, message))
            })?,
            None => Role::default(),
        };
        Ok(Actor { id, role })
    }
}

fn header_value(parts: &Parts, name: &str) -> Result<Option<String>, ApiErrorResponse> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| {
        ApiErrorResponse::bad_request(ApiError::invalid_field(name, "header is not valid ASCII"))
    })?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}
