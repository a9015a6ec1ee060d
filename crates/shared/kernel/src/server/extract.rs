//! Request extractors that answer failures with the JSON error body.

use super::error::ApiError;
use super::state::ApiState;
use crate::security::resource::{Entity, ResourceGuard};
use crate::security::token::Claims;
use autoims_domain::constants::BEARER_SCHEME;
use axum::body::Bytes;
use axum::extract::{FromRef, FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// JSON body that must carry data.
///
/// A missing or blank body, `null`, `{}` and `[]` are all answered with
/// 400 "No data provided". Malformed JSON is a 400 naming the parser error.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        parse_payload(&bytes).map(Payload)
    }
}

/// Request body held back until the handler has found its target row.
///
/// Update routes answer 404 for a missing row before looking at the body;
/// [`Self::parse`] then applies the same rules as [`Payload`].
#[derive(Debug, Clone)]
pub struct DeferredPayload(Bytes);

impl DeferredPayload {
    /// # Errors
    ///
    /// 400 "No data provided" for an empty body, 400 for malformed JSON.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        parse_payload(&self.0)
    }
}

impl<S> FromRequest<S> for DeferredPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Bytes::from_request(req, state)
            .await
            .map(Self)
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
    }
}

fn parse_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("No data provided"));
    }
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| ApiError::bad_request(format!("Invalid JSON payload: {err}")))?;
    let empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        return Err(ApiError::bad_request("No data provided"));
    }
    serde_json::from_value(value)
        .map_err(|err| ApiError::bad_request(format!("Invalid JSON payload: {err}")))
}

/// Path segments; a value that does not parse is a 400.
#[derive(Debug, Clone, Copy)]
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
    }
}

/// Query string; a value that does not parse is a 400.
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
    }
}

/// The caller behind a valid `Authorization: Bearer <token>` header.
///
/// Besides the signature and expiry, the user must still exist; positive
/// answers are cached for `security.identity.session_cache_ttl_seconds`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for AuthUser
where
    ApiState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ApiState::from_ref(state);
        let token =
            bearer_token(&parts.headers).ok_or_else(|| ApiError::unauthorized("Token is missing"))?;
        let claims = state.tokens.verify(token)?;
        let user_id = claims.user_id().ok_or_else(|| ApiError::unauthorized("Token is invalid"))?;

        if state.sessions.get(&user_id).is_none() {
            let exists = state
                .database
                .call(move |conn| ResourceGuard::exists(conn, Entity::User, user_id))
                .await?;
            if !exists {
                debug!(user_id, "Token subject no longer exists");
                return Err(ApiError::unauthorized("User not found"));
            }
            state.sessions.insert(user_id, ());
        }

        Ok(Self { user_id, claims })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}
