use crate::security::resource::ResourceGuardError;
use crate::security::token::TokenError;
use autoims_database::DatabaseError;
use autoims_derive::api_model;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::borrow::Cow;
use std::fmt;
use tracing::error;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// HTTP-facing category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[api_model(response)]
/// Body of every failed request.
pub struct ErrorBody {
    /// Human readable reason
    pub error: String,
}

/// The error every handler returns.
///
/// Renders `{"error": "<message>"}`. Internal failures are logged with their
/// detail and answered with a generic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.status().as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        let error = if self.kind == ErrorKind::Internal {
            error!(detail = %self.message, "Request failed");
            INTERNAL_MESSAGE.to_owned()
        } else {
            self.message.into_owned()
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::unauthorized("Token has expired"),
            TokenError::Invalid { .. } => Self::unauthorized("Token is invalid"),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<ResourceGuardError> for ApiError {
    fn from(err: ResourceGuardError) -> Self {
        match err {
            ResourceGuardError::NotFound { entity } => Self::not_found(format!("{entity} not found")),
            ResourceGuardError::UnknownEntity { .. } => Self::bad_request(err.to_string()),
            ResourceGuardError::Database { .. } => Self::internal(err.to_string()),
        }
    }
}
