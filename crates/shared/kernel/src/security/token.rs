//! HS256 session tokens.

use crate::safe_nanoid;
use autoims_domain::config::JwtConfig;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

#[autoims_derive::autoims_error]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid{}: {source}", format_context(.context))]
    Invalid { source: jsonwebtoken::errors::Error, context: Option<Cow<'static, str>> },

    #[error("Token configuration error{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Registered claims carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    /// Numeric user id; `None` when the subject is not a number.
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

struct TokenServiceInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_seconds: i64,
}

/// Issues and verifies session tokens. Cheap to clone.
#[derive(Clone)]
pub struct TokenService {
    inner: Arc<TokenServiceInner>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.inner.issuer)
            .field("ttl_seconds", &self.inner.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// # Errors
    ///
    /// [`TokenError::Configuration`] when the secret is empty or the ttl does not fit.
    pub fn from_config(config: &JwtConfig) -> Result<Self, TokenError> {
        if config.secret.trim().is_empty() {
            return Err(TokenError::Configuration {
                message: "JWT secret must not be empty".into(),
                context: None,
            });
        }
        let ttl_seconds = i64::try_from(config.ttl_seconds).map_err(|_| TokenError::Configuration {
            message: format!("ttl_seconds out of range: {}", config.ttl_seconds).into(),
            context: None,
        })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.clock_skew_seconds;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let secret = config.secret.as_bytes();
        Ok(Self {
            inner: Arc::new(TokenServiceInner {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                validation,
                issuer: config.issuer.clone(),
                ttl_seconds,
            }),
        })
    }

    /// Signs a token for `user_id`, valid for the configured ttl.
    ///
    /// # Errors
    ///
    /// [`TokenError::Invalid`] if signing fails.
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: i64, now: i64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.inner.issuer.clone(),
            iat: now,
            exp: now + self.inner.ttl_seconds,
            jti: safe_nanoid!(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.inner.encoding)
            .context("Signing token")
    }

    /// Checks signature, issuer and expiry.
    ///
    /// # Errors
    ///
    /// [`TokenError::Expired`] past `exp` (plus leeway), [`TokenError::Invalid`] otherwise.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.inner.decoding, &self.inner.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid { source: err, context: None },
            })
    }
}
