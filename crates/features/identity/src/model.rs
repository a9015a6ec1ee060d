use crate::error::IdentityError;
use autoims_kernel::prelude::{api_model, trimmed};
use chrono::{DateTime, Utc};

const MIN_PASSWORD_CHARS: usize = 6;

#[api_model(request)]
/// Registration form
pub struct SignupRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[api_model(request)]
/// Credentials
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[api_model(response)]
/// A registered user; the password hash never leaves the server
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[api_model(response)]
/// Answer to a successful signup or login
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

#[api_model(response)]
pub struct MeResponse {
    pub message: &'static str,
    pub user: User,
}

/// Validated signup input, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Checks run in a fixed order: name, email, then password length.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Validation`] naming the first problem.
    pub fn validate(self) -> Result<NewUser, IdentityError> {
        let name = trimmed(self.name.as_deref()).ok_or_else(|| IdentityError::invalid("Name is required"))?;
        let email = normalize_email(self.email.as_deref())
            .ok_or_else(|| IdentityError::invalid("Email is required"))?;
        let password = self
            .password
            .filter(|p| p.chars().count() >= MIN_PASSWORD_CHARS)
            .ok_or_else(|| IdentityError::invalid("Password must be at least 6 characters"))?;

        Ok(NewUser { name, username: trimmed(self.username.as_deref()), email, password })
    }
}

impl LoginRequest {
    /// # Errors
    ///
    /// [`IdentityError::Validation`] for a missing email or password.
    pub fn validate(self) -> Result<(String, String), IdentityError> {
        let email = normalize_email(self.email.as_deref())
            .ok_or_else(|| IdentityError::invalid("Email is required"))?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| IdentityError::invalid("Password is required"))?;
        Ok((email, password))
    }
}

/// Emails are stored trimmed and lowercased.
fn normalize_email(raw: Option<&str>) -> Option<String> {
    trimmed(raw).map(|email| email.to_lowercase())
}
