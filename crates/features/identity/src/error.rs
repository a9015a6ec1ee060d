use autoims_kernel::prelude::DatabaseError;
use std::borrow::Cow;

#[autoims_derive::autoims_error(api)]
pub enum IdentityError {
    #[status(bad_request)]
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    #[status(conflict)]
    #[error("Email already registered")]
    EmailTaken,

    #[status(conflict)]
    #[error("Username already taken")]
    UsernameTaken,

    #[status(unauthorized)]
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[status(unauthorized)]
    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing failed: {message}")]
    Password { message: Cow<'static, str> },

    #[error("Identity storage error{}: {source}", format_context(.context))]
    Storage { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Identity query failed{}: {source}", format_context(.context))]
    Sqlite { source: rusqlite::Error, context: Option<Cow<'static, str>> },

    #[error("Identity token error{}: {source}", format_context(.context))]
    Token {
        source: autoims_kernel::security::token::TokenError,
        context: Option<Cow<'static, str>>,
    },
}

impl IdentityError {
    pub(crate) fn invalid(message: &'static str) -> Self {
        Self::Validation { message: Cow::Borrowed(message) }
    }
}
