use autoims_kernel::prelude::{DatabaseError, WorkingStatus};
use std::borrow::Cow;

#[autoims_derive::autoims_error(api)]
pub enum WorkforceError {
    #[status(bad_request)]
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    #[status(not_found)]
    #[error("Employee not found")]
    NotFound,

    #[status(conflict)]
    #[error("Phone or email already exists")]
    Duplicate,

    #[error("Employee storage error{}: {source}", format_context(.context))]
    Storage { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Employee query failed{}: {source}", format_context(.context))]
    Sqlite { source: rusqlite::Error, context: Option<Cow<'static, str>> },
}

impl WorkforceError {
    pub(crate) const fn invalid(message: &'static str) -> Self {
        Self::Validation { message: Cow::Borrowed(message) }
    }

    pub(crate) fn invalid_status() -> Self {
        Self::Validation {
            message: format!("Invalid working status. Must be one of: {}", WorkingStatus::choices()).into(),
        }
    }
}
