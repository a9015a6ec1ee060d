use autoims_kernel::prelude::DatabaseError;
use std::borrow::Cow;

#[autoims_derive::autoims_error(api)]
pub enum DashboardError {
    #[status(not_found)]
    #[error("User not found")]
    UserNotFound,

    #[error("Dashboard storage error{}: {source}", format_context(.context))]
    Storage { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Failed to load dashboard{}: {source}", format_context(.context))]
    Sqlite { source: rusqlite::Error, context: Option<Cow<'static, str>> },
}
