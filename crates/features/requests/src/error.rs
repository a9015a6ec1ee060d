use autoims_kernel::prelude::DatabaseError;
use std::borrow::Cow;

#[autoims_derive::autoims_error(api)]
pub enum RequestsError {
    #[status(bad_request)]
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    #[status(not_found)]
    #[error("Service request not found")]
    NotFound,

    #[status(not_found)]
    #[error("Vehicle not found")]
    VehicleNotFound,

    #[status(conflict)]
    #[error("Phone, email, or plate number already exists")]
    Duplicate,

    #[status(conflict)]
    #[error("Cannot delete service request with associated jobs")]
    HasJobs,

    #[error("Service request storage error{}: {source}", format_context(.context))]
    Storage { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Service request query failed{}: {source}", format_context(.context))]
    Sqlite { source: rusqlite::Error, context: Option<Cow<'static, str>> },
}

impl RequestsError {
    pub(crate) const fn invalid(message: &'static str) -> Self {
        Self::Validation { message: Cow::Borrowed(message) }
    }

    pub(crate) fn invalid_status() -> Self {
        Self::Validation {
            message: format!("Invalid status. Must be one of: {}", autoims_kernel::prelude::RequestStatus::choices())
                .into(),
        }
    }
}
