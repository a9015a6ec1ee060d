use autoims_kernel::prelude::DatabaseError;
use std::borrow::Cow;

#[autoims_derive::autoims_error(api)]
pub enum VehiclesError {
    #[status(bad_request)]
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    #[status(not_found)]
    #[error("Vehicle not found")]
    NotFound,

    #[status(not_found)]
    #[error("Customer not found")]
    CustomerNotFound,

    #[status(conflict)]
    #[error("Plate number already exists")]
    DuplicatePlate,

    #[status(conflict)]
    #[error("Cannot delete vehicle with associated service requests")]
    HasServiceRequests,

    #[error("Vehicle storage error{}: {source}", format_context(.context))]
    Storage { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Vehicle query failed{}: {source}", format_context(.context))]
    Sqlite { source: rusqlite::Error, context: Option<Cow<'static, str>> },
}

impl VehiclesError {
    pub(crate) const fn invalid(message: &'static str) -> Self {
        Self::Validation { message: Cow::Borrowed(message) }
    }
}
