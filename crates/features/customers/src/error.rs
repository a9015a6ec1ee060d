use autoims_kernel::prelude::DatabaseError;
use std::borrow::Cow;

#[autoims_derive::autoims_error(api)]
pub enum CustomersError {
    #[status(bad_request)]
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    #[status(not_found)]
    #[error("Customer not found")]
    NotFound,

    #[status(conflict)]
    #[error("Phone or email already exists")]
    Duplicate,

    #[status(conflict)]
    #[error("Cannot delete customer with associated vehicles")]
    HasVehicles,

    #[error("Customer storage error{}: {source}", format_context(.context))]
    Storage { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Customer query failed{}: {source}", format_context(.context))]
    Sqlite { source: rusqlite::Error, context: Option<Cow<'static, str>> },
}
