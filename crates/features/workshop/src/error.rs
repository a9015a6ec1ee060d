use autoims_kernel::prelude::DatabaseError;
use std::borrow::Cow;

#[autoims_derive::autoims_error(api)]
pub enum WorkshopError {
    #[status(bad_request)]
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    #[status(bad_request)]
    #[error("Insufficient stock. Available: {available}, Requested: {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    #[status(not_found)]
    #[error("Job not found")]
    JobNotFound,

    #[status(not_found)]
    #[error("Service request not found")]
    RequestNotFound,

    #[status(not_found)]
    #[error("Employee not found")]
    EmployeeNotFound,

    #[status(not_found)]
    #[error("Part not found")]
    PartNotFound,

    #[status(not_found)]
    #[error("Part usage record not found")]
    UsageNotFound,

    #[status(not_found)]
    #[error("Bill not found")]
    BillNotFound,

    #[status(conflict)]
    #[error("Bill already exists for this job")]
    BillExists,

    #[error("Workshop storage error{}: {source}", format_context(.context))]
    Storage { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Workshop query failed{}: {source}", format_context(.context))]
    Sqlite { source: rusqlite::Error, context: Option<Cow<'static, str>> },

    #[error("Stock update failed{}: {source}", format_context(.context))]
    Inventory { source: autoims_inventory::InventoryError, context: Option<Cow<'static, str>> },
}

impl WorkshopError {
    pub(crate) const fn invalid(message: &'static str) -> Self {
        Self::Validation { message: Cow::Borrowed(message) }
    }
}
