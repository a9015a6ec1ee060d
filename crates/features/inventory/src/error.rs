use autoims_kernel::prelude::DatabaseError;
use std::borrow::Cow;

#[autoims_derive::autoims_error(api)]
pub enum InventoryError {
    #[status(bad_request)]
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    #[status(bad_request)]
    #[error("Stock cannot go below zero or overflow. Available: {available}, Change: {change}")]
    StockOutOfRange { available: i64, change: i64 },

    #[status(not_found)]
    #[error("Item not found")]
    NotFound,

    #[status(conflict)]
    #[error("Part code already exists")]
    DuplicateCode,

    #[error("Inventory storage error{}: {source}", format_context(.context))]
    Storage { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Inventory query failed{}: {source}", format_context(.context))]
    Sqlite { source: rusqlite::Error, context: Option<Cow<'static, str>> },
}

impl InventoryError {
    pub(crate) const fn invalid(message: &'static str) -> Self {
        Self::Validation { message: Cow::Borrowed(message) }
    }
}
