//! Customers feature slice.
mod error;
mod handlers;
mod model;
pub mod repository;

pub use error::{CustomersError, CustomersErrorExt};
pub use model::{Customer, CustomerInput, CustomerList, CustomerQuery, CustomerResponse, NewCustomer};

use autoims_kernel::domain::registry::InitializedSlice;
use autoims_kernel::prelude::{ApiState, Migration};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new(Customers::NAME, "0001", include_str!("../migrations/0001_customers.sql"))];

/// Customers feature state.
#[autoims_derive::autoims_slice(name = "customers")]
pub struct Customers {}

/// Initialize the customers feature.
///
/// # Errors
///
/// Infallible today; kept fallible like every slice initializer.
pub fn init() -> Result<InitializedSlice, CustomersError> {
    tracing::info!("Customers slice initialized");
    Ok(InitializedSlice::new(Customers::new(CustomersInner {})))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_customers, handlers::create_customer))
        .routes(routes!(handlers::get_customer, handlers::update_customer, handlers::delete_customer))
}
