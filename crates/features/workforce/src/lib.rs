//! Workforce feature slice: the workshop's employees.
mod error;
mod handlers;
mod model;
pub mod repository;

pub use error::{WorkforceError, WorkforceErrorExt};
pub use model::{Employee, EmployeeInput, EmployeeList, EmployeePatch, EmployeeQuery, EmployeeResponse, NewEmployee};

use autoims_kernel::domain::registry::InitializedSlice;
use autoims_kernel::prelude::{ApiState, Migration};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new(Workforce::NAME, "0001", include_str!("../migrations/0001_employees.sql"))];

#[autoims_derive::autoims_slice(name = "workforce")]
pub struct Workforce {}

/// Initialize the workforce feature.
///
/// # Errors
///
/// Infallible today; kept fallible like every slice initializer.
pub fn init() -> Result<InitializedSlice, WorkforceError> {
    tracing::info!("Workforce slice initialized");
    Ok(InitializedSlice::new(Workforce::new(WorkforceInner {})))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_employees, handlers::create_employee))
        .routes(routes!(handlers::get_employee, handlers::update_employee, handlers::deactivate_employee))
}
