//! Workshop feature slice: service jobs, the parts they use and their bills.
mod error;
mod input;

pub mod billing;
pub mod jobs;
pub mod parts;

#[cfg(test)]
mod test_support;

pub use error::{WorkshopError, WorkshopErrorExt};

use autoims_kernel::domain::registry::InitializedSlice;
use autoims_kernel::prelude::{ApiState, Migration};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new(Workshop::NAME, "0001", include_str!("../migrations/0001_workshop.sql"))];

#[autoims_derive::autoims_slice(name = "workshop")]
pub struct Workshop {}

/// Initialize the workshop feature.
///
/// # Errors
///
/// Infallible today; kept fallible like every slice initializer.
pub fn init() -> Result<InitializedSlice, WorkshopError> {
    tracing::info!("Workshop slice initialized");
    Ok(InitializedSlice::new(Workshop::new(WorkshopInner {})))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(jobs::handlers::list_jobs, jobs::handlers::create_job))
        .routes(routes!(jobs::handlers::get_job))
        .routes(routes!(jobs::handlers::update_job_status))
        .routes(routes!(parts::handlers::add_part))
        .routes(routes!(parts::handlers::parts_for_job))
        .routes(routes!(parts::handlers::parts_total))
        .routes(routes!(parts::handlers::remove_part))
        .routes(routes!(billing::handlers::list_bills, billing::handlers::create_bill))
        .routes(routes!(billing::handlers::get_bill))
        .routes(routes!(billing::handlers::pay_bill))
}
