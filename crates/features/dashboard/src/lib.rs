//! Dashboard feature slice.
//!
//! Owns no tables; it reads what the other slices store.
mod error;
mod handlers;
mod model;
mod repository;

pub use error::{DashboardError, DashboardErrorExt};
pub use model::{
    BillingView, CustomersView, DashboardOverview, DashboardStats, InventoryView, JobsView, RequestsView, VehiclesView,
};

use autoims_kernel::domain::registry::InitializedSlice;
use autoims_kernel::prelude::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[autoims_derive::autoims_slice(name = "dashboard")]
pub struct Dashboard {}

/// Initialize the dashboard feature.
///
/// # Errors
///
/// Infallible today; kept fallible like every slice initializer.
pub fn init() -> Result<InitializedSlice, DashboardError> {
    tracing::info!("Dashboard slice initialized");
    Ok(InitializedSlice::new(Dashboard::new(DashboardInner {})))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::overview))
        .routes(routes!(handlers::customers))
        .routes(routes!(handlers::vehicles))
        .routes(routes!(handlers::service_requests))
        .routes(routes!(handlers::service_jobs))
        .routes(routes!(handlers::inventory))
        .routes(routes!(handlers::billing))
}
