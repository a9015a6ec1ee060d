//! Service requests feature slice.
//!
//! A request is created for a known vehicle, or as a walk-in that registers
//! the customer and vehicle in the same transaction.
mod error;
mod handlers;
mod model;
pub mod repository;

pub use error::{RequestsError, RequestsErrorExt};
pub use model::{
    AssignedEmployee, DetailQuery, NewRequest, Origin, RequestDraft, RequestFilter, RequestInput, RequestList,
    RequestPatch, RequestQuery, RequestResponse, ServiceRequest, ServiceRequestDetails, StatusInput,
    parse_status,
};

use autoims_kernel::domain::registry::InitializedSlice;
use autoims_kernel::prelude::{ApiState, Migration};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] = &[Migration::new(
    ServiceRequests::NAME,
    "0001",
    include_str!("../migrations/0001_service_requests.sql"),
)];

#[autoims_derive::autoims_slice(name = "service_requests")]
pub struct ServiceRequests {}

/// Initialize the service requests feature.
///
/// # Errors
///
/// Infallible today; kept fallible like every slice initializer.
pub fn init() -> Result<InitializedSlice, RequestsError> {
    tracing::info!("Service requests slice initialized");
    Ok(InitializedSlice::new(ServiceRequests::new(ServiceRequestsInner {})))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_requests, handlers::create_request))
        .routes(routes!(handlers::get_request, handlers::update_request, handlers::delete_request))
        .routes(routes!(handlers::update_request_status))
        .routes(routes!(handlers::vehicle_requests))
}
