//! Vehicles feature slice.
//!
//! Also answers `/customers/{id}/vehicles`, since the listing is vehicle data.
mod error;
mod handlers;
mod model;
pub mod repository;

pub use error::{VehiclesError, VehiclesErrorExt};
pub use model::{
    CheckedVehicle, NewVehicle, Vehicle, VehicleDetails, VehicleInput, VehicleList, VehiclePatch,
    VehicleQuery, VehicleResponse,
};

use autoims_kernel::domain::registry::InitializedSlice;
use autoims_kernel::prelude::{ApiState, Migration};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new(Vehicles::NAME, "0001", include_str!("../migrations/0001_vehicles.sql"))];

/// Vehicles feature state.
#[autoims_derive::autoims_slice(name = "vehicles")]
pub struct Vehicles {}

/// Initialize the vehicles feature.
///
/// # Errors
///
/// Infallible today; kept fallible like every slice initializer.
pub fn init() -> Result<InitializedSlice, VehiclesError> {
    tracing::info!("Vehicles slice initialized");
    Ok(InitializedSlice::new(Vehicles::new(VehiclesInner {})))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_vehicles, handlers::create_vehicle))
        .routes(routes!(handlers::get_vehicle, handlers::update_vehicle, handlers::delete_vehicle))
        .routes(routes!(handlers::get_vehicle_by_plate))
        .routes(routes!(handlers::customer_vehicles))
}
