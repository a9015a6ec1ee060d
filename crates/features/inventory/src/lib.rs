//! Parts inventory feature slice.
mod error;
mod handlers;
mod model;
pub mod repository;

pub use error::{InventoryError, InventoryErrorExt};
pub use model::{
    InventoryItem, ItemInput, ItemList, ItemPatch, ItemResponse, LowStockList, NewItem, StockAdjustment, StockInput,
};

use autoims_kernel::domain::registry::InitializedSlice;
use autoims_kernel::prelude::{ApiState, Migration};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new(Inventory::NAME, "0001", include_str!("../migrations/0001_inventory.sql"))];

#[autoims_derive::autoims_slice(name = "inventory")]
pub struct Inventory {}

/// Initialize the inventory feature.
///
/// # Errors
///
/// Infallible today; kept fallible like every slice initializer.
pub fn init() -> Result<InitializedSlice, InventoryError> {
    tracing::info!("Inventory slice initialized");
    Ok(InitializedSlice::new(Inventory::new(InventoryInner {})))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_items, handlers::add_item))
        .routes(routes!(handlers::low_stock))
        .routes(routes!(handlers::get_item, handlers::update_item))
        .routes(routes!(handlers::update_stock))
}
