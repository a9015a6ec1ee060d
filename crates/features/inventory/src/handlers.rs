use crate::model::{ItemInput, ItemList, ItemResponse, LowStockList, StockInput};
use crate::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

#[api_handler(
    get,
    path = "/inventory",
    responses((status = OK, description = "Every item, by part name", body = ItemList)),
    security(("bearer" = [])),
    tag = INVENTORY_TAG,
)]
pub(crate) async fn list_items(State(state): State<ApiState>, _auth: AuthUser) -> ApiResult<Json<ItemList>> {
    let items = state.database.call(|conn| repository::list(conn)).await?;
    Ok(Json(ItemList { message: "Inventory items retrieved successfully", items }))
}

#[api_handler(
    get,
    path = "/inventory/low-stock",
    responses((status = OK, description = "Items at or below their reorder level", body = LowStockList)),
    security(("bearer" = [])),
    tag = INVENTORY_TAG,
)]
pub(crate) async fn low_stock(State(state): State<ApiState>, _auth: AuthUser) -> ApiResult<Json<LowStockList>> {
    let items = state.database.call(|conn| repository::low_stock(conn)).await?;
    Ok(Json(LowStockList { message: "Low stock items retrieved successfully", count: items.len(), items }))
}

#[api_handler(
    get,
    path = "/inventory/{id}",
    params(("id" = i64, Path, description = "Part id")),
    responses(
        (status = OK, body = ItemResponse),
        (status = NOT_FOUND, description = "Item not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = INVENTORY_TAG,
)]
pub(crate) async fn get_item(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<ItemResponse>> {
    let item = state.database.call(move |conn| repository::get(conn, id)).await?;
    Ok(Json(ItemResponse { message: "Item retrieved successfully", item }))
}

#[api_handler(
    post,
    path = "/inventory",
    request_body = ItemInput,
    responses(
        (status = CREATED, body = ItemResponse),
        (status = BAD_REQUEST, description = "Missing field or invalid number", body = ErrorBody),
        (status = CONFLICT, description = "Part code already exists", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = INVENTORY_TAG,
)]
pub(crate) async fn add_item(
    State(state): State<ApiState>,
    _auth: AuthUser,
    Payload(input): Payload<ItemInput>,
) -> ApiResult<(StatusCode, Json<ItemResponse>)> {
    let item = input.into_new()?;
    let item = state.database.call(move |conn| repository::create(conn, &item)).await?;
    Ok((StatusCode::CREATED, Json(ItemResponse { message: "Item added successfully", item })))
}

#[api_handler(
    put,
    path = "/inventory/{id}",
    params(("id" = i64, Path, description = "Part id")),
    request_body = ItemInput,
    responses(
        (status = OK, body = ItemResponse),
        (status = BAD_REQUEST, description = "No data or invalid number", body = ErrorBody),
        (status = NOT_FOUND, description = "Item not found", body = ErrorBody),
        (status = CONFLICT, description = "Part code already exists", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = INVENTORY_TAG,
)]
pub(crate) async fn update_item(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
    body: DeferredPayload,
) -> ApiResult<Json<ItemResponse>> {
    state.require(Entity::InventoryItem, id).await?;
    let input: ItemInput = body.parse()?;
    let patch = input.into_patch()?;
    let item = state.database.call(move |conn| repository::update(conn, id, patch)).await?;
    Ok(Json(ItemResponse { message: "Item updated successfully", item }))
}

#[api_handler(
    put,
    path = "/inventory/{id}/stock",
    params(("id" = i64, Path, description = "Part id")),
    request_body = StockInput,
    responses(
        (status = OK, body = ItemResponse),
        (status = BAD_REQUEST, description = "Missing, non-integer or negative quantity", body = ErrorBody),
        (status = NOT_FOUND, description = "Item not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = INVENTORY_TAG,
)]
pub(crate) async fn update_stock(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
    body: DeferredPayload,
) -> ApiResult<Json<ItemResponse>> {
    state.require(Entity::InventoryItem, id).await?;
    let input: StockInput = body.parse()?;
    let adjustment = input.into_adjustment()?;
    let item = state.database.call(move |conn| repository::adjust_stock(conn, id, adjustment)).await?;
    Ok(Json(ItemResponse { message: "Stock updated successfully", item }))
}
