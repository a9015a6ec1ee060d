use crate::model::{VehicleInput, VehicleList, VehicleQuery, VehicleResponse};
use crate::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

#[api_handler(
    get,
    path = "/vehicles",
    params(VehicleQuery),
    responses((status = OK, description = "Vehicles with owner name and phone", body = VehicleList)),
    security(("bearer" = [])),
    tag = VEHICLES_TAG,
)]
pub(crate) async fn list_vehicles(
    State(state): State<ApiState>,
    _auth: AuthUser,
    QueryParams(query): QueryParams<VehicleQuery>,
) -> ApiResult<Json<VehicleList>> {
    let customer_id = query.customer();
    let search = query.search.filter(|term| !term.is_empty());
    let vehicles =
        state.database.call(move |conn| repository::list(conn, search.as_deref(), customer_id)).await?;
    Ok(Json(VehicleList { message: "Vehicles retrieved successfully", vehicles }))
}

#[api_handler(
    get,
    path = "/vehicles/{id}",
    params(("id" = i64, Path, description = "Vehicle id")),
    responses(
        (status = OK, body = VehicleResponse),
        (status = NOT_FOUND, description = "Vehicle not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = VEHICLES_TAG,
)]
pub(crate) async fn get_vehicle(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<VehicleResponse>> {
    let vehicle = state.database.call(move |conn| repository::get(conn, id)).await?;
    Ok(Json(VehicleResponse { message: "Vehicle retrieved successfully", vehicle }))
}

#[api_handler(
    get,
    path = "/vehicles/plate/{plate_no}",
    params(("plate_no" = String, Path, description = "Registration plate")),
    responses(
        (status = OK, body = VehicleResponse),
        (status = NOT_FOUND, description = "Vehicle not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = VEHICLES_TAG,
)]
pub(crate) async fn get_vehicle_by_plate(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(plate_no): PathParam<String>,
) -> ApiResult<Json<VehicleResponse>> {
    let vehicle = state.database.call(move |conn| repository::by_plate(conn, &plate_no)).await?;
    Ok(Json(VehicleResponse { message: "Vehicle retrieved successfully", vehicle }))
}

#[api_handler(
    post,
    path = "/vehicles",
    request_body = VehicleInput,
    responses(
        (status = CREATED, body = VehicleResponse),
        (status = BAD_REQUEST, description = "Missing field or invalid year", body = ErrorBody),
        (status = NOT_FOUND, description = "Customer not found", body = ErrorBody),
        (status = CONFLICT, description = "Plate number already exists", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = VEHICLES_TAG,
)]
pub(crate) async fn create_vehicle(
    State(state): State<ApiState>,
    _auth: AuthUser,
    Payload(input): Payload<VehicleInput>,
) -> ApiResult<(StatusCode, Json<VehicleResponse>)> {
    let checked = input.check_required()?;
    let vehicle = state.database.call(move |conn| repository::register(conn, checked)).await?;
    Ok((StatusCode::CREATED, Json(VehicleResponse { message: "Vehicle created successfully", vehicle })))
}

#[api_handler(
    put,
    path = "/vehicles/{id}",
    params(("id" = i64, Path, description = "Vehicle id")),
    request_body = VehicleInput,
    responses(
        (status = OK, body = VehicleResponse),
        (status = BAD_REQUEST, description = "Invalid year", body = ErrorBody),
        (status = NOT_FOUND, description = "Vehicle or customer not found", body = ErrorBody),
        (status = CONFLICT, description = "Plate number already exists", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = VEHICLES_TAG,
)]
pub(crate) async fn update_vehicle(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
    body: DeferredPayload,
) -> ApiResult<Json<VehicleResponse>> {
    state.require(Entity::Vehicle, id).await?;
    let input: VehicleInput = body.parse()?;
    let patch = input.into_patch()?;
    let vehicle = state.database.call(move |conn| repository::update(conn, id, patch)).await?;
    Ok(Json(VehicleResponse { message: "Vehicle updated successfully", vehicle }))
}

#[api_handler(
    delete,
    path = "/vehicles/{id}",
    params(("id" = i64, Path, description = "Vehicle id")),
    responses(
        (status = OK, body = MessageBody),
        (status = NOT_FOUND, description = "Vehicle not found", body = ErrorBody),
        (status = CONFLICT, description = "Vehicle has service requests", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = VEHICLES_TAG,
)]
pub(crate) async fn delete_vehicle(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<MessageBody>> {
    state.database.call(move |conn| repository::delete(conn, id)).await?;
    Ok(Json(MessageBody::new("Vehicle deleted successfully")))
}

#[api_handler(
    get,
    path = "/customers/{id}/vehicles",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = OK, body = VehicleList),
        (status = NOT_FOUND, description = "Customer not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = CUSTOMERS_TAG,
)]
pub(crate) async fn customer_vehicles(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<VehicleList>> {
    let vehicles = state.database.call(move |conn| repository::for_customer(conn, id)).await?;
    Ok(Json(VehicleList { message: "Customer vehicles retrieved successfully", vehicles }))
}
