use crate::model::{DetailQuery, RequestInput, RequestList, RequestQuery, RequestResponse, StatusInput};
use crate::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

#[api_handler(
    get,
    path = "/service-requests",
    params(RequestQuery),
    responses((status = OK, description = "Requests with vehicle and customer details, newest first", body = RequestList)),
    security(("bearer" = [])),
    tag = SERVICE_REQUESTS_TAG,
)]
pub(crate) async fn list_requests(
    State(state): State<ApiState>,
    _auth: AuthUser,
    QueryParams(query): QueryParams<RequestQuery>,
) -> ApiResult<Json<RequestList>> {
    let filter = query.into_filter();
    let requests = state.database.call(move |conn| repository::list(conn, filter)).await?;
    Ok(Json(RequestList { message: "Service requests retrieved successfully", requests }))
}

#[api_handler(
    get,
    path = "/service-requests/{id}",
    params(("id" = i64, Path, description = "Service request id"), DetailQuery),
    responses(
        (status = OK, body = RequestResponse),
        (status = NOT_FOUND, description = "Service request not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = SERVICE_REQUESTS_TAG,
)]
pub(crate) async fn get_request(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
    QueryParams(query): QueryParams<DetailQuery>,
) -> ApiResult<Json<RequestResponse>> {
    let with_employees = query.with_employees();
    let request = state.database.call(move |conn| repository::get(conn, id, with_employees)).await?;
    Ok(Json(RequestResponse { message: "Service request retrieved successfully", request }))
}

#[api_handler(
    post,
    path = "/service-requests",
    request_body = RequestInput,
    responses(
        (status = CREATED, body = RequestResponse),
        (status = BAD_REQUEST, description = "Missing or invalid fields", body = ErrorBody),
        (status = NOT_FOUND, description = "Vehicle not found", body = ErrorBody),
        (status = CONFLICT, description = "Phone, email, or plate number already exists", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = SERVICE_REQUESTS_TAG,
)]
pub(crate) async fn create_request(
    State(state): State<ApiState>,
    _auth: AuthUser,
    Payload(input): Payload<RequestInput>,
) -> ApiResult<(StatusCode, Json<RequestResponse>)> {
    let draft = input.into_draft()?;
    let request = state.database.call(move |conn| repository::create(conn, draft)).await?;
    Ok((StatusCode::CREATED, Json(RequestResponse { message: "Service request created successfully", request })))
}

#[api_handler(
    put,
    path = "/service-requests/{id}",
    params(("id" = i64, Path, description = "Service request id")),
    request_body = RequestInput,
    responses(
        (status = OK, body = RequestResponse),
        (status = BAD_REQUEST, description = "No data or invalid status", body = ErrorBody),
        (status = NOT_FOUND, description = "Service request or vehicle not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = SERVICE_REQUESTS_TAG,
)]
pub(crate) async fn update_request(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
    body: DeferredPayload,
) -> ApiResult<Json<RequestResponse>> {
    state.require(Entity::ServiceRequest, id).await?;
    let input: RequestInput = body.parse()?;
    let patch = input.into_patch()?;
    let request = state.database.call(move |conn| repository::update(conn, id, patch)).await?;
    Ok(Json(RequestResponse { message: "Service request updated successfully", request }))
}

#[api_handler(
    put,
    path = "/service-requests/{id}/status",
    params(("id" = i64, Path, description = "Service request id")),
    request_body = StatusInput,
    responses(
        (status = OK, body = RequestResponse),
        (status = BAD_REQUEST, description = "Missing or unknown status", body = ErrorBody),
        (status = NOT_FOUND, description = "Service request not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = SERVICE_REQUESTS_TAG,
)]
pub(crate) async fn update_request_status(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
    body: DeferredPayload,
) -> ApiResult<Json<RequestResponse>> {
    state.require(Entity::ServiceRequest, id).await?;
    let input: StatusInput = body.parse()?;
    let status = input.into_status()?;
    let request = state.database.call(move |conn| repository::set_status(conn, id, status)).await?;
    Ok(Json(RequestResponse { message: "Status updated successfully", request }))
}

#[api_handler(
    delete,
    path = "/service-requests/{id}",
    params(("id" = i64, Path, description = "Service request id")),
    responses(
        (status = OK, body = MessageBody),
        (status = NOT_FOUND, description = "Service request not found", body = ErrorBody),
        (status = CONFLICT, description = "Service request has jobs", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = SERVICE_REQUESTS_TAG,
)]
pub(crate) async fn delete_request(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<MessageBody>> {
    state.database.call(move |conn| repository::delete(conn, id)).await?;
    Ok(Json(MessageBody::new("Service request deleted successfully")))
}

#[api_handler(
    get,
    path = "/vehicles/{id}/service-requests",
    params(("id" = i64, Path, description = "Vehicle id")),
    responses(
        (status = OK, body = RequestList),
        (status = NOT_FOUND, description = "Vehicle not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = VEHICLES_TAG,
)]
pub(crate) async fn vehicle_requests(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<RequestList>> {
    let requests = state.database.call(move |conn| repository::for_vehicle(conn, id)).await?;
    Ok(Json(RequestList { message: "Vehicle service requests retrieved successfully", requests }))
}
