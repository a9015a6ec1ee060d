use crate::model::{CustomerInput, CustomerList, CustomerQuery, CustomerResponse};
use crate::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

#[api_handler(
    get,
    path = "/customers",
    params(CustomerQuery),
    responses((status = OK, description = "Customers, newest first or by name when searching", body = CustomerList)),
    security(("bearer" = [])),
    tag = CUSTOMERS_TAG,
)]
pub(crate) async fn list_customers(
    State(state): State<ApiState>,
    _auth: AuthUser,
    QueryParams(query): QueryParams<CustomerQuery>,
) -> ApiResult<Json<CustomerList>> {
    let search = query.search.filter(|term| !term.is_empty());
    let customers = state.database.call(move |conn| repository::list(conn, search.as_deref())).await?;
    Ok(Json(CustomerList { message: "Customers retrieved successfully", customers }))
}

#[api_handler(
    get,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = OK, body = CustomerResponse),
        (status = NOT_FOUND, description = "Customer not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = CUSTOMERS_TAG,
)]
pub(crate) async fn get_customer(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<CustomerResponse>> {
    let customer = state.database.call(move |conn| repository::get(conn, id)).await?;
    Ok(Json(CustomerResponse { message: "Customer retrieved successfully", customer }))
}

#[api_handler(
    post,
    path = "/customers",
    request_body = CustomerInput,
    responses(
        (status = CREATED, body = CustomerResponse),
        (status = BAD_REQUEST, description = "Missing field", body = ErrorBody),
        (status = CONFLICT, description = "Phone or email already exists", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = CUSTOMERS_TAG,
)]
pub(crate) async fn create_customer(
    State(state): State<ApiState>,
    _auth: AuthUser,
    Payload(input): Payload<CustomerInput>,
) -> ApiResult<(StatusCode, Json<CustomerResponse>)> {
    let new_customer = input.into_new()?;
    let customer = state.database.call(move |conn| repository::create(conn, &new_customer)).await?;
    Ok((StatusCode::CREATED, Json(CustomerResponse { message: "Customer created successfully", customer })))
}

#[api_handler(
    put,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    request_body = CustomerInput,
    responses(
        (status = OK, body = CustomerResponse),
        (status = NOT_FOUND, description = "Customer not found", body = ErrorBody),
        (status = CONFLICT, description = "Phone or email already exists", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = CUSTOMERS_TAG,
)]
pub(crate) async fn update_customer(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
    body: DeferredPayload,
) -> ApiResult<Json<CustomerResponse>> {
    state.require(Entity::Customer, id).await?;
    let input: CustomerInput = body.parse()?;
    let customer = state.database.call(move |conn| repository::update(conn, id, &input)).await?;
    Ok(Json(CustomerResponse { message: "Customer updated successfully", customer }))
}

#[api_handler(
    delete,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = OK, body = MessageBody),
        (status = NOT_FOUND, description = "Customer not found", body = ErrorBody),
        (status = CONFLICT, description = "Customer still owns vehicles", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = CUSTOMERS_TAG,
)]
pub(crate) async fn delete_customer(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<MessageBody>> {
    state.database.call(move |conn| repository::delete(conn, id)).await?;
    Ok(Json(MessageBody::new("Customer deleted successfully")))
}
