use crate::model::{EmployeeInput, EmployeeList, EmployeeQuery, EmployeeResponse};
use crate::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

#[api_handler(
    get,
    path = "/employees",
    params(EmployeeQuery),
    responses((status = OK, description = "Working employees, newest first", body = EmployeeList)),
    security(("bearer" = [])),
    tag = EMPLOYEES_TAG,
)]
pub(crate) async fn list_employees(
    State(state): State<ApiState>,
    _auth: AuthUser,
    QueryParams(query): QueryParams<EmployeeQuery>,
) -> ApiResult<Json<EmployeeList>> {
    let include_inactive = query.include_inactive();
    let employees = state.database.call(move |conn| repository::list(conn, include_inactive)).await?;
    Ok(Json(EmployeeList { message: "Employees retrieved successfully", employees }))
}

#[api_handler(
    get,
    path = "/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = OK, body = EmployeeResponse),
        (status = NOT_FOUND, description = "Employee not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = EMPLOYEES_TAG,
)]
pub(crate) async fn get_employee(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state.database.call(move |conn| repository::get(conn, id)).await?;
    Ok(Json(EmployeeResponse { message: "Employee retrieved successfully", employee }))
}

#[api_handler(
    post,
    path = "/employees",
    request_body = EmployeeInput,
    responses(
        (status = CREATED, body = EmployeeResponse),
        (status = BAD_REQUEST, description = "Missing name or position", body = ErrorBody),
        (status = CONFLICT, description = "Phone or email already exists", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = EMPLOYEES_TAG,
)]
pub(crate) async fn create_employee(
    State(state): State<ApiState>,
    _auth: AuthUser,
    Payload(input): Payload<EmployeeInput>,
) -> ApiResult<(StatusCode, Json<EmployeeResponse>)> {
    let employee = input.into_new()?;
    let employee = state.database.call(move |conn| repository::create(conn, &employee)).await?;
    tracing::info!(employee_id = employee.id, "Employee created");
    Ok((StatusCode::CREATED, Json(EmployeeResponse { message: "Employee created successfully", employee })))
}

#[api_handler(
    put,
    path = "/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    request_body = EmployeeInput,
    responses(
        (status = OK, body = EmployeeResponse),
        (status = NOT_FOUND, description = "Employee not found", body = ErrorBody),
        (status = CONFLICT, description = "Phone or email already exists", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = EMPLOYEES_TAG,
)]
pub(crate) async fn update_employee(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
    body: DeferredPayload,
) -> ApiResult<Json<EmployeeResponse>> {
    state.require(Entity::Employee, id).await?;
    let input: EmployeeInput = body.parse()?;
    let patch = input.into_patch()?;
    let employee = state.database.call(move |conn| repository::update(conn, id, patch)).await?;
    Ok(Json(EmployeeResponse { message: "Employee updated successfully", employee }))
}

#[api_handler(
    delete,
    path = "/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = OK, description = "Employee marked as not working", body = EmployeeResponse),
        (status = NOT_FOUND, description = "Employee not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = EMPLOYEES_TAG,
)]
pub(crate) async fn deactivate_employee(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state.database.call(move |conn| repository::deactivate(conn, id)).await?;
    tracing::info!(employee_id = id, "Employee deactivated");
    Ok(Json(EmployeeResponse { message: "Employee deactivated successfully", employee }))
}
