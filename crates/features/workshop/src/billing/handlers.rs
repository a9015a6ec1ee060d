use super::model::{BillInput, BillList, BillResponse};
use super::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

#[api_handler(
    get,
    path = "/billing",
    responses((status = OK, description = "Bills with job and customer, newest first", body = BillList)),
    security(("bearer" = [])),
    tag = BILLING_TAG,
)]
pub(crate) async fn list_bills(State(state): State<ApiState>, _auth: AuthUser) -> ApiResult<Json<BillList>> {
    let bills = state.database.call(|conn| repository::list(conn)).await?;
    Ok(Json(BillList { message: "Bills retrieved successfully", bills }))
}

#[api_handler(
    get,
    path = "/billing/{id}",
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = OK, body = BillResponse),
        (status = NOT_FOUND, description = "Bill not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = BILLING_TAG,
)]
pub(crate) async fn get_bill(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<BillResponse>> {
    let bill = state.database.call(move |conn| repository::get(conn, id)).await?;
    Ok(Json(BillResponse { message: "Bill retrieved successfully", bill }))
}

#[api_handler(
    post,
    path = "/billing",
    request_body = BillInput,
    responses(
        (status = CREATED, body = BillResponse),
        (status = BAD_REQUEST, description = "Missing job_id or bad labor cost", body = ErrorBody),
        (status = NOT_FOUND, description = "Job not found", body = ErrorBody),
        (status = CONFLICT, description = "Bill already exists for this job", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = BILLING_TAG,
)]
pub(crate) async fn create_bill(
    State(state): State<ApiState>,
    _auth: AuthUser,
    Payload(input): Payload<BillInput>,
) -> ApiResult<(StatusCode, Json<BillResponse>)> {
    let bill = input.into_new()?;
    let bill = state.database.call(move |conn| repository::create(conn, bill)).await?;
    tracing::info!(bill_id = bill.bill.bill_id, job_id = bill.bill.job_id, total = bill.bill.total_amount, "Bill created");
    Ok((StatusCode::CREATED, Json(BillResponse { message: "Bill created successfully", bill })))
}

#[api_handler(
    put,
    path = "/billing/{id}/pay",
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = OK, body = BillResponse),
        (status = NOT_FOUND, description = "Bill not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = BILLING_TAG,
)]
pub(crate) async fn pay_bill(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<BillResponse>> {
    let bill = state.database.call(move |conn| repository::mark_paid(conn, id)).await?;
    Ok(Json(BillResponse { message: "Bill marked as paid", bill }))
}
