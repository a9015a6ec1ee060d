use super::model::{JobPartInput, JobPartList, JobPartResponse, PartsTotal};
use super::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

#[api_handler(
    get,
    path = "/job-parts/job/{job_id}",
    params(("job_id" = i64, Path, description = "Job id")),
    responses(
        (status = OK, body = JobPartList),
        (status = NOT_FOUND, description = "Job not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = JOB_PARTS_TAG,
)]
pub(crate) async fn parts_for_job(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(job_id): PathParam<i64>,
) -> ApiResult<Json<JobPartList>> {
    let (parts, total_cost) = state.database.call(move |conn| repository::for_job(conn, job_id)).await?;
    Ok(Json(JobPartList { message: "Parts retrieved successfully", job_id, parts, total_cost }))
}

#[api_handler(
    get,
    path = "/job-parts/job/{job_id}/total",
    params(("job_id" = i64, Path, description = "Job id")),
    responses(
        (status = OK, body = PartsTotal),
        (status = NOT_FOUND, description = "Job not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = JOB_PARTS_TAG,
)]
pub(crate) async fn parts_total(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(job_id): PathParam<i64>,
) -> ApiResult<Json<PartsTotal>> {
    let total_parts_cost = state.database.call(move |conn| repository::checked_total(conn, job_id)).await?;
    Ok(Json(PartsTotal { message: "Total calculated successfully", job_id, total_parts_cost }))
}

#[api_handler(
    post,
    path = "/job-parts",
    request_body = JobPartInput,
    responses(
        (status = CREATED, body = JobPartResponse),
        (status = BAD_REQUEST, description = "Missing field, bad quantity or insufficient stock", body = ErrorBody),
        (status = NOT_FOUND, description = "Job or part not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = JOB_PARTS_TAG,
)]
pub(crate) async fn add_part(
    State(state): State<ApiState>,
    _auth: AuthUser,
    Payload(input): Payload<JobPartInput>,
) -> ApiResult<(StatusCode, Json<JobPartResponse>)> {
    let usage = input.into_new()?;
    let job_part = state.database.call(move |conn| repository::add(conn, usage)).await?;
    tracing::info!(job_id = usage.job_id, part_id = usage.part_id, quantity = usage.quantity_used, "Part used on job");
    Ok((StatusCode::CREATED, Json(JobPartResponse { message: "Part added to job successfully", job_part })))
}

#[api_handler(
    delete,
    path = "/job-parts/{id}",
    params(("id" = i64, Path, description = "Part usage id")),
    responses(
        (status = OK, body = MessageBody),
        (status = NOT_FOUND, description = "Part usage record not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = JOB_PARTS_TAG,
)]
pub(crate) async fn remove_part(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<MessageBody>> {
    state.database.call(move |conn| repository::remove(conn, id)).await?;
    Ok(Json(MessageBody::new("Part removed from job successfully")))
}
