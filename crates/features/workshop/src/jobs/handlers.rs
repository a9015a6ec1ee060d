use super::model::{JobInput, JobList, JobQuery, JobResponse, JobStatusInput};
use super::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

#[api_handler(
    get,
    path = "/service-jobs",
    params(JobQuery),
    responses((status = OK, description = "Jobs with request and vehicle, latest started first", body = JobList)),
    security(("bearer" = [])),
    tag = SERVICE_JOBS_TAG,
)]
pub(crate) async fn list_jobs(
    State(state): State<ApiState>,
    _auth: AuthUser,
    QueryParams(query): QueryParams<JobQuery>,
) -> ApiResult<Json<JobList>> {
    let jobs = state.database.call(move |conn| repository::list(conn, query.request_id)).await?;
    Ok(Json(JobList { message: "Service jobs retrieved successfully", jobs }))
}

#[api_handler(
    get,
    path = "/service-jobs/{id}",
    params(("id" = i64, Path, description = "Job id")),
    responses(
        (status = OK, body = JobResponse),
        (status = NOT_FOUND, description = "Job not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = SERVICE_JOBS_TAG,
)]
pub(crate) async fn get_job(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<JobResponse>> {
    let job = state.database.call(move |conn| repository::get(conn, id)).await?;
    Ok(Json(JobResponse { message: "Service job retrieved successfully", job }))
}

#[api_handler(
    post,
    path = "/service-jobs",
    request_body = JobInput,
    responses(
        (status = CREATED, body = JobResponse),
        (status = BAD_REQUEST, description = "Missing request id or negative labor cost", body = ErrorBody),
        (status = NOT_FOUND, description = "Service request or employee not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = SERVICE_JOBS_TAG,
)]
pub(crate) async fn create_job(
    State(state): State<ApiState>,
    _auth: AuthUser,
    Payload(input): Payload<JobInput>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    let job = input.into_new()?;
    let job = state.database.call(move |conn| repository::create(conn, &job)).await?;
    Ok((StatusCode::CREATED, Json(JobResponse { message: "Service job created successfully", job })))
}

#[api_handler(
    put,
    path = "/service-jobs/{id}/status",
    params(("id" = i64, Path, description = "Job id")),
    request_body = JobStatusInput,
    responses(
        (status = OK, body = JobResponse),
        (status = BAD_REQUEST, description = "Missing or unknown status", body = ErrorBody),
        (status = NOT_FOUND, description = "Job not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = SERVICE_JOBS_TAG,
)]
pub(crate) async fn update_job_status(
    State(state): State<ApiState>,
    _auth: AuthUser,
    PathParam(id): PathParam<i64>,
    body: DeferredPayload,
) -> ApiResult<Json<JobResponse>> {
    state.require(Entity::ServiceJob, id).await?;
    let input: JobStatusInput = body.parse()?;
    let status = input.into_status()?;
    let job = state.database.call(move |conn| repository::set_status(conn, id, status)).await?;
    tracing::info!(job_id = id, status = %status, "Job status changed");
    Ok(Json(JobResponse { message: "Job status updated successfully", job }))
}
