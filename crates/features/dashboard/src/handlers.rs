use crate::model::{
    BillingView, CustomersView, DashboardOverview, DashboardStats, InventoryView, JobsView, RequestsView, VehiclesView,
};
use crate::repository;
use autoims_kernel::prelude::*;
use axum::Json;
use axum::extract::State;

#[api_handler(
    get,
    path = "/dashboard",
    responses(
        (status = OK, description = "Current user and summary statistics", body = DashboardOverview),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = DASHBOARD_TAG,
)]
pub(crate) async fn overview(State(state): State<ApiState>, auth: AuthUser) -> ApiResult<Json<DashboardOverview>> {
    let user_id = auth.user_id;
    let user = state.database.call(move |conn| repository::user(conn, user_id)).await?;
    let stats = state.database.call(|conn| repository::stats(conn)).await.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Dashboard statistics unavailable");
        DashboardStats::default()
    });
    Ok(Json(DashboardOverview { message: "Dashboard data retrieved successfully", user, stats }))
}

#[api_handler(
    get,
    path = "/dashboard/customers",
    responses((status = OK, body = CustomersView)),
    security(("bearer" = [])),
    tag = DASHBOARD_TAG,
)]
pub(crate) async fn customers(State(state): State<ApiState>, _auth: AuthUser) -> ApiResult<Json<CustomersView>> {
    let customers = state.database.call(|conn| repository::customers(conn)).await?;
    Ok(Json(CustomersView { message: "Customers retrieved successfully", customers }))
}

#[api_handler(
    get,
    path = "/dashboard/vehicles",
    responses((status = OK, body = VehiclesView)),
    security(("bearer" = [])),
    tag = DASHBOARD_TAG,
)]
pub(crate) async fn vehicles(State(state): State<ApiState>, _auth: AuthUser) -> ApiResult<Json<VehiclesView>> {
    let vehicles = state.database.call(|conn| repository::vehicles(conn)).await?;
    Ok(Json(VehiclesView { message: "Vehicles retrieved successfully", vehicles }))
}

#[api_handler(
    get,
    path = "/dashboard/service-requests",
    responses((status = OK, body = RequestsView)),
    security(("bearer" = [])),
    tag = DASHBOARD_TAG,
)]
pub(crate) async fn service_requests(State(state): State<ApiState>, _auth: AuthUser) -> ApiResult<Json<RequestsView>> {
    let service_requests = state.database.call(|conn| repository::service_requests(conn)).await?;
    Ok(Json(RequestsView { message: "Service requests retrieved successfully", service_requests }))
}

#[api_handler(
    get,
    path = "/dashboard/service-jobs",
    responses((status = OK, body = JobsView)),
    security(("bearer" = [])),
    tag = DASHBOARD_TAG,
)]
pub(crate) async fn service_jobs(State(state): State<ApiState>, _auth: AuthUser) -> ApiResult<Json<JobsView>> {
    let service_jobs = state.database.call(|conn| repository::service_jobs(conn)).await?;
    Ok(Json(JobsView { message: "Service jobs retrieved successfully", service_jobs }))
}

#[api_handler(
    get,
    path = "/dashboard/inventory",
    responses((status = OK, body = InventoryView)),
    security(("bearer" = [])),
    tag = DASHBOARD_TAG,
)]
pub(crate) async fn inventory(State(state): State<ApiState>, _auth: AuthUser) -> ApiResult<Json<InventoryView>> {
    let inventory = state.database.call(|conn| repository::inventory(conn)).await?;
    Ok(Json(InventoryView { message: "Inventory retrieved successfully", inventory }))
}

#[api_handler(
    get,
    path = "/dashboard/billing",
    responses((status = OK, body = BillingView)),
    security(("bearer" = [])),
    tag = DASHBOARD_TAG,
)]
pub(crate) async fn billing(State(state): State<ApiState>, _auth: AuthUser) -> ApiResult<Json<BillingView>> {
    let billing = state.database.call(|conn| repository::billing(conn)).await?;
    Ok(Json(BillingView { message: "Billing records retrieved successfully", billing }))
}
