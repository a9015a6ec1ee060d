use autoims_derive::{api_handler, api_model};
use autoims_domain::constants::SYSTEM_TAG;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use std::sync::LazyLock;
use std::time::Instant;

#[api_model(response)]
/// Liveness probe answer
pub(super) struct HealthResponse {
    /// Always "up" while the process serves requests
    status: &'static str,
    /// Crate version
    version: &'static str,
    /// Seconds since the first probe
    uptime: u64,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Service is up", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up",
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
    };

    ([(header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"), (header::PRAGMA, "no-cache")], Json(body))
}
