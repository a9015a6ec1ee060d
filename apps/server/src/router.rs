use crate::pages;
use autoims::domain::constants::BEARER_SCHEME;
use autoims::kernel::prelude::ApiState;
use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "AutoIMS API"), modifiers(&BearerAuth))]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

pub(crate) fn init(state: ApiState) -> Router {
    let static_dir = state.config.storage.static_dir.clone();

    let (api_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(autoims::server::router::system_router())
        .nest("/api", autoims::server::api_router())
        .split_for_parts();

    Router::new()
        .merge(api_routes)
        .merge(Scalar::with_url("/api/docs", api_doc))
        .route("/", get(pages::root))
        .route("/signup", get(pages::signup))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
