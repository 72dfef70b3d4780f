//! Patient API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Layer stack (outermost → innermost):
//! 1. Cache-Control: no-store → 2. Request logger → Handler

use axum::http::{header, HeaderValue};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::ServiceConfig;

/// Build the patient API router from service config.
pub fn patient_api_router(config: ServiceConfig) -> Router {
    build_router(ApiContext::new(config))
}

/// Build router from pre-constructed `ApiContext`.
pub fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    Router::new()
        .route("/", get(endpoints::health::check))
        .route("/patients", get(endpoints::patients::list))
        .route("/patients/:id", get(endpoints::patients::detail))
        .route("/create_patients", post(endpoints::patients::create))
        .route("/update_patients/:id", put(endpoints::patients::update))
        .route("/delete_patients/:id", delete(endpoints::patients::remove))
        .route("/sort_patient", get(endpoints::patients::sorted))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::request_log::log_request))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
