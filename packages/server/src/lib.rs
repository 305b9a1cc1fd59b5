pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon Karte API",
        version = "1.0.0",
        description = "Customer, treatment record, and media management for a beauty salon"
    ),
    paths(
        handlers::health::health,
        handlers::customer::list_customers,
        handlers::customer::get_customer,
        handlers::customer::create_customer,
        handlers::customer::update_customer,
        handlers::customer::delete_customer,
        handlers::record::list_records,
        handlers::record::get_record,
        handlers::record::create_record,
        handlers::record::update_record,
        handlers::record::delete_record,
        handlers::media::upload_media,
        handlers::media::list_media,
        handlers::media::set_representative,
        handlers::media::delete_media,
        handlers::image::upload_image,
        handlers::image::get_image,
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Customers", description = "Customer CRUD with record aggregates"),
        (name = "Records", description = "Treatment record CRUD"),
        (name = "Media", description = "Per-record photo and video collection"),
        (name = "Legacy Images", description = "Single-slot image upload and blob retrieval"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
}

/// An empty origin list means any origin is allowed.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));

    if config.allow_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allow_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
