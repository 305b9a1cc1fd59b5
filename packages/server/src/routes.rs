use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/customers", customer_routes())
        .nest("/records", record_routes())
        .nest("/media", media_routes())
        .nest("/images", image_routes())
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::customer::list_customers).post(handlers::customer::create_customer),
        )
        .route(
            "/{id}",
            get(handlers::customer::get_customer)
                .put(handlers::customer::update_customer)
                .delete(handlers::customer::delete_customer),
        )
}

fn record_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::record::list_records).post(handlers::record::create_record),
        )
        .route(
            "/{id}",
            get(handlers::record::get_record)
                .put(handlers::record::update_record)
                .delete(handlers::record::delete_record),
        )
}

fn media_routes() -> Router<AppState> {
    let upload = Router::new()
        .route("/upload", post(handlers::media::upload_media))
        .layer(handlers::media::media_upload_body_limit());

    let rest = Router::new()
        .route("/{record_id}", get(handlers::media::list_media))
        .route(
            "/{record_id}/representative",
            put(handlers::media::set_representative),
        )
        .route("/{id}/delete", delete(handlers::media::delete_media));

    upload.merge(rest)
}

fn image_routes() -> Router<AppState> {
    let upload = Router::new()
        .route("/upload", post(handlers::image::upload_image))
        .layer(handlers::image::image_upload_body_limit());

    // The remainder of the path is the literal storage key.
    let fetch = Router::new().route("/{*key}", get(handlers::image::get_image));

    upload.merge(fetch)
}
