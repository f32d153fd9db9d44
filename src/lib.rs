pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::UploadConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::files::uploaded_files,
        handlers::files::pre_upload_accepted,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::UploadedFile,
            models::PreflightDescriptor,
            handlers::files::PreUploadResponse,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "files", description = "Upload validation endpoints"),
        (name = "system", description = "Service status endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: UploadConfig,
}

pub fn create_app(state: AppState) -> Router {
    // The policy governs body size; axum's 2 MB default must not cap the
    // decoder below it.
    let body_limit = match state.config.max_size_bytes {
        Some(limit) => DefaultBodyLimit::max(limit as usize),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/upload",
            post(handlers::files::uploaded_files)
                .layer::<_, std::convert::Infallible>(from_fn_with_state(
                    state.clone(),
                    middleware::upload::upload,
                ))
                .layer(body_limit),
        )
        .route(
            "/pre-upload",
            post(handlers::files::pre_upload_accepted).layer(from_fn_with_state(
                state.clone(),
                middleware::preflight::pre_upload,
            )),
        )
        .with_state(state)
}
