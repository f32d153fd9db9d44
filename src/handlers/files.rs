use crate::models::{UploadedFile, UploadedFiles};
use axum::{Extension, Json};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct PreUploadResponse {
    pub valid: bool,
}

/// Inner handler behind the upload middleware: by the time it runs, every
/// file has been validated and moved into storage. It echoes the manifest
/// the middleware attached.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = String, description = "multipart/form-data payload, one file per input", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files accepted and stored", body = HashMap<String, UploadedFile>),
        (status = 422, description = "Size or extension policy violation"),
        (status = 500, description = "Storage failure")
    ),
    tag = "files"
)]
pub async fn uploaded_files(
    Extension(files): Extension<UploadedFiles>,
) -> Json<HashMap<String, UploadedFile>> {
    Json(files.0)
}

/// Inner handler behind the pre-upload middleware; reached only when the
/// claimed manifest passed every check.
#[utoipa::path(
    post,
    path = "/pre-upload",
    request_body = Vec<crate::models::PreflightDescriptor>,
    responses(
        (status = 200, description = "Claimed manifest conforms to the policy", body = PreUploadResponse),
        (status = 422, description = "One or more policy violations, all reported")
    ),
    tag = "files"
)]
pub async fn pre_upload_accepted() -> Json<PreUploadResponse> {
    Json(PreUploadResponse { valid: true })
}
