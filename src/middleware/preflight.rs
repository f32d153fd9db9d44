use crate::AppState;
use crate::error::UploadError;
use crate::models::PreflightManifest;
use crate::utils::validation::check_preflight;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;

/// Pre-upload validation middleware.
///
/// Validates a JSON manifest of prospective uploads against the same policy
/// the upload path enforces, without touching the filesystem. Violations are
/// reported exhaustively in a single rejection. On success the buffered body
/// is restored and the inner handler runs.
pub async fn pre_upload(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, UploadError> {
    let (parts, body) = req.into_parts();

    let bytes = body
        .collect()
        .await
        .map_err(|err| UploadError::Decode(err.to_string()))?
        .to_bytes();

    let manifest: PreflightManifest = serde_json::from_slice(&bytes)
        .map_err(|err| UploadError::InvalidManifest(err.to_string()))?;

    check_preflight(&manifest, &state.config)?;

    let req = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(req).await)
}
