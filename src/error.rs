use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything that can terminate an upload or pre-upload request.
///
/// Validation failures are client faults and surface as 422 with the full
/// message; I/O failures during placement are server faults and surface as a
/// generic 500, with details kept in the logs.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Maximum total upload size exceeded, size: {size} bytes, maximum: {limit} bytes.")]
    AggregateSizeExceeded { size: u64, limit: u64 },

    #[error(
        "Maximum file upload size exceeded, file: {filename}, size: {size} bytes, maximum: {limit} bytes."
    )]
    FileSizeExceeded {
        filename: String,
        size: u64,
        limit: u64,
    },

    #[error(
        "The file extension is not allowed ({extension} in {filename}). Allowed extensions: {allowed}."
    )]
    ExtensionNotAllowed {
        extension: String,
        filename: String,
        allowed: String,
    },

    #[error(
        "Invalid upload data, the request must contain a form body with enctype=\"multipart/form-data\" and inputs with type=\"file\". Inputs with the multiple attribute are not supported; submit a separate field per file instead."
    )]
    InvalidUploadEncoding,

    #[error("Failed to read upload data: {0}")]
    Decode(String),

    #[error("Invalid pre-upload manifest: {0}")]
    InvalidManifest(String),

    #[error("{0}")]
    Preflight(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::Io(err) => {
                tracing::error!("upload storage failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
                    .into_response()
            }
            err => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_carry_limits() {
        let err = UploadError::AggregateSizeExceeded {
            size: 10_000_000,
            limit: 5_000_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("10000000"));
        assert!(msg.contains("5000000"));

        let err = UploadError::ExtensionNotAllowed {
            extension: "exe".to_string(),
            filename: "virus.exe".to_string(),
            allowed: "png,jpg".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exe in virus.exe"));
        assert!(msg.contains("png,jpg"));
    }
}
