use crate::AppState;
use crate::error::UploadError;
use crate::models::{UploadPart, UploadedFiles};
use crate::services::{multipart, placement};
use crate::utils::validation::check_parts;
use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

/// Upload validation middleware.
///
/// Gates the request on the declared content-length, negotiates the
/// multipart boundary, decodes the body into parts, runs the validation
/// pass, and on acceptance relocates every file into permanent storage
/// before handing the request to the inner handler with the manifest
/// attached. Every rejection returns early; the inner handler is
/// unreachable after a violation.
pub async fn upload(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, UploadError> {
    let config = &state.config;

    // The declared size covers the whole body, boundary and part header
    // overhead included. A missing or unparsable header passes the gate.
    if let (Some(declared), Some(limit)) = (declared_content_length(req.headers()), config.max_size_bytes)
    {
        if declared > limit {
            return Err(UploadError::AggregateSizeExceeded {
                size: declared,
                limit,
            });
        }
    }

    multipart_boundary(req.headers()).ok_or(UploadError::InvalidUploadEncoding)?;

    // The decoder consumes the request; keep what the inner handler needs.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let headers = req.headers().clone();

    let decoder = Multipart::from_request(req, &())
        .await
        .map_err(|_| UploadError::InvalidUploadEncoding)?;
    let parts = multipart::read_parts(decoder).await?;

    if let Err(rejection) = check_parts(&parts, config) {
        multipart::discard_parts(parts);
        return Err(rejection);
    }

    let mut uploaded = UploadedFiles::default();
    for part in parts {
        if let UploadPart::File(file) = part {
            let field_name = file.field_name.clone();
            let entry = placement::place(config, file).await?;
            uploaded.0.insert(field_name, entry);
        }
    }

    let mut inner = Request::new(Body::empty());
    *inner.method_mut() = method;
    *inner.uri_mut() = uri;
    *inner.version_mut() = version;
    *inner.headers_mut() = headers;
    inner.extensions_mut().insert(uploaded);

    Ok(next.run(inner).await)
}

fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Boundary token from a `multipart/form-data; boundary=...` content-type.
fn multipart_boundary(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let mime: mime::Mime = content_type.parse().ok()?;

    if mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA {
        mime.get_param(mime::BOUNDARY)
            .map(|boundary| boundary.as_str().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_content_type(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_multipart_boundary_extraction() {
        let headers = headers_with_content_type("multipart/form-data; boundary=xYz123");
        assert_eq!(multipart_boundary(&headers).as_deref(), Some("xYz123"));
    }

    #[test]
    fn test_multipart_boundary_missing_parameter() {
        let headers = headers_with_content_type("multipart/form-data");
        assert_eq!(multipart_boundary(&headers), None);
    }

    #[test]
    fn test_multipart_boundary_wrong_content_type() {
        let headers = headers_with_content_type("application/json");
        assert_eq!(multipart_boundary(&headers), None);

        assert_eq!(multipart_boundary(&HeaderMap::new()), None);
    }

    #[test]
    fn test_declared_content_length() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12345"));
        assert_eq!(declared_content_length(&headers), Some(12345));

        headers.insert(
            header::CONTENT_LENGTH,
            HeaderValue::from_static("not-a-number"),
        );
        assert_eq!(declared_content_length(&headers), None);
    }
}
