use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::models::{PreflightManifest, UploadPart};

/// Extension of a filename: the substring after the last `.`.
///
/// Matching is case-sensitive and nothing is normalized. A dot-free name
/// yields the whole name, which then simply fails the allow-list check.
pub fn file_extension(filename: &str) -> &str {
    filename.rsplit('.').next().unwrap_or(filename)
}

/// Validation pass over decoded parts, in decode order.
///
/// Runs only when an extension allow-list is configured; the first offending
/// file part wins. Extension and per-file size are alternatives guarding the
/// same rejection, so a file with a bad extension is reported as such even
/// when it is also oversized.
pub fn check_parts(parts: &[UploadPart], config: &UploadConfig) -> Result<(), UploadError> {
    if config.extensions.is_empty() {
        return Ok(());
    }

    for part in parts {
        let UploadPart::File(file) = part else {
            continue;
        };

        let extension = file_extension(&file.filename);
        if !config.extensions.iter().any(|allowed| allowed == extension) {
            return Err(UploadError::ExtensionNotAllowed {
                extension: extension.to_string(),
                filename: file.filename.clone(),
                allowed: config.extensions.join(","),
            });
        }

        if let Some(limit) = config.max_file_size_bytes {
            if file.size > limit {
                return Err(UploadError::FileSizeExceeded {
                    filename: file.filename.clone(),
                    size: file.size,
                    limit,
                });
            }
        }
    }

    Ok(())
}

/// Pre-upload validation over a claimed manifest.
///
/// Unlike the upload pass this one is exhaustive: every violation is
/// collected so the client can fix everything in one round trip. The
/// combined message is returned as a single rejection.
pub fn check_preflight(
    manifest: &PreflightManifest,
    config: &UploadConfig,
) -> Result<(), UploadError> {
    let mut violations: Vec<String> = Vec::new();
    let mut total_bytes: u64 = 0;

    for descriptor in manifest.descriptors() {
        total_bytes = total_bytes.saturating_add(descriptor.size);

        if let Some(limit) = config.max_file_size_bytes {
            if descriptor.size > limit {
                violations.push(
                    UploadError::FileSizeExceeded {
                        filename: descriptor.name.clone(),
                        size: descriptor.size,
                        limit,
                    }
                    .to_string(),
                );
            }
        }

        if !config.extensions.is_empty() {
            let extension = file_extension(&descriptor.name);
            if !config.extensions.iter().any(|allowed| allowed == extension) {
                violations.push(
                    UploadError::ExtensionNotAllowed {
                        extension: extension.to_string(),
                        filename: descriptor.name.clone(),
                        allowed: config.extensions.join(","),
                    }
                    .to_string(),
                );
            }
        }
    }

    if let Some(limit) = config.max_size_bytes {
        if total_bytes > limit {
            violations.push(
                UploadError::AggregateSizeExceeded {
                    size: total_bytes,
                    limit,
                }
                .to_string(),
            );
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(UploadError::Preflight(violations.join(" ")))
    }
}
