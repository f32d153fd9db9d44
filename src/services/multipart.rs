use crate::error::UploadError;
use crate::models::{FilePart, UploadPart};
use axum::extract::Multipart;
use std::io::Write;
use tempfile::NamedTempFile;

/// Drains a multipart stream into an ordered list of parts.
///
/// File fields are spooled to temp files and their sizes measured along the
/// way; plain fields are read as text. If the stream fails mid-decode the
/// already-spooled temp files are dropped, which deletes them.
pub async fn read_parts(mut multipart: Multipart) -> Result<Vec<UploadPart>, UploadError> {
    let mut parts = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| UploadError::Decode(err.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let mut tempfile = NamedTempFile::new()?;
                let mut size: u64 = 0;

                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|err| UploadError::Decode(err.to_string()))?
                {
                    tempfile.as_file_mut().write_all(&chunk)?;
                    size += chunk.len() as u64;
                }

                tracing::debug!(field = %field_name, file = %filename, size, "spooled file part");
                parts.push(UploadPart::File(FilePart {
                    field_name,
                    filename,
                    size,
                    tempfile,
                }));
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| UploadError::Decode(err.to_string()))?;
                parts.push(UploadPart::Text { field_name, value });
            }
        }
    }

    Ok(parts)
}

/// Deletes the temp file of every file part.
///
/// Called on the rejection path so no spool outlives the request. Cleanup is
/// best-effort: a failed removal is logged and must not mask the validation
/// error that triggered it.
pub fn discard_parts(parts: Vec<UploadPart>) {
    for part in parts {
        if let UploadPart::File(file) = part {
            if let Err(err) = file.tempfile.close() {
                tracing::warn!(file = %file.filename, "failed to remove temp file: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discard_parts_removes_every_spool() {
        let mut paths = Vec::new();
        let mut parts = Vec::new();

        for i in 0..3 {
            let mut tempfile = NamedTempFile::new().unwrap();
            tempfile.write_all(b"spooled").unwrap();
            paths.push(tempfile.path().to_path_buf());
            parts.push(UploadPart::File(FilePart {
                field_name: format!("file{i}"),
                filename: format!("f{i}.bin"),
                size: 7,
                tempfile,
            }));
        }
        parts.push(UploadPart::Text {
            field_name: "comment".to_string(),
            value: "hello".to_string(),
        });

        discard_parts(parts);

        for path in paths {
            assert!(!path.exists(), "spool {} should be deleted", path.display());
        }
    }
}
