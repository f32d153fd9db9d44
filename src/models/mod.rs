use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tempfile::NamedTempFile;
use utoipa::ToSchema;

/// One decoded multipart entry, in decode order.
#[derive(Debug)]
pub enum UploadPart {
    /// Plain form field
    Text { field_name: String, value: String },
    /// File field, spooled to a temp file by the decoder
    File(FilePart),
}

/// A file part as produced by the multipart decoder.
///
/// The temp file is owned by the part: dropping it deletes the spool, so a
/// temp file can never outlive the request that created it. Acceptance moves
/// it into permanent storage, rejection closes it explicitly.
#[derive(Debug)]
pub struct FilePart {
    /// Form field identifier; not unique across parts of an array-style field
    pub field_name: String,
    pub filename: String,
    /// Measured bytes written to the spool
    pub size: u64,
    pub tempfile: NamedTempFile,
}

/// Manifest entry for one accepted file.
///
/// Built fresh at placement time; the temp location is never part of it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadedFile {
    pub filename: String,
    pub size: u64,
    /// Percent-encoded path relative to the serving root
    pub url: String,
    /// Absolute filesystem location for server-side consumption
    pub uri: String,
}

/// Manifest attached to the request extensions after a successful upload,
/// keyed by form field name. Two file parts sharing a field name resolve
/// last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct UploadedFiles(pub HashMap<String, UploadedFile>);

/// One prospective file in a pre-upload check. Nothing is transferred;
/// name and claimed size are all the client sends.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreflightDescriptor {
    pub name: String,
    pub size: u64,
}

/// Pre-upload request body: either a JSON array of descriptors or an object
/// mapping arbitrary keys (e.g. input names) to descriptors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PreflightManifest {
    List(Vec<PreflightDescriptor>),
    Map(HashMap<String, PreflightDescriptor>),
}

impl PreflightManifest {
    pub fn descriptors(&self) -> Box<dyn Iterator<Item = &PreflightDescriptor> + '_> {
        match self {
            PreflightManifest::List(list) => Box::new(list.iter()),
            PreflightManifest::Map(map) => Box::new(map.values()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_manifest_accepts_array_and_object() {
        let list: PreflightManifest =
            serde_json::from_str(r#"[{"name": "a.png", "size": 10}]"#).unwrap();
        assert_eq!(list.descriptors().count(), 1);

        let map: PreflightManifest =
            serde_json::from_str(r#"{"avatar": {"name": "a.png", "size": 10}}"#).unwrap();
        assert_eq!(map.descriptors().count(), 1);
    }
}
