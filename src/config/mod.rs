use std::env;
use std::path::PathBuf;

/// Upload policy configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Base storage directory for accepted files
    pub path: PathBuf,

    /// Allowed file extensions, lowercase, matched case-sensitively
    /// (empty = no restriction)
    pub extensions: Vec<String>,

    /// Maximum declared request size in bytes (None = unbounded).
    /// Checked against the content-length header, so boundary and part
    /// header overhead count toward it.
    pub max_size_bytes: Option<u64>,

    /// Maximum size of a single uploaded file in bytes (None = unbounded)
    pub max_file_size_bytes: Option<u64>,

    /// Resolve the storage path against the process working directory
    /// (default: true)
    pub use_current_dir: bool,
}

impl UploadConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            extensions: Vec::new(),
            max_size_bytes: None,
            max_file_size_bytes: None,
            use_current_dir: true,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::new(env::var("UPLOAD_PATH").unwrap_or_else(|_| "uploads".to_string()));

        config.extensions = env::var("UPLOAD_EXTENSIONS")
            .map(|v| {
                v.split(',')
                    .map(|ext| ext.trim().to_lowercase())
                    .filter(|ext| !ext.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        config.max_size_bytes = env::var("UPLOAD_MAX_SIZE_BYTES")
            .ok()
            .and_then(|v| v.parse().ok());

        config.max_file_size_bytes = env::var("UPLOAD_MAX_FILE_SIZE_BYTES")
            .ok()
            .and_then(|v| v.parse().ok());

        config.use_current_dir = env::var("UPLOAD_USE_CURRENT_DIR")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_are_unrestricted() {
        let config = UploadConfig::new("uploads");
        assert_eq!(config.path, PathBuf::from("uploads"));
        assert!(config.extensions.is_empty());
        assert_eq!(config.max_size_bytes, None);
        assert_eq!(config.max_file_size_bytes, None);
        assert!(config.use_current_dir);
    }

    #[test]
    fn test_struct_update_overrides() {
        let config = UploadConfig {
            extensions: vec!["png".to_string(), "jpg".to_string()],
            max_file_size_bytes: Some(1_000_000),
            ..UploadConfig::new("media")
        };
        assert_eq!(config.extensions.len(), 2);
        assert_eq!(config.max_file_size_bytes, Some(1_000_000));
        assert_eq!(config.max_size_bytes, None);
    }
}
