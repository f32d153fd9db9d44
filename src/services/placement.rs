use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::models::{FilePart, UploadedFile};
use chrono::{DateTime, Datelike, Local, Timelike};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Characters encoded in the public `url`: ASCII that is unsafe in a URI
/// path while `/` and the rest of the path structure pass through.
const URL_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'\\');

/// Destination directory for one accepted file.
pub struct AllocatedDir {
    /// Time-bucketed path under the storage base, used for the public URL
    pub relative: String,
    /// Filesystem location the file is moved into
    pub absolute: PathBuf,
}

/// Computes a unique destination directory of the form
/// `base/year/month/day/hour/minute/second/uuid`.
///
/// The random identifier is what guarantees uniqueness; the timestamp
/// buckets merely narrow the collision scope to two identical identifiers
/// generated within the same second.
pub fn allocate(config: &UploadConfig, now: DateTime<Local>, id: Uuid) -> io::Result<AllocatedDir> {
    let relative = format!(
        "{}/{}/{}/{}/{}/{}/{}/{}",
        config.path.display(),
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        id
    );

    let absolute = if config.use_current_dir {
        env::current_dir()?.join(&relative)
    } else {
        PathBuf::from(&relative)
    };

    Ok(AllocatedDir { relative, absolute })
}

/// Moves one accepted file into permanent storage and builds its manifest
/// entry.
///
/// The destination directory is created idempotently. The original filename
/// is preserved verbatim in the final path per the layout contract; callers
/// that accept hostile clients should pair the policy with an allow-list,
/// since a crafted filename can point outside the allocated directory.
pub async fn place(config: &UploadConfig, file: FilePart) -> Result<UploadedFile, UploadError> {
    let dir = allocate(config, Local::now(), Uuid::new_v4())?;
    tokio::fs::create_dir_all(&dir.absolute).await?;

    let destination = dir.absolute.join(&file.filename);
    move_into(file.tempfile, &destination)?;

    let url = utf8_percent_encode(
        &format!("{}/{}", dir.relative, file.filename),
        URL_ENCODE_SET,
    )
    .to_string();

    tracing::info!(file = %file.filename, size = file.size, dest = %destination.display(), "stored upload");

    Ok(UploadedFile {
        filename: file.filename,
        size: file.size,
        url,
        uri: destination.display().to_string(),
    })
}

/// Relocates a spool into its destination. `persist` renames, which cannot
/// cross filesystems; on failure the spool is copied and then closed.
fn move_into(tempfile: NamedTempFile, destination: &Path) -> io::Result<()> {
    match tempfile.persist(destination) {
        Ok(_) => Ok(()),
        Err(err) => {
            let spool = err.file;
            std::fs::copy(spool.path(), destination)?;
            spool.close()
        }
    }
}
