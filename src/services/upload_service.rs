use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::errors::UploadError;

/// Reduce a client-supplied filename to its last path component.
///
/// Both `/` and `\` count as separators. Empty names, `.` and `..` are
/// rejected.
pub fn sanitize_filename(name: &str) -> Result<String, UploadError> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match base {
        "" | "." | ".." => Err(UploadError::InvalidFilename),
        b if b.chars().any(char::is_control) => Err(UploadError::InvalidFilename),
        b => Ok(b.to_string()),
    }
}

/// On-disk location of an upload: `<root>/<id>/<filename>`.
pub fn upload_path(root: &Path, id: &str, filename: &str) -> PathBuf {
    root.join(id).join(filename)
}

/// Public URL the static file server exposes an upload under.
///
/// Both segments are percent-encoded; the on-disk name stays as given.
pub fn upload_url(id: &str, filename: &str) -> String {
    format!(
        "/uploads/{}/{}",
        urlencoding::encode(id),
        urlencoding::encode(filename)
    )
}

/// Store `bytes` under the article's upload directory and return its URL.
///
/// `id` must already be validated; `filename` is sanitized here.
pub async fn save_upload(
    root: &Path,
    id: &str,
    filename: &str,
    bytes: &[u8],
) -> Result<String, UploadError> {
    let filename = sanitize_filename(filename)?;
    let path = upload_path(root, id, &filename);

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }
    fs::write(&path, bytes).await?;

    info!(id, file = %filename, size = bytes.len(), "upload stored");
    Ok(upload_url(id, &filename))
}
