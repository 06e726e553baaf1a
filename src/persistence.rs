use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::errors::StoreError;
use crate::state::article::Article;
use crate::state::store::ArticleMap;

/// Read the snapshot at `path`.
///
/// Returns `Ok(None)` when the file does not exist. The whole file is
/// decoded before anything is returned, so a corrupt snapshot never
/// yields a partial map.
pub fn read_snapshot(path: &Path) -> Result<Option<ArticleMap>, StoreError> {
    let data = match fs::read(path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let map = serde_json::from_slice::<ArticleMap>(&data).map_err(|source| {
        StoreError::Decode {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(Some(map))
}

/// Encode `articles` as a two-space indented JSON object keyed by id.
///
/// Keys are written in sorted order so consecutive snapshots diff cleanly.
pub fn encode_snapshot(articles: &ArticleMap) -> Result<Vec<u8>, StoreError> {
    let sorted: BTreeMap<&str, &Article> =
        articles.iter().map(|(k, v)| (k.as_str(), v)).collect();

    let mut buf = serde_json::to_vec_pretty(&sorted).map_err(StoreError::Encode)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Overwrite the snapshot at `path` with `articles`.
///
/// The parent directory is created if needed.
pub fn write_snapshot(path: &Path, articles: &ArticleMap) -> Result<(), StoreError> {
    let buf = encode_snapshot(articles)?;

    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(&buf).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    Ok(())
}
