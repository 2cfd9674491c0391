//! Upload collaborator: where composited photos go once they are accepted.

use std::path::{Path, PathBuf};

use crate::foundation::error::{CaptionError, CaptionResult};

const MONTHS_ID: [&str; 12] = [
    "januari",
    "februari",
    "maret",
    "april",
    "mei",
    "juni",
    "juli",
    "agustus",
    "september",
    "oktober",
    "november",
    "desember",
];

/// Where an uploaded photo ended up.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredPhoto {
    /// Location the photo can be fetched from.
    pub url: String,
    /// Stable identifier; uploading the same bytes to the same folder yields the same id.
    pub public_id: String,
}

/// Destination for finished photos.
pub trait Uploader: Send + Sync {
    /// Store `bytes` under `folder` (a relative, `/`-separated path).
    fn upload(&self, bytes: &[u8], folder: &str) -> CaptionResult<StoredPhoto>;
}

/// Stores photos on the local filesystem as `<root>/<folder>/<content-hash>.jpg`.
#[derive(Clone, Debug)]
pub struct DirectoryUploader {
    root: PathBuf,
}

impl DirectoryUploader {
    /// Use `root` as the store, creating it if needed.
    pub fn new(root: impl AsRef<Path>) -> CaptionResult<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| {
            CaptionError::upload(format!("create store '{}': {e}", root.display()))
        })?;
        let root = std::fs::canonicalize(root).map_err(|e| {
            CaptionError::upload(format!("resolve store '{}': {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    /// Absolute store root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Uploader for DirectoryUploader {
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn upload(&self, bytes: &[u8], folder: &str) -> CaptionResult<StoredPhoto> {
        let folder = normalize_folder(folder)?;
        if bytes.is_empty() {
            return Err(CaptionError::upload("refusing to store an empty photo"));
        }

        let name = format!("{:016x}", xxhash_rust::xxh3::xxh3_64(bytes));
        let dir = self.root.join(&folder);
        std::fs::create_dir_all(&dir)
            .map_err(|e| CaptionError::upload(format!("create '{}': {e}", dir.display())))?;

        let path = dir.join(format!("{name}.jpg"));
        if !path.exists() {
            let tmp = dir.join(format!(".{name}.jpg.part"));
            std::fs::write(&tmp, bytes)
                .map_err(|e| CaptionError::upload(format!("write '{}': {e}", tmp.display())))?;
            std::fs::rename(&tmp, &path).map_err(|e| {
                let _ = std::fs::remove_file(&tmp);
                CaptionError::upload(format!("finalize '{}': {e}", path.display()))
            })?;
            tracing::debug!(path = %path.display(), "stored photo");
        } else {
            tracing::debug!(path = %path.display(), "photo already stored");
        }

        Ok(StoredPhoto {
            url: format!("file://{}", path.display()),
            public_id: format!("{folder}/{name}"),
        })
    }
}

/// Normalize an upload folder to a relative `/`-separated path.
///
/// Backslashes become `/`, empty and `.` segments are dropped. Absolute paths, `..`
/// segments and folders with nothing left are rejected.
pub fn normalize_folder(folder: &str) -> CaptionResult<String> {
    let s = folder.trim().replace('\\', "/");
    if s.starts_with('/') {
        return Err(CaptionError::validation("upload folder must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CaptionError::validation(
                "upload folder must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CaptionError::validation("upload folder must be non-empty"));
    }
    Ok(out.join("/"))
}

/// Monthly activity folder, e.g. `kegiatan/agustus-2025` for `(2025, 8)`.
pub fn activity_folder(year: i32, month: u32) -> CaptionResult<String> {
    let name = month
        .checked_sub(1)
        .and_then(|i| MONTHS_ID.get(i as usize))
        .ok_or_else(|| CaptionError::validation(format!("month {month} is outside 1..=12")))?;
    Ok(format!("kegiatan/{name}-{year}"))
}

#[cfg(test)]
#[path = "../../tests/unit/publish/mod.rs"]
mod tests;
