//! Product image uploads.
//!
//! Images are written into the configured upload directory under a
//! sanitized version of the client-supplied filename. An existing file with
//! the same name is overwritten.

use std::io;
use std::path::{Path, PathBuf};

/// A file written by [`save_image`].
#[derive(Debug)]
pub struct StoredUpload {
    /// Sanitized filename, relative to the upload directory.
    pub filename: String,
    path: PathBuf,
    replaced: bool,
}

impl StoredUpload {
    /// Undo the write after a later step failed.
    ///
    /// A file that overwrote an earlier upload is left in place, since the
    /// earlier content is gone either way and another product may reference
    /// the name.
    pub async fn discard(self) {
        if self.replaced {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove orphaned upload");
        }
    }
}

/// Reduce a client-supplied filename to a safe, flat name.
///
/// Non-ASCII characters are dropped, path separators become spaces, runs of
/// whitespace become a single `_`, anything outside `[A-Za-z0-9_.-]` is
/// removed, and leading/trailing `.` and `_` are stripped. Returns `None`
/// when nothing usable is left.
#[must_use]
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let ascii: String = raw
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_ascii_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Write `bytes` to `dir/filename`, creating `dir` if needed.
///
/// `filename` must already be sanitized.
///
/// # Errors
///
/// Returns any I/O error from creating the directory or writing the file.
pub async fn save_image(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<StoredUpload> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(filename);
    let replaced = tokio::fs::try_exists(&path).await?;
    tokio::fs::write(&path, bytes).await?;

    tracing::debug!(path = %path.display(), size = bytes.len(), replaced, "Stored product image");

    Ok(StoredUpload {
        filename: filename.to_owned(),
        path,
        replaced,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_names_unchanged() {
        assert_eq!(sanitize_filename("rose.jpg").as_deref(), Some("rose.jpg"));
        assert_eq!(
            sanitize_filename("Oliv-Noir_2.png").as_deref(),
            Some("Oliv-Noir_2.png")
        );
    }

    #[test]
    fn test_sanitize_strips_paths() {
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("etc_passwd")
        );
        assert_eq!(
            sanitize_filename(r"C:\Users\me\rose.jpg").as_deref(),
            Some("C_Users_me_rose.jpg")
        );
    }

    #[test]
    fn test_sanitize_whitespace_and_symbols() {
        assert_eq!(
            sanitize_filename("my  summer\tscent!.jpg").as_deref(),
            Some("my_summer_scent.jpg")
        );
        assert_eq!(sanitize_filename("fleur€.jpg").as_deref(), Some("fleur.jpg"));
    }

    #[test]
    fn test_sanitize_rejects_empty_results() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename("€€€"), None);
        assert_eq!(sanitize_filename("/"), None);
    }

    #[tokio::test]
    async fn test_save_and_discard_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("static");

        let stored = save_image(&upload_dir, "rose.jpg", b"jpeg").await.unwrap();
        let path = upload_dir.join("rose.jpg");
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");

        stored.discard().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_discard_keeps_replaced_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rose.jpg"), b"old").unwrap();

        let stored = save_image(dir.path(), "rose.jpg", b"new").await.unwrap();
        stored.discard().await;

        assert_eq!(std::fs::read(dir.path().join("rose.jpg")).unwrap(), b"new");
    }
}
