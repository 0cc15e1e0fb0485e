//! All-or-nothing replacement of a document on disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::FixPersistenceError;

/// Replaces the file at `path` with `contents`.
///
/// The new content is written to a temporary file in the same directory,
/// flushed to disk, and renamed over the original. An interruption at any
/// point leaves either the old or the new document, never a mix.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), FixPersistenceError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(|source| FixPersistenceError::CreateTemp {
        path: path.to_path_buf(),
        source,
    })?;

    let write = |temp: &mut NamedTempFile| -> std::io::Result<()> {
        temp.write_all(contents.as_bytes())?;
        if let Ok(metadata) = fs::metadata(path) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }
        temp.as_file().sync_all()
    };
    write(&mut temp).map_err(|source| FixPersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    temp.persist(path)
        .map_err(|err| FixPersistenceError::Replace {
            path: path.to_path_buf(),
            source: err.error,
        })?;

    tracing::info!(path = %path.display(), bytes = contents.len(), "rewrote document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2025-01-29.md");
        fs::write(&path, "old").unwrap();

        write_atomically(&path, "new content\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new content\n");
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "temporary file should be gone");
    }

    #[test]
    fn missing_directory_fails_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("note.md");

        let err = write_atomically(&path, "content").unwrap_err();
        assert!(matches!(err, FixPersistenceError::CreateTemp { .. }));
        assert_eq!(err.path(), path.as_path());
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn keeps_original_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomically(&path, "new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
