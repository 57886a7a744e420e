// File delivery for exports and print reports
use crate::error::ExportError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Host mechanism that turns generated bytes into a saved file.
pub trait Downloads: Send + Sync {
    fn save(&self, filename: &str, mime_type: &str, contents: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Saves downloads into one directory. Contents are staged in a temporary file
/// next to the target and persisted under the requested name, so a failed
/// write never leaves a partial file behind.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloads for DirectoryDownloads {
    fn save(&self, filename: &str, mime_type: &str, contents: &[u8]) -> Result<PathBuf, ExportError> {
        let name = validate_filename(filename)?;
        fs::create_dir_all(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(contents)?;
        staged.flush()?;

        let target = self.dir.join(name);
        // Dropping the handle here releases the temporary file
        staged.persist(&target).map_err(|e| ExportError::from(e.error))?;

        tracing::debug!(path = %target.display(), mime_type, bytes = contents.len(), "Saved download");
        Ok(target)
    }
}

// A download name is a bare file name: no directories, no traversal.
fn validate_filename(filename: &str) -> Result<&str, ExportError> {
    let name = filename.trim();
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(ExportError::InvalidFilename(filename.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let downloads = DirectoryDownloads::new(dir.path());
        let path = downloads.save("report.csv", "text/csv", b"a,b\n").unwrap();
        assert_eq!(path, dir.path().join("report.csv"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");
        // Only the persisted file remains
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("2026");
        let downloads = DirectoryDownloads::new(&nested);
        let path = downloads.save("data.json", "application/json", b"[]").unwrap();
        assert!(path.starts_with(&nested));
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let downloads = DirectoryDownloads::new(dir.path());
        downloads.save("f.csv", "text/csv", b"old").unwrap();
        let path = downloads.save("f.csv", "text/csv", b"new").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "new");
    }

    #[test]
    fn test_rejects_path_like_filenames() {
        for bad in ["", "  ", ".", "..", "../escape.csv", "sub/dir.csv", "c:\\x.csv"] {
            let result = validate_filename(bad);
            assert!(
                matches!(result, Err(ExportError::InvalidFilename(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
        assert_eq!(validate_filename(" budget.csv ").unwrap(), "budget.csv");
        assert_eq!(validate_filename("budget..v2.csv").unwrap(), "budget..v2.csv");
    }
}
