//! Scratch pad - a single persisted text buffer
//!
//! Lives beside the vault database as `scratch.txt` and is independent of
//! the record store: saving it never touches a `FileRecord`.

use std::fs;
use std::path::{Path, PathBuf};
use crate::Result;

/// File name of the scratch buffer
pub const SCRATCH_FILE_NAME: &str = "scratch.txt";

/// Default file name when exporting the scratch buffer
pub const DEFAULT_EXPORT_NAME: &str = "note.txt";

pub struct ScratchPad {
    path: PathBuf,
}

impl ScratchPad {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Scratch pad stored next to the given database file
    pub fn beside_database(db_path: &Path) -> Self {
        let dir = db_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(dir.join(SCRATCH_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the buffer contents
    pub fn save(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, text)?;
        Ok(())
    }

    /// Current contents, or `None` if nothing was ever saved
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Copy the buffer to `target`, returning whether there was anything to copy
    pub fn export(&self, target: &Path) -> Result<bool> {
        match self.load()? {
            Some(text) => {
                fs::write(target, text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_before_save_is_none() {
        let dir = TempDir::new().unwrap();
        let pad = ScratchPad::new(dir.path().join(SCRATCH_FILE_NAME));
        assert!(pad.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let pad = ScratchPad::new(dir.path().join("nested").join(SCRATCH_FILE_NAME));
        pad.save("first draft").unwrap();
        pad.save("second draft").unwrap();
        assert_eq!(pad.load().unwrap().as_deref(), Some("second draft"));
    }

    #[test]
    fn test_export() {
        let dir = TempDir::new().unwrap();
        let pad = ScratchPad::new(dir.path().join(SCRATCH_FILE_NAME));
        let target = dir.path().join(DEFAULT_EXPORT_NAME);

        assert!(!pad.export(&target).unwrap());
        assert!(!target.exists());

        pad.save("exported").unwrap();
        assert!(pad.export(&target).unwrap());
        assert_eq!(fs::read_to_string(&target).unwrap(), "exported");
    }

    #[test]
    fn test_beside_database() {
        let pad = ScratchPad::beside_database(Path::new(".filevault/vault.db"));
        assert_eq!(pad.path(), Path::new(".filevault/scratch.txt"));

        let pad = ScratchPad::beside_database(Path::new("vault.db"));
        assert_eq!(pad.path(), Path::new("./scratch.txt"));
    }
}
