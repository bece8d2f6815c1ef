//! Import source - collects files from disk for `FileVault::add`
//!
//! Plain file arguments are taken as-is. Directories are walked only when
//! recursion is requested, honouring `.gitignore`/`.ignore` files and
//! skipping hidden entries.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use crate::record::FileMetadata;
use crate::{Error, Result};

/// A file read from disk, ready to be added to the vault
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub path: PathBuf,
    pub data: Vec<u8>,
    pub meta: FileMetadata,
}

impl ImportFile {
    /// Read a file and derive its metadata
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let meta = FileMetadata::for_path(path, data.len() as u64);
        Ok(Self {
            path: path.to_path_buf(),
            data,
            meta,
        })
    }
}

/// Expand the given paths into the list of files to import.
///
/// Order follows the arguments; files inside a directory are sorted by path.
pub fn collect_import_paths(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            if !recursive {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} is a directory (use --recursive)", path.display()),
                )));
            }
            files.extend(walk_directory(path));
        } else {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
    }

    Ok(files)
}

fn walk_directory(root: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .collect();

    found.sort();
    found
}
