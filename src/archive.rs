//! Export of stored records back to the filesystem
//!
//! - Single records are written as plain files named after the record
//! - The whole vault is packed into one uncompressed tar archive
//! - Archive entries are ordered by ascending id with mtimes from `created`

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tar::{Builder, Header};
use crate::record::FileRecord;
use crate::{Error, Result};

/// Default file name for bulk exports
pub const DEFAULT_ARCHIVE_NAME: &str = "backup.tar";

/// A filesystem-safe name for a record: no path separators, never `.`/`..`
pub fn sanitize_file_name(record: &FileRecord) -> String {
    let cleaned: String = record
        .display_name()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "." | ".." => format!("file-{}", record.id),
        _ => cleaned,
    }
}

/// Entry names for `records`, in the same order.
///
/// The first record claiming a name keeps it; later ones are prefixed with
/// their id.
pub fn archive_entry_names(records: &[&FileRecord]) -> Vec<String> {
    let mut taken = HashSet::new();
    records
        .iter()
        .map(|record| {
            let mut name = sanitize_file_name(record);
            while taken.contains(&name) {
                name = format!("{}_{}", record.id, name);
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

/// Write one record's bytes into `dir`, returning the written path
pub fn export_record(record: &FileRecord, dir: &Path, force: bool) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(sanitize_file_name(record));
    if path.exists() && !force {
        return Err(Error::Export(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    fs::write(&path, &record.data)?;
    tracing::debug!("Exported #{} to {}", record.id, path.display());
    Ok(path)
}

/// Pack `records` into a tar archive at `output_path`.
///
/// Returns the number of entries written. A partially written archive is
/// removed on failure.
pub fn create_tar_archive(records: &[FileRecord], output_path: &Path) -> Result<usize> {
    let result = write_tar_archive(records, output_path);
    if result.is_err() {
        cleanup_partial_archive(output_path);
    }
    result
}

fn write_tar_archive(records: &[FileRecord], output_path: &Path) -> Result<usize> {
    let file = File::create(output_path).map_err(|e| {
        Error::Export(format!(
            "Failed to create archive file {}: {}",
            output_path.display(),
            e
        ))
    })?;
    let mut builder = Builder::new(BufWriter::new(file));

    let mut ordered: Vec<&FileRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.id);
    let names = archive_entry_names(&ordered);

    for (record, name) in ordered.iter().zip(&names) {
        let mut header = Header::new_gnu();
        header.set_size(record.data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(record.created.timestamp().max(0) as u64);
        header.set_cksum();

        builder
            .append_data(&mut header, name, record.data.as_slice())
            .map_err(|e| Error::Export(format!("Failed to add {} to archive: {}", name, e)))?;
    }

    let writer = builder
        .into_inner()
        .map_err(|e| Error::Export(format!("Failed to finish archive: {}", e)))?;
    let file = writer
        .into_inner()
        .map_err(|e| Error::Export(format!("Failed to flush archive buffer: {}", e)))?;
    file.sync_all()?;

    tracing::debug!("Wrote {} entries to {}", names.len(), output_path.display());
    Ok(names.len())
}

/// Delete a partial archive if it exists
pub fn cleanup_partial_archive(archive_path: &Path) {
    if archive_path.exists() {
        let _ = fs::remove_file(archive_path);
    }
}
