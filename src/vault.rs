//! Vault operations - the async CRUD surface consumers call
//!
//! Each operation awaits `StoreGateway::ensure_open` and then runs a single
//! transaction on the blocking pool. There are no retries; failures reach
//! the caller as `Error` values.

use std::sync::Arc;
use std::path::Path;
use crate::codec::TextClassifier;
use crate::record::{FileMetadata, FileRecord};
use crate::storage::{SqliteStore, StoreGateway, StoreLocation, VaultStats};
use crate::{Error, Result};

/// Which failure class a blocking task failure belongs to
#[derive(Clone, Copy)]
enum OpKind {
    Read,
    Write,
}

impl OpKind {
    fn join_error(self, op: &str, e: tokio::task::JoinError) -> Error {
        let msg = format!("{} task failed: {}", op, e);
        match self {
            OpKind::Read => Error::ReadFailed(msg),
            OpKind::Write => Error::WriteFailed(msg),
        }
    }
}

/// A local file vault backed by one single-table store
pub struct FileVault {
    gateway: StoreGateway,
    classifier: TextClassifier,
}

impl FileVault {
    pub fn new(gateway: StoreGateway, classifier: TextClassifier) -> Self {
        Self { gateway, classifier }
    }

    /// Vault over a database file, with the default classifier
    pub fn open_path(path: &Path) -> Self {
        Self::new(
            StoreGateway::new(StoreLocation::file(path)),
            TextClassifier::default(),
        )
    }

    /// Vault over a private in-memory database
    pub fn in_memory() -> Self {
        Self::new(StoreGateway::new(StoreLocation::Memory), TextClassifier::default())
    }

    pub fn gateway(&self) -> &StoreGateway {
        &self.gateway
    }

    pub fn classifier(&self) -> TextClassifier {
        self.classifier
    }

    /// Open the backing store if it is not open yet
    pub async fn ensure_open(&self) -> Result<Arc<SqliteStore>> {
        self.gateway.ensure_open().await
    }

    async fn run<T, F>(&self, op: &'static str, kind: OpKind, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteStore) -> Result<T> + Send + 'static,
    {
        let store = self.gateway.ensure_open().await?;
        tokio::task::spawn_blocking(move || f(&*store))
            .await
            .map_err(|e| kind.join_error(op, e))?
    }

    /// Classify and insert a file, returning its assigned id.
    ///
    /// On failure nothing was persisted.
    pub async fn add(&self, data: Vec<u8>, meta: FileMetadata) -> Result<i64> {
        let classifier = self.classifier;
        let name = meta.name.clone();
        let id = self
            .run("add", OpKind::Write, move |store| {
                let record = classifier.encode(data, meta);
                store.insert(&record)
            })
            .await?;
        tracing::debug!("Added {:?} as #{}", name, id);
        Ok(id)
    }

    /// All records, most recently added first
    pub async fn list_all(&self) -> Result<Vec<FileRecord>> {
        let mut records = self.run("list", OpKind::Read, |store| store.fetch_all()).await?;
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }

    /// The record with `id`, or `None` if there is none
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        self.run("get", OpKind::Read, move |store| store.fetch(id)).await
    }

    /// Remove the record with `id`; a missing id is not an error
    pub async fn delete_by_id(&self, id: i64) -> Result<()> {
        let removed = self
            .run("delete", OpKind::Write, move |store| store.remove(id))
            .await?;
        if removed {
            tracing::debug!("Deleted #{}", id);
        } else {
            tracing::debug!("Delete of #{} was a no-op", id);
        }
        Ok(())
    }

    /// Remove every record atomically
    pub async fn clear_all(&self) -> Result<()> {
        let removed = self.run("clear", OpKind::Write, |store| store.clear()).await?;
        tracing::info!("Cleared {} record(s)", removed);
        Ok(())
    }

    /// Counts and sizes of what is stored
    pub async fn stats(&self) -> Result<VaultStats> {
        self.run("stats", OpKind::Read, |store| store.stats()).await
    }
}
