//! Store gateway - lazily opened, shared connection handle
//!
//! `ensure_open` opens the backing store at most once per gateway. Concurrent
//! first callers wait on the same initialization; a failed open leaves the
//! gateway empty so a later call can retry.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;
use crate::{Error, Result};
use super::sqlite::SqliteStore;

/// Where the backing store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file on disk; parent directories are created on open
    File(PathBuf),
    /// A private in-memory database, gone when the gateway is dropped
    Memory,
}

impl StoreLocation {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        StoreLocation::File(path.into())
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            StoreLocation::File(path) => Some(path),
            StoreLocation::Memory => None,
        }
    }
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreLocation::File(path) => write!(f, "{}", path.display()),
            StoreLocation::Memory => write!(f, ":memory:"),
        }
    }
}

/// Owns the lifecycle of the single store connection
pub struct StoreGateway {
    location: StoreLocation,
    store: OnceCell<Arc<SqliteStore>>,
    open_attempts: AtomicUsize,
}

impl StoreGateway {
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            store: OnceCell::new(),
            open_attempts: AtomicUsize::new(0),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Whether a live connection is already held
    pub fn is_open(&self) -> bool {
        self.store.initialized()
    }

    /// Return the live store, opening it on first use
    pub async fn ensure_open(&self) -> Result<Arc<SqliteStore>> {
        let store = self
            .store
            .get_or_try_init(|| async {
                self.open_attempts.fetch_add(1, Ordering::SeqCst);
                let location = self.location.clone();
                tracing::debug!("Opening store at {}", location);

                let store = tokio::task::spawn_blocking(move || open_location(&location))
                    .await
                    .map_err(|e| Error::StoreUnavailable(format!("open task failed: {}", e)))??;

                if store.schema_created() {
                    tracing::info!("Created vault schema at {}", self.location);
                }
                Ok::<_, Error>(Arc::new(store))
            })
            .await;

        match store {
            Ok(store) => Ok(Arc::clone(store)),
            Err(e) => {
                tracing::error!("Store at {} unavailable: {}", self.location, e);
                Err(e)
            }
        }
    }
}

fn open_location(location: &StoreLocation) -> Result<SqliteStore> {
    match location {
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        Error::StoreUnavailable(format!(
                            "cannot create {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
            }
            SqliteStore::open(path)
        }
        StoreLocation::Memory => SqliteStore::open_in_memory(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_open_is_idempotent() {
        let gateway = StoreGateway::new(StoreLocation::Memory);
        assert!(!gateway.is_open());

        let first = gateway.ensure_open().await.unwrap();
        let second = gateway.ensure_open().await.unwrap();

        assert!(gateway.is_open());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(gateway.open_attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_open_opens_once() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(StoreGateway::new(StoreLocation::file(
            dir.path().join("vault.db"),
        )));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move { gateway.ensure_open().await }));
        }

        let mut stores = Vec::new();
        for handle in handles {
            stores.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(gateway.open_attempts.load(Ordering::SeqCst), 1);
        assert!(stores.iter().all(|s| Arc::ptr_eq(s, &stores[0])));
        assert!(stores[0].schema_created());
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("vault.db");
        let gateway = StoreGateway::new(StoreLocation::file(&path));

        gateway.ensure_open().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_failed_open_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let gateway = StoreGateway::new(StoreLocation::file(blocker.join("vault.db")));

        let err = gateway.ensure_open().await.err().unwrap();
        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert!(!gateway.is_open());

        // Clearing the obstacle lets the next call succeed
        std::fs::remove_file(&blocker).unwrap();
        gateway.ensure_open().await.unwrap();
        assert!(gateway.is_open());
        assert_eq!(gateway.open_attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_location_display() {
        assert_eq!(StoreLocation::Memory.to_string(), ":memory:");
        assert_eq!(StoreLocation::file("a/b.db").path(), Some(Path::new("a/b.db")));
    }
}
