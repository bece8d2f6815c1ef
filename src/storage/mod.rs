//! Storage Layer - SQLite-backed persistence
//!
//! One database, one table:
//! - files(id, name, mime_type, size, data, text_content, created)

pub mod gateway;
pub mod schema;
pub mod sqlite;

pub use gateway::{StoreGateway, StoreLocation};
pub use sqlite::{SqliteStore, VaultStats};
