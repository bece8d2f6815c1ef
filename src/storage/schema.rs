//! Database schema definitions
//!
//! The schema version lives in SQLite's `user_version` pragma. Bump
//! `SCHEMA_VERSION` whenever the shape of stored records changes and add the
//! statements that take the previous version forward to `upgrade_statements`.

/// Name of the single table holding file records
pub const TABLE_NAME: &str = "files";

/// Current schema version; 0 means "never initialized"
pub const SCHEMA_VERSION: i64 = 1;

/// SQL to create the files table
pub const CREATE_FILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    mime_type TEXT NOT NULL,
    size INTEGER NOT NULL,
    data BLOB NOT NULL,
    text_content TEXT,
    created TEXT NOT NULL
)
"#;

/// Column list shared by every record query
pub const RECORD_COLUMNS: &str = "id, name, mime_type, size, data, text_content, created";

/// Statements that bring a database at `from_version` up to `SCHEMA_VERSION`
pub fn upgrade_statements(from_version: i64) -> Vec<&'static str> {
    let mut stmts = Vec::new();
    if from_version < 1 {
        stmts.push(CREATE_FILES_TABLE);
    }
    stmts
}
