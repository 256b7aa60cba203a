use serde_json::{json, Value};
use thiserror::Error;

// === StoreError ===

/// Errors raised by the navigation store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("Navigation database error: {0}")]
    Database(String),
    /// Menu with the given ID was not found.
    #[error("Menu not found: {0}")]
    MenuNotFound(i64),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

// === ImportError ===

/// Errors that abort a whole bookmark import.
///
/// Per-entity problems never end up here; they are collected as messages
/// in the import report instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The request carried no bookmark file.
    #[error("No bookmark file provided")]
    MissingFile,
    /// The uploaded file exceeds the configured size limit.
    #[error("Bookmark file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },
    /// The file content could not be decoded.
    #[error("Bookmark file is unreadable: {0}")]
    Unreadable(String),
    /// The file contained nothing but whitespace.
    #[error("Bookmark file is empty")]
    EmptyContent,
    /// The `mode` field is neither `merge` nor `replace`.
    #[error("Invalid import mode: {0}")]
    InvalidMode(String),
    /// The `target` field is not `auto`, `menu:<id>` or an id.
    #[error("Invalid import target: {0}")]
    InvalidTarget(String),
    /// The `dryRun` field is not a recognizable boolean.
    #[error("Invalid dryRun value: {0}")]
    InvalidFlag(String),
    /// Parsing produced neither menus nor cards.
    #[error("No menus or cards could be parsed from the bookmark file")]
    NothingToImport { errors: Vec<String> },
    /// The fixed target menu does not exist.
    #[error("Target menu not found: {0}")]
    TargetMenuNotFound(i64),
    /// A storage operation failed mid-import.
    #[error("Import failed: {0}")]
    Storage(#[from] StoreError),
}

impl ImportError {
    /// HTTP-style status class of the rejection.
    pub fn status_code(&self) -> u16 {
        match self {
            ImportError::FileTooLarge { .. } => 413,
            ImportError::TargetMenuNotFound(_) => 404,
            ImportError::Storage(_) => 500,
            _ => 400,
        }
    }

    /// Parse messages attached to the rejection, if any.
    pub fn errors(&self) -> &[String] {
        match self {
            ImportError::NothingToImport { errors } => errors,
            _ => &[],
        }
    }

    /// Rejection body: `{ok: false, error, errors?}`.
    pub fn to_response(&self) -> Value {
        let mut body = json!({ "ok": false, "error": self.to_string() });
        if !self.errors().is_empty() {
            body["errors"] = json!(self.errors());
        }
        body
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
