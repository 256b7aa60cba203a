use serde::{Deserialize, Serialize};

/// Import engine configuration, stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImportSettings {
    /// Uploads larger than this are rejected before parsing.
    pub max_file_bytes: u64,
    /// Number of cards echoed back in the response sample.
    pub sample_size: usize,
    /// Run each commit inside a single database transaction.
    pub atomic_commit: bool,
    /// Menu that receives links found outside any folder.
    pub unfiled_menu_name: String,
    /// SQLite file name, relative to the data directory.
    pub database_file: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: 5 * 1024 * 1024,
            sample_size: 5,
            atomic_commit: true,
            unfiled_menu_name: "Bookmarks".to_string(),
            database_file: "navboard.db".to_string(),
        }
    }
}
