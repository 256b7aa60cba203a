//! App Core for Navboard.
//!
//! Central struct holding the database and the settings engine.

use crate::database::connection::Database;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Central application struct.
///
/// `NavigationStore` and `ImportService` borrow the connection, so they are
/// created on demand from `db.connection()` rather than stored here.
pub struct App {
    pub db: Database,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Opens the database at `db_path` and loads settings from the default location.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::open(db_path, None)
    }

    /// Opens the database and loads settings from `settings_path`, or the
    /// default location when `None`.
    pub fn open(db_path: &str, settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open(db_path)?;

        let mut settings_engine = SettingsEngine::new(settings_path);
        settings_engine
            .load()
            .map_err(|e| format!("SettingsEngine init failed: {}", e))?;

        Ok(Self { db, settings_engine })
    }
}
