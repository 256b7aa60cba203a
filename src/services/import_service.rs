//! Bookmark import service.
//!
//! Validates an upload and its policy fields, runs the parse → flatten →
//! reconcile pipeline and shapes the response. Every rejection happens before
//! the store is written to.

use rusqlite::Connection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::managers::navigation_store::NavigationStore;
use crate::services::bookmark_parser::parse_bookmark_html;
use crate::services::flattener::Flattener;
use crate::services::reconciler::reconcile;
use crate::types::errors::{ImportError, StoreError};
use crate::types::import::{parse_flag, ImportMode, ImportPolicy, ImportReport, ImportResponse, ImportTarget};
use crate::types::navigation::FlatImport;
use crate::types::settings::ImportSettings;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// An import request as it arrives from a form upload: raw file bytes plus
/// untyped policy fields. Absent fields take their defaults.
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    pub file: Option<Vec<u8>>,
    pub mode: Option<String>,
    pub target: Option<String>,
    pub dry_run: Option<String>,
}

impl ImportRequest {
    pub fn new(file: impl Into<Vec<u8>>) -> Self {
        Self {
            file: Some(file.into()),
            ..Self::default()
        }
    }

    pub fn mode(mut self, mode: &str) -> Self {
        self.mode = Some(mode.to_string());
        self
    }

    pub fn target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run.to_string());
        self
    }
}

/// Runs bookmark imports against one database connection.
pub struct ImportService<'a> {
    conn: &'a Connection,
    settings: &'a ImportSettings,
}

impl<'a> ImportService<'a> {
    pub fn new(conn: &'a Connection, settings: &'a ImportSettings) -> Self {
        Self { conn, settings }
    }

    /// Checks the upload and decodes it and the policy fields.
    pub fn validate(&self, request: &ImportRequest) -> Result<(String, ImportPolicy), ImportError> {
        let bytes = request.file.as_deref().ok_or(ImportError::MissingFile)?;

        let size = bytes.len() as u64;
        if size > self.settings.max_file_bytes {
            return Err(ImportError::FileTooLarge {
                size,
                limit: self.settings.max_file_bytes,
            });
        }

        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let content = std::str::from_utf8(bytes)
            .map_err(|e| ImportError::Unreadable(e.to_string()))?;
        if content.trim().is_empty() {
            return Err(ImportError::EmptyContent);
        }

        let mode: ImportMode = request.mode.as_deref().unwrap_or_default().parse()?;
        let target: ImportTarget = request.target.as_deref().unwrap_or_default().parse()?;
        let raw_flag = request.dry_run.as_deref().unwrap_or_default();
        let dry_run = parse_flag(raw_flag).ok_or_else(|| ImportError::InvalidFlag(raw_flag.to_string()))?;

        Ok((
            content.to_string(),
            ImportPolicy {
                mode,
                target,
                dry_run,
            },
        ))
    }

    /// Runs one import end to end.
    ///
    /// # Errors
    /// Any validation failure, an import with nothing parseable, a missing
    /// fixed target menu, or a storage failure. With `atomic_commit` a storage
    /// failure leaves the database untouched; without it, rows written before
    /// the failure stay.
    pub fn import(&self, request: &ImportRequest) -> Result<ImportResponse, ImportError> {
        let run_id = Uuid::new_v4();
        let (content, policy) = self.validate(request)?;

        info!(
            %run_id,
            mode = %policy.mode,
            target = %policy.target,
            dry_run = policy.dry_run,
            bytes = content.len(),
            "starting bookmark import"
        );

        let parsed = parse_bookmark_html(&content);
        if !parsed.errors.is_empty() {
            warn!(%run_id, count = parsed.errors.len(), "bookmark file has parse problems");
        }

        let flat = Flattener::new(self.settings.unfiled_menu_name.clone()).flatten(&parsed.tree);
        if flat.is_empty() {
            return Err(ImportError::NothingToImport {
                errors: parsed.errors,
            });
        }

        let mut report = self.reconcile(&flat, policy)?;

        let mut errors = parsed.errors;
        errors.append(&mut report.errors);
        report.errors = errors;

        info!(
            %run_id,
            created_menus = report.stats.created.menus,
            created_sub_menus = report.stats.created.sub_menus,
            created_cards = report.stats.created.cards,
            skipped_cards = report.stats.skipped.cards,
            errors = report.errors.len(),
            "bookmark import finished"
        );

        Ok(ImportResponse::from_report(report, policy.dry_run))
    }

    fn reconcile(&self, flat: &FlatImport, policy: ImportPolicy) -> Result<ImportReport, ImportError> {
        let sample_size = self.settings.sample_size;

        if policy.dry_run || !self.settings.atomic_commit {
            let mut store = NavigationStore::new(self.conn);
            return reconcile(flat, policy, &mut store, sample_size);
        }

        let tx = self.conn.unchecked_transaction().map_err(StoreError::from)?;
        let report = {
            let mut store = NavigationStore::new(&tx);
            reconcile(flat, policy, &mut store, sample_size)?
        };
        tx.commit().map_err(StoreError::from)?;
        Ok(report)
    }
}
