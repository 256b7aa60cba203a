// Navboard services
// Services hold the import pipeline: sanitizing, parsing, flattening, reconciling, plus settings.

pub mod bookmark_parser;
pub mod flattener;
pub mod import_service;
pub mod reconciler;
pub mod sanitizer;
pub mod settings_engine;
