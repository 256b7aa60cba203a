// Navboard shared type definitions
// Each submodule defines types used across the import pipeline and the store.

pub mod bookmark;
pub mod errors;
pub mod import;
pub mod navigation;
pub mod settings;
