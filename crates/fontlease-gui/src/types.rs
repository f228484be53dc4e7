//! Type definitions for the fontlease GUI application.

use fontlease_core::ClosePreference;

/// Persistent application configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AppConfig {
    pub close: ClosePreference,
}

/// Classification for dropped paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPathKind {
    FontFile,
    Directory,
    Unsupported,
    Missing,
}

/// Statistics from folder scanning.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub directories_scanned: usize,
    pub files_checked: usize,
    pub fonts_found: usize,
    pub sample_files: Vec<String>,
}

/// Supported font file extensions (single fonts and collections).
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];
