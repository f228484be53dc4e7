//! Helper functions for the fontlease GUI application.

use crate::message::Message;
use crate::types::{AppConfig, DropPathKind, ScanStats, FONT_EXTENSIONS};
use fontlease_core::{FontEntry, TeardownError};
use iced::{keyboard, window};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Font File Operations
// =============================================================================

/// Determine whether a file path looks like a supported font.
pub fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FONT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Categorize a dropped path to drive validation messaging.
pub fn classify_drop_path(path: &Path) -> DropPathKind {
    if !path.exists() {
        return DropPathKind::Missing;
    }

    if path.is_dir() {
        return DropPathKind::Directory;
    }

    if path.is_file() && is_font_file(path) {
        DropPathKind::FontFile
    } else {
        DropPathKind::Unsupported
    }
}

/// Recursively scan a folder for font files.
pub fn scan_folder_for_fonts(folder_path: &Path) -> Result<(Vec<PathBuf>, ScanStats), String> {
    let mut font_files = Vec::new();
    let mut stats = ScanStats::default();

    fn visit_dir(
        dir: &Path,
        font_files: &mut Vec<PathBuf>,
        stats: &mut ScanStats,
    ) -> Result<(), std::io::Error> {
        stats.directories_scanned += 1;

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            stats.files_checked += 1;

            if path.is_dir() {
                visit_dir(&path, font_files, stats)?;
            } else if path.is_file() && is_font_file(&path) {
                stats.fonts_found += 1;
                if stats.sample_files.len() < 3 {
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        stats.sample_files.push(name.to_string());
                    }
                }
                font_files.push(path);
            }
        }
        Ok(())
    }

    if let Err(e) = visit_dir(folder_path, &mut font_files, &mut stats) {
        return Err(format!(
            "Failed to scan directory after {} directories and {} files: {}",
            stats.directories_scanned, stats.files_checked, e
        ));
    }

    log::debug!(
        "folder scan of {} found {} font file(s) in {} directories",
        folder_path.display(),
        font_files.len(),
        stats.directories_scanned
    );

    Ok((font_files, stats))
}

// =============================================================================
// Entry Metadata
// =============================================================================

/// Derive user-friendly metadata lines for a registered entry.
pub fn entry_metadata_lines(entry: &FontEntry, file_size_bytes: Option<u64>) -> Vec<String> {
    let mut lines = vec![
        format!("Name: {}", entry.display_name),
        format!(
            "Origin: {}",
            if entry.owned {
                "extracted from a collection (session temp file)"
            } else {
                "user file (left untouched on disk)"
            }
        ),
    ];

    if let Some(size) = file_size_bytes {
        lines.push(format!("File size: {}", format_file_size(size)));
    }

    lines.push(format!("Path: {}", entry.source_path.display()));
    lines
}

/// Get file size in bytes.
pub fn font_file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().map(|m| m.len())
}

/// Format file size for display.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let bytes_f = bytes as f64;
    if bytes_f < MB {
        return format!("{:.1} KB", bytes_f / KB);
    }

    format!("{:.1} MB", bytes_f / MB)
}

// =============================================================================
// Error Messages
// =============================================================================

/// Dialog text for an incomplete session teardown.
pub fn teardown_failure_text(err: &TeardownError) -> String {
    let mut lines = vec!["Not everything could be cleaned up on exit.".to_string()];

    for failure in &err.release_errors {
        lines.push(failure.to_string());
    }
    if let Some(reason) = &err.remove_error {
        lines.push(format!("Temp directory not removed: {reason}"));
    }

    lines.push(format!(
        "You may want to clean up {} yourself later.",
        err.dir.display()
    ));
    lines.join("\n")
}

// =============================================================================
// Keyboard Shortcuts
// =============================================================================

/// Map keyboard events to messages.
pub fn shortcut_to_message(event: &keyboard::Event) -> Option<Message> {
    if let keyboard::Event::KeyPressed { key, modifiers, .. } = event {
        if !modifiers.command() {
            return None;
        }

        let key_lower = match key.as_ref() {
            keyboard::Key::Character(ch) => ch.to_lowercase(),
            _ => String::new(),
        };

        match key_lower.as_str() {
            "o" => Some(Message::AddFonts),
            "r" => Some(Message::ReleaseAll),
            "w" => Some(Message::CloseRequested(window::Id::MAIN)),
            _ => None,
        }
    } else {
        None
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Get the config file path.
pub fn config_path() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("fontlease-config.json")
}

/// Load configuration from disk.
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&config_path())
}

/// Load configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<AppConfig, String> {
    let contents = fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Save configuration to disk.
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    save_config_to(&config_path(), config)
}

/// Save configuration to a specific path.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let contents = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, contents).map_err(|e| format!("Failed to write config: {}", e))
}
