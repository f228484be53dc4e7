//! Tests for the fontlease GUI application.

use crate::app::FontleaseApp;
use crate::helpers;
use crate::message::Message;
use crate::types::{AppConfig, DropPathKind};

use fontlease_core::{ClosePreference, FontEntry, ReleaseError, TeardownError};
use iced::keyboard;
use iced::window;
use std::fs;
use std::path::PathBuf;

#[test]
fn confirm_window_is_a_fixed_always_on_top_dialog() {
    let settings = FontleaseApp::confirm_window_settings();

    assert!(!settings.resizable, "the confirm dialog has a fixed size");
    assert_eq!(
        settings.level,
        window::Level::AlwaysOnTop,
        "the dialog must not get lost behind other windows"
    );
    assert!(
        !settings.exit_on_close_request,
        "closing the dialog must route through the cancel path"
    );
}

#[test]
fn indicator_window_is_borderless_and_always_on_top() {
    let settings = FontleaseApp::indicator_window_settings();

    assert!(!settings.decorations);
    assert!(!settings.resizable);
    assert_eq!(settings.level, window::Level::AlwaysOnTop);
    assert!(!settings.exit_on_close_request);
}

#[test]
fn detects_font_extensions() {
    assert!(helpers::is_font_file(&PathBuf::from("font.TTF")));
    assert!(helpers::is_font_file(&PathBuf::from("font.otf")));
    assert!(helpers::is_font_file(&PathBuf::from("pack.ttc")));
    assert!(helpers::is_font_file(&PathBuf::from("pack.otc")));
    assert!(!helpers::is_font_file(&PathBuf::from("font.txt")));
    assert!(!helpers::is_font_file(&PathBuf::from("font")));
}

#[test]
fn classify_drop_path_flags_invalid_inputs() {
    let base = tempfile::tempdir().expect("create test dir");
    let nested_dir = base.path().join("fonts");

    fs::create_dir_all(&nested_dir).expect("create nested dir");
    let font_path = nested_dir.join("demo.ttf");
    let text_path = nested_dir.join("readme.md");
    fs::write(&font_path, b"").expect("create font file");
    fs::write(&text_path, b"").expect("create txt file");

    assert_eq!(
        helpers::classify_drop_path(&font_path),
        DropPathKind::FontFile
    );
    assert_eq!(
        helpers::classify_drop_path(&nested_dir),
        DropPathKind::Directory
    );
    assert_eq!(
        helpers::classify_drop_path(&text_path),
        DropPathKind::Unsupported
    );
    let missing = nested_dir.join("missing.otf");
    assert_eq!(helpers::classify_drop_path(&missing), DropPathKind::Missing);
}

#[test]
fn scan_folder_for_fonts_collects_stats() {
    let base = tempfile::tempdir().expect("create test dir");
    let nested = base.path().join("nested");

    fs::create_dir_all(&nested).expect("create test dirs");
    fs::write(base.path().join("a.ttf"), b"").expect("create font file");
    fs::write(nested.join("b.otf"), b"").expect("create nested font file");
    fs::write(base.path().join("ignore.txt"), b"").expect("create non-font file");

    let (fonts, stats) = helpers::scan_folder_for_fonts(base.path()).expect("scan should succeed");

    assert_eq!(fonts.len(), 2);
    assert_eq!(stats.fonts_found, 2);
    assert!(stats.directories_scanned >= 2); // base + nested
    assert!(stats.files_checked >= 3);
    assert!(stats.sample_files.iter().any(|name| name.contains('a')));
}

#[test]
fn config_round_trip_to_custom_path() {
    let dir = tempfile::tempdir().expect("create test dir");
    let path = dir.path().join("fontlease-config.json");

    let cfg = AppConfig {
        close: ClosePreference::Hide,
    };

    helpers::save_config_to(&path, &cfg).expect("save config");
    let loaded = helpers::load_config_from(&path).expect("load config");

    assert_eq!(loaded, cfg);
}

#[test]
fn corrupt_or_missing_config_leaves_the_default_ask() {
    let dir = tempfile::tempdir().expect("create test dir");
    let path = dir.path().join("fontlease-config.json");

    assert!(
        helpers::load_config_from(&path).is_err(),
        "missing file must not load"
    );

    fs::write(&path, b"{\"close\": \"sometimes\"}").expect("write corrupt config");
    assert!(
        helpers::load_config_from(&path).is_err(),
        "unknown values must not load"
    );

    assert_eq!(ClosePreference::default(), ClosePreference::Ask);
}

#[test]
fn teardown_failure_text_names_the_leaked_directory() {
    let err = TeardownError {
        dir: PathBuf::from("/tmp/fontlease-x1y2"),
        release_errors: vec![ReleaseError::UnregisterRefused {
            display_name: "Demo Sans".to_string(),
            path: PathBuf::from("/tmp/fontlease-x1y2/a.ttf"),
        }],
        remove_error: Some("directory not empty".to_string()),
    };

    let out = helpers::teardown_failure_text(&err);

    assert!(out.contains("/tmp/fontlease-x1y2"), "directory must be named");
    assert!(out.contains("Demo Sans"), "failed fonts must be named");
    assert!(out.contains("directory not empty"));
}

#[test]
fn entry_metadata_lines_distinguish_extracted_from_user_files() {
    let extracted = FontEntry {
        display_name: "Demo Sans".to_string(),
        source_path: PathBuf::from("/tmp/fontlease-x1y2/abc.ttf"),
        owned: true,
    };
    let user = FontEntry {
        display_name: "Demo Serif".to_string(),
        source_path: PathBuf::from("/home/me/fonts/serif.otf"),
        owned: false,
    };

    let extracted_lines = helpers::entry_metadata_lines(&extracted, Some(2048)).join("\n");
    let user_lines = helpers::entry_metadata_lines(&user, None).join("\n");

    assert!(extracted_lines.contains("Demo Sans"));
    assert!(extracted_lines.contains("extracted"));
    assert!(extracted_lines.contains("2.0 KB"));
    assert!(extracted_lines.contains("/tmp/fontlease-x1y2/abc.ttf"));
    assert!(user_lines.contains("left untouched"));
    assert!(user_lines.contains("/home/me/fonts/serif.otf"));
}

#[test]
fn format_file_size_scales_units() {
    assert_eq!(helpers::format_file_size(0), "0 B");
    assert_eq!(helpers::format_file_size(532), "532 B");
    assert_eq!(helpers::format_file_size(1536), "1.5 KB");
    assert_eq!(helpers::format_file_size(5_242_880), "5.0 MB");
}

#[test]
fn shortcut_mapping_covers_core_actions() {
    let command = keyboard::Modifiers::COMMAND;

    let add = keyboard::Event::KeyPressed {
        key: keyboard::Key::Character("o".into()),
        location: keyboard::Location::Standard,
        modifiers: command,
        text: None,
    };
    assert!(matches!(
        helpers::shortcut_to_message(&add),
        Some(Message::AddFonts)
    ));

    let release_all = keyboard::Event::KeyPressed {
        key: keyboard::Key::Character("r".into()),
        location: keyboard::Location::Standard,
        modifiers: command,
        text: None,
    };
    assert!(matches!(
        helpers::shortcut_to_message(&release_all),
        Some(Message::ReleaseAll)
    ));

    let close = keyboard::Event::KeyPressed {
        key: keyboard::Key::Character("w".into()),
        location: keyboard::Location::Standard,
        modifiers: command,
        text: None,
    };
    assert!(matches!(
        helpers::shortcut_to_message(&close),
        Some(Message::CloseRequested(id)) if id == window::Id::MAIN
    ));

    let ignore = keyboard::Event::KeyPressed {
        key: keyboard::Key::Character("r".into()),
        location: keyboard::Location::Standard,
        modifiers: keyboard::Modifiers::empty(),
        text: None,
    };
    assert!(
        helpers::shortcut_to_message(&ignore).is_none(),
        "shortcuts require the command modifier"
    );
}
