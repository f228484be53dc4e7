//! Message handling for the fontlease GUI application.

use crate::app::FontleaseApp;
use crate::helpers;
use crate::message::Message;
use crate::types::{AppConfig, DropPathKind, ScanStats};

use fontlease_core::{CloseAction, ClosePreference, SessionController};
use iced::{window, Command};
use std::path::PathBuf;
use std::time::Duration;

/// Handle an incoming message and return any resulting command.
pub fn handle_message(app: &mut FontleaseApp, message: Message) -> Command<Message> {
    match message {
        Message::AddFonts => {
            app.status = "Opening file dialog...".to_string();
            return Command::perform(
                async {
                    std::thread::sleep(Duration::from_millis(100));
                    rfd::FileDialog::new()
                        .add_filter("Font Files", &["ttf", "otf", "ttc", "otc"])
                        .pick_files()
                },
                Message::FontsSelected,
            );
        }

        Message::FontsSelected(paths) => match paths {
            Some(paths) => process_dropped_paths(app, paths),
            None => {
                app.status = "No fonts selected".to_string();
            }
        },

        Message::FilesDropped(paths) => {
            app.is_dragging = false;
            app.hovered_file = None;
            app.pending_drop_paths.extend(paths);
            return enqueue_drop_processing(app);
        }

        Message::ProcessPendingDrops => {
            app.drop_processing_scheduled = false;
            let pending = std::mem::take(&mut app.pending_drop_paths);
            if pending.is_empty() {
                return Command::none();
            }
            process_dropped_paths(app, pending);
        }

        Message::DragLeave => {
            app.is_dragging = false;
            app.hovered_file = None;
            app.status = if app.session.ledger().is_empty() {
                "No fonts registered. Load fonts to get started.".to_string()
            } else {
                format!("{} font(s) registered", app.session.ledger().len())
            };
        }

        Message::FileHovered(path) => {
            app.is_dragging = true;
            app.status = format!(
                "Drop: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );
            app.hovered_file = Some(path);
        }

        Message::SelectEntry(index) => {
            let entries = app.session.ledger().entries();
            if index < entries.len() {
                if app.selected == Some(index) {
                    app.selected = None;
                    app.status = "Details hidden".to_string();
                } else {
                    app.status = format!("Showing details for {}", entries[index].display_name);
                    app.selected = Some(index);
                }
            }
        }

        Message::ReleaseEntry(index) => release_entry(app, index),

        Message::ReleaseAll => release_all(app),

        Message::DismissNotices => {
            app.notices.clear();
        }

        Message::CloseRequested(id) => return handle_close_request(app, id),

        Message::ConfirmCancel => {
            app.session.cancel_confirm();
            app.remember_choice = false;
            return app.close_confirm_window();
        }

        Message::ConfirmHide => {
            remember_preference(app, ClosePreference::Hide);
            app.session.hide();
            app.status = "Running in the background; fonts stay registered".to_string();
            return Command::batch(vec![
                app.close_confirm_window(),
                window::change_mode(window::Id::MAIN, window::Mode::Hidden),
                app.ensure_indicator_window(),
            ]);
        }

        Message::ConfirmExit => {
            remember_preference(app, ClosePreference::Terminate);
            return terminate(app);
        }

        Message::RememberToggled(value) => {
            app.remember_choice = value;
        }

        Message::Restore => {
            app.session.restore();
            app.status = format!("{} font(s) registered", app.session.ledger().len());
            return Command::batch(vec![
                app.close_indicator_window(),
                window::change_mode(window::Id::MAIN, window::Mode::Windowed),
                window::gain_focus(window::Id::MAIN),
            ]);
        }

        Message::ExitApp => return terminate(app),

        Message::WindowClosed(id) => {
            if Some(id) == app.confirm_window {
                app.confirm_window = None;
            }
            if Some(id) == app.indicator_window {
                app.indicator_window = None;
            }
        }
    }

    Command::none()
}

/// Route a close request per window, evaluating the close preference for
/// the main one.
fn handle_close_request(app: &mut FontleaseApp, id: window::Id) -> Command<Message> {
    if Some(id) == app.confirm_window {
        app.session.cancel_confirm();
        app.remember_choice = false;
        return app.close_confirm_window();
    }

    if Some(id) == app.indicator_window {
        // The indicator is the only way back while hidden; ignore it.
        return Command::none();
    }

    match app.session.request_close() {
        CloseAction::Confirm => {
            app.remember_choice = false;
            app.ensure_confirm_window()
        }
        CloseAction::Hide => {
            app.status = "Running in the background; fonts stay registered".to_string();
            Command::batch(vec![
                window::change_mode(window::Id::MAIN, window::Mode::Hidden),
                app.ensure_indicator_window(),
            ])
        }
        CloseAction::Terminate => terminate(app),
    }
}

/// Persist a remembered choice before the transition it accompanies.
fn remember_preference(app: &mut FontleaseApp, preference: ClosePreference) {
    if !app.remember_choice {
        return;
    }

    if let Err(reason) = helpers::save_config(&AppConfig { close: preference }) {
        app.push_notice(format!("Could not save close preference: {reason}"));
    }
    app.session.set_preference(preference);
    app.remember_choice = false;
}

/// Tear the session down and close every window. Cleanup failure is shown
/// once, naming the leaked directory, and never blocks the exit.
fn terminate(app: &mut FontleaseApp) -> Command<Message> {
    if let Err(err) = app.session.terminate() {
        let text = helpers::teardown_failure_text(&err);
        log::error!("{err}");
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Cleanup incomplete")
            .set_description(text.as_str())
            .show();
    }

    let mut windows = vec![window::Id::MAIN];
    windows.extend(app.confirm_window.take());
    windows.extend(app.indicator_window.take());
    Command::batch(windows.into_iter().map(window::close))
}

fn release_entry(app: &mut FontleaseApp, index: usize) {
    let Some(entry) = app.session.ledger().entries().get(index).cloned() else {
        return;
    };

    match app.session.ledger_mut().release(&entry.source_path) {
        Ok(()) => {
            app.status = format!("Released {}", entry.display_name);
        }
        Err(err) => {
            app.status = format!("Could not release {}", entry.display_name);
            app.push_notice(err.to_string());
        }
    }
    app.selected = None;
}

fn release_all(app: &mut FontleaseApp) {
    let total = app.session.ledger().len();
    if total == 0 {
        app.status = "Nothing to release".to_string();
        return;
    }

    let failures = app.session.ledger_mut().release_all();
    for failure in &failures {
        app.push_notice(failure.to_string());
    }
    app.selected = None;
    app.status = if failures.is_empty() {
        format!("Released all {total} font(s)")
    } else {
        format!(
            "Released {} of {total} font(s); {} failed",
            total - failures.len(),
            failures.len()
        )
    };
}

/// Register a batch of font paths, pushing one notice per failed item and
/// returning a status summary. Shared by CLI preload, the file dialog and
/// drag-and-drop; one bad file never aborts the rest.
pub fn register_paths(
    session: &mut SessionController,
    paths: &[PathBuf],
    notices: &mut Vec<String>,
) -> String {
    let mut added = 0usize;
    let mut failed = 0usize;

    for path in paths {
        for outcome in session.ledger_mut().register(path) {
            match outcome {
                Ok(_) => added += 1,
                Err(err) => {
                    failed += 1;
                    notices.push(err.to_string());
                }
            }
        }
    }

    match (added, failed) {
        (0, 0) => "No fonts found to register".to_string(),
        (added, 0) => format!("Registered {added} font(s)"),
        (0, failed) => format!("Failed to register {failed} font(s)"),
        (added, failed) => format!("Registered {added} font(s); {failed} failed"),
    }
}

/// Enqueue drop processing with a small delay so multi-file drops arrive
/// as one batch.
fn enqueue_drop_processing(app: &mut FontleaseApp) -> Command<Message> {
    if app.drop_processing_scheduled {
        return Command::none();
    }
    app.drop_processing_scheduled = true;
    Command::perform(
        async {
            std::thread::sleep(Duration::from_millis(60));
        },
        |_| Message::ProcessPendingDrops,
    )
}

/// Process dropped paths (files and folders).
fn process_dropped_paths(app: &mut FontleaseApp, paths: Vec<PathBuf>) {
    let mut font_paths = Vec::new();
    let mut stats = ScanStats::default();
    let mut skipped: Vec<(PathBuf, DropPathKind)> = Vec::new();

    for path in paths {
        match helpers::classify_drop_path(&path) {
            DropPathKind::FontFile => {
                stats.files_checked += 1;
                stats.fonts_found += 1;
                if stats.sample_files.len() < 3 {
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        stats.sample_files.push(name.to_string());
                    }
                }
                font_paths.push(path);
            }
            DropPathKind::Directory => match helpers::scan_folder_for_fonts(&path) {
                Ok((mut folder_fonts, folder_stats)) => {
                    stats.directories_scanned += folder_stats.directories_scanned;
                    stats.files_checked += folder_stats.files_checked;
                    stats.fonts_found += folder_stats.fonts_found;
                    for name in folder_stats.sample_files {
                        if stats.sample_files.len() < 3 {
                            stats.sample_files.push(name);
                        }
                    }
                    font_paths.append(&mut folder_fonts);
                }
                Err(reason) => {
                    app.push_notice(format!("Failed to scan folder {}: {reason}", path.display()));
                }
            },
            kind => skipped.push((path, kind)),
        }
    }

    let mut notices = Vec::new();
    app.status = register_paths(&mut app.session, &font_paths, &mut notices);
    for notice in notices {
        app.push_notice(notice);
    }

    for (path, kind) in &skipped {
        let why = match kind {
            DropPathKind::Missing => "missing",
            _ => "not a font file",
        };
        app.push_notice(format!("Skipped {} ({why})", path.display()));
    }
    if !skipped.is_empty() {
        app.status = format!("{} | Skipped {} item(s)", app.status, skipped.len());
    }

    if stats.files_checked > 0 || stats.directories_scanned > 0 {
        app.last_scan_stats = Some(stats);
    }
}
