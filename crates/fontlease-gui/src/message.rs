//! Message types for the fontlease GUI application.

use iced::window;
use std::path::PathBuf;

/// All possible messages the application can receive.
#[derive(Debug, Clone)]
pub enum Message {
    // Font management
    AddFonts,
    FontsSelected(Option<Vec<PathBuf>>),
    FilesDropped(Vec<PathBuf>),
    SelectEntry(usize),
    ReleaseEntry(usize),
    ReleaseAll,
    DismissNotices,

    // Close flow
    CloseRequested(window::Id),
    ConfirmCancel,
    ConfirmHide,
    ConfirmExit,
    RememberToggled(bool),
    Restore,
    ExitApp,
    WindowClosed(window::Id),

    // Drag and drop state
    DragLeave,
    FileHovered(PathBuf),
    ProcessPendingDrops,
}
