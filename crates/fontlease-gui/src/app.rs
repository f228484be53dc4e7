//! Application state and lifecycle for the fontlease GUI.

use crate::helpers;
use crate::message::Message;
use crate::types::ScanStats;
use crate::update;
use crate::view;
use crate::LaunchOptions;

use fontlease_core::{platform_support_enabled, system_font_table, Ledger, SessionController};
use iced::{
    event,
    multi_window::{self, Application},
    window, Command, Element, Event, Settings, Subscription, Theme,
};
use std::path::PathBuf;

/// Oldest notices are dropped past this point.
const MAX_NOTICES: usize = 6;

/// Main application state.
pub struct FontleaseApp {
    pub session: SessionController,
    pub status: String,
    pub notices: Vec<String>,
    pub selected: Option<usize>,
    pub is_dragging: bool,
    pub hovered_file: Option<PathBuf>,
    pub pending_drop_paths: Vec<PathBuf>,
    pub drop_processing_scheduled: bool,
    pub last_scan_stats: Option<ScanStats>,
    pub remember_choice: bool,
    pub confirm_window: Option<window::Id>,
    pub indicator_window: Option<window::Id>,
    pub platform_available: bool,
}

impl multi_window::Application for FontleaseApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = LaunchOptions;

    fn new(options: LaunchOptions) -> (Self, Command<Message>) {
        let preference = match helpers::load_config() {
            Ok(config) => config.close,
            Err(reason) => {
                log::debug!("no usable close preference ({reason}); defaulting to ask");
                Default::default()
            }
        };

        let ledger =
            Ledger::new(system_font_table()).expect("Failed to create the session temp area");
        let start_hidden = !options.fonts.is_empty() && !options.display;
        let mut session = SessionController::new(ledger, preference, start_hidden);

        let mut notices = Vec::new();
        let status = if options.fonts.is_empty() {
            "Ready".to_string()
        } else {
            update::register_paths(&mut session, &options.fonts, &mut notices)
        };
        for notice in &notices {
            log::warn!("{notice}");
        }

        let mut app = Self {
            session,
            status,
            notices,
            selected: None,
            is_dragging: false,
            hovered_file: None,
            pending_drop_paths: Vec::new(),
            drop_processing_scheduled: false,
            last_scan_stats: None,
            remember_choice: false,
            confirm_window: None,
            indicator_window: None,
            platform_available: platform_support_enabled(),
        };

        let command = if start_hidden {
            app.ensure_indicator_window()
        } else {
            Command::none()
        };

        (app, command)
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status| match event {
            Event::Window(id, window::Event::FileHovered(path)) if id == window::Id::MAIN => {
                Some(Message::FileHovered(path))
            }
            Event::Window(id, window::Event::FileDropped(path)) if id == window::Id::MAIN => {
                Some(Message::FilesDropped(vec![path]))
            }
            Event::Window(id, window::Event::FilesHoveredLeft) if id == window::Id::MAIN => {
                Some(Message::DragLeave)
            }
            Event::Window(id, window::Event::CloseRequested) => Some(Message::CloseRequested(id)),
            Event::Window(id, window::Event::Closed) => Some(Message::WindowClosed(id)),
            Event::Keyboard(key_event) => helpers::shortcut_to_message(&key_event),
            _ => None,
        })
    }

    fn title(&self, window: window::Id) -> String {
        if Some(window) == self.confirm_window {
            "Fontlease - Before You Close".to_string()
        } else if Some(window) == self.indicator_window {
            "Fontlease".to_string()
        } else {
            "Fontlease - Session Fonts".to_string()
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        update::handle_message(self, message)
    }

    fn view(&self, window: window::Id) -> Element<'_, Message> {
        view::render(self, window)
    }

    fn theme(&self, _window: window::Id) -> Theme {
        Theme::Light
    }
}

impl FontleaseApp {
    /// Spawn the confirm dialog window, or focus the existing one.
    pub fn ensure_confirm_window(&mut self) -> Command<Message> {
        if let Some(id) = self.confirm_window {
            return window::gain_focus(id);
        }

        let (id, cmd) = window::spawn(Self::confirm_window_settings());
        self.confirm_window = Some(id);
        cmd
    }

    /// Spawn the hidden-session indicator window, or focus the existing one.
    pub fn ensure_indicator_window(&mut self) -> Command<Message> {
        if let Some(id) = self.indicator_window {
            return window::gain_focus(id);
        }

        let (id, cmd) = window::spawn(Self::indicator_window_settings());
        self.indicator_window = Some(id);
        cmd
    }

    pub fn close_confirm_window(&mut self) -> Command<Message> {
        match self.confirm_window.take() {
            Some(id) => window::close(id),
            None => Command::none(),
        }
    }

    pub fn close_indicator_window(&mut self) -> Command<Message> {
        match self.indicator_window.take() {
            Some(id) => window::close(id),
            None => Command::none(),
        }
    }

    /// Fixed-size dialog configuration for the close confirmation.
    pub fn confirm_window_settings() -> window::Settings {
        let mut settings = window::Settings::default();
        settings.size = iced::Size::new(380.0, 200.0);
        settings.resizable = false;
        settings.level = window::Level::AlwaysOnTop;
        settings.exit_on_close_request = false;
        settings
    }

    /// Small borderless always-on-top panel shown while hidden; it is the
    /// only way back to the main window, so it never goes away on its own.
    pub fn indicator_window_settings() -> window::Settings {
        let mut settings = window::Settings::default();
        settings.size = iced::Size::new(240.0, 210.0);
        settings.resizable = false;
        settings.decorations = false;
        settings.level = window::Level::AlwaysOnTop;
        settings.exit_on_close_request = false;
        settings
    }

    /// Record a per-item failure for display, bounded to the most recent.
    pub fn push_notice(&mut self, notice: String) {
        log::warn!("{notice}");
        self.notices.push(notice);
        let overflow = self.notices.len().saturating_sub(MAX_NOTICES);
        if overflow > 0 {
            self.notices.drain(..overflow);
        }
    }
}

/// Run the application.
pub fn run(options: LaunchOptions) -> iced::Result {
    env_logger::init();

    let show_window = options.fonts.is_empty() || options.display;
    let mut settings = Settings::with_flags(options);
    settings.window = window::Settings {
        size: iced::Size::new(440.0, 580.0),
        min_size: Some(iced::Size::new(380.0, 440.0)),
        visible: show_window,
        exit_on_close_request: false,
        ..Default::default()
    };

    FontleaseApp::run(settings)
}
