//! View rendering for the fontlease GUI application.

mod confirm_view;
mod indicator_view;
mod main_view;

use crate::app::FontleaseApp;
use crate::message::Message;
use iced::{window, Element};

/// Dispatch to the appropriate view based on window ID.
pub fn render<'a>(app: &'a FontleaseApp, window: window::Id) -> Element<'a, Message> {
    if Some(window) == app.confirm_window {
        confirm_view::render(app)
    } else if Some(window) == app.indicator_window {
        indicator_view::render(app)
    } else {
        main_view::render(app)
    }
}
