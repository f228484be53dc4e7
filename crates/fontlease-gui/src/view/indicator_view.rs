//! Always-on-top indicator shown while the main window is hidden.
//!
//! Stands in for a task-bar icon: the only way back to the main window,
//! with the same quick actions its menu would offer.

use crate::app::FontleaseApp;
use crate::message::Message;
use crate::styles::IndicatorStyle;

use iced::widget::{button, column, container, text};
use iced::{Element, Length};

/// Render the indicator window view.
pub fn render(app: &FontleaseApp) -> Element<'_, Message> {
    let header = text("Fontlease").size(16);

    let count = text(format!(
        "{} font(s) registered",
        app.session.ledger().len()
    ))
    .size(12);

    let actions = column![
        button("Restore")
            .width(Length::Fill)
            .on_press(Message::Restore),
        button("Load Fonts...")
            .width(Length::Fill)
            .on_press(Message::AddFonts),
        button("Release All")
            .width(Length::Fill)
            .on_press(Message::ReleaseAll),
        button("Exit")
            .width(Length::Fill)
            .style(iced::theme::Button::Destructive)
            .on_press(Message::ExitApp),
    ]
    .spacing(6)
    .width(Length::Fill);

    container(
        column![header, count, actions]
            .spacing(10)
            .align_items(iced::Alignment::Center),
    )
    .padding(14)
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x()
    .center_y()
    .style(iced::theme::Container::Custom(Box::new(IndicatorStyle)))
    .into()
}
