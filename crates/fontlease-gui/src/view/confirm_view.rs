//! Close-confirmation dialog window.

use crate::app::FontleaseApp;
use crate::message::Message;

use iced::widget::{button, checkbox, column, container, row, text};
use iced::{Element, Length};

/// Render the confirm window view.
pub fn render(app: &FontleaseApp) -> Element<'_, Message> {
    let hint = text("Exit and release all fonts, or keep running in the background?").size(15);

    let detail = text(format!(
        "{} font(s) are registered for this session.",
        app.session.ledger().len()
    ))
    .size(12)
    .style(iced::theme::Text::Color(iced::Color::from_rgb(
        0.45, 0.45, 0.45,
    )));

    let remember =
        checkbox("Don't ask again", app.remember_choice).on_toggle(Message::RememberToggled);

    let buttons = row![
        button("Cancel")
            .style(iced::theme::Button::Secondary)
            .on_press(Message::ConfirmCancel),
        button("Hide").on_press(Message::ConfirmHide),
        button("Exit")
            .style(iced::theme::Button::Destructive)
            .on_press(Message::ConfirmExit),
    ]
    .spacing(10)
    .align_items(iced::Alignment::Center);

    container(column![hint, detail, remember, buttons].spacing(12))
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .into()
}
