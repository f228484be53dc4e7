//! Main window view for the fontlease GUI application.

use crate::app::FontleaseApp;
use crate::helpers;
use crate::message::Message;
use crate::styles::DragActiveStyle;

use iced::widget::{button, column, container, row, text};
use iced::{Element, Length};

/// Render the main window view.
pub fn render(app: &FontleaseApp) -> Element<'_, Message> {
    let title = text("Fontlease")
        .size(24)
        .style(iced::theme::Text::Color(iced::Color::from_rgb(
            0.2, 0.3, 0.2,
        )));

    let status = text(&app.status).size(14);

    let quickstart: Option<Element<Message>> = if app.session.ledger().is_empty() {
        Some(
            container(
                column![
                    text("Quick start").size(16),
                    text("1) Load fonts with the button below or drop files/folders anywhere on this window.")
                        .size(12),
                    text("2) Loaded fonts are visible to every application until you release them or exit.")
                        .size(12),
                    text("3) Closing the window can hide this tool instead of exiting; fonts stay registered while it runs.")
                        .size(12),
                    text("Supports .ttf, .otf and .ttc/.otc collections")
                        .size(10)
                        .style(iced::theme::Text::Color(iced::Color::from_rgb(0.45, 0.45, 0.45))),
                ]
                .spacing(6),
            )
            .padding(12)
            .style(iced::theme::Container::Box)
            .into(),
        )
    } else {
        None
    };

    let list_header = text("Registered Fonts").size(18);
    let entry_list = entry_list_view(app);

    let platform_notice: Option<Element<Message>> = if !app.platform_available {
        Some(
            text("Session font registration is not supported on this platform; loads will fail.")
                .size(12)
                .style(iced::theme::Text::Color(iced::Color::from_rgb(
                    0.6, 0.2, 0.2,
                )))
                .into(),
        )
    } else {
        None
    };

    let details_panel = details_panel_view(app);
    let drop_area = drop_area_view(app);
    let notices = notices_view(app);

    let mut release_all_btn = button("Release All");
    if !app.session.ledger().is_empty() {
        release_all_btn = release_all_btn.on_press(Message::ReleaseAll);
    } else {
        release_all_btn = release_all_btn.style(iced::theme::Button::Secondary);
    }

    let controls = row![
        button("Load Fonts...").on_press(Message::AddFonts),
        release_all_btn,
    ]
    .spacing(10)
    .align_items(iced::Alignment::Center);

    let content = column![
        title,
        container(status).padding(10),
        quickstart.unwrap_or_else(|| text("").into()),
        list_header,
        entry_list,
        platform_notice.unwrap_or_else(|| text("").into()),
        details_panel,
        drop_area,
        controls,
        notices,
    ]
    .spacing(16)
    .padding(20)
    .width(Length::Fill);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .into()
}

/// Build the registered-entry list view.
fn entry_list_view(app: &FontleaseApp) -> Element<'_, Message> {
    let entries = app.session.ledger().entries();
    if entries.is_empty() {
        return text("No fonts registered")
            .size(14)
            .style(iced::theme::Text::Color(iced::Color::from_rgb(
                0.5, 0.5, 0.5,
            )))
            .into();
    }

    column(
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let name = text(&entry.display_name).size(14);

                let origin = if entry.owned {
                    text("extracted").size(11).style(iced::theme::Text::Color(
                        iced::Color::from_rgb(0.5, 0.4, 0.2),
                    ))
                } else {
                    text(
                        entry
                            .source_path
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .to_string(),
                    )
                    .size(11)
                    .style(iced::theme::Text::Color(iced::Color::from_rgb(
                        0.45, 0.45, 0.45,
                    )))
                };

                let mut details_btn = button("Details");
                if app.selected == Some(i) {
                    details_btn = details_btn.style(iced::theme::Button::Primary);
                }
                details_btn = details_btn.on_press(Message::SelectEntry(i));

                let release_btn = button("Release").on_press(Message::ReleaseEntry(i));

                row![name, origin, details_btn, release_btn]
                    .spacing(10)
                    .align_items(iced::Alignment::Center)
                    .into()
            })
            .collect::<Vec<_>>(),
    )
    .spacing(5)
    .into()
}

/// Build the details panel for the selected entry.
fn details_panel_view(app: &FontleaseApp) -> Element<'_, Message> {
    if let Some(entry) = app
        .selected
        .and_then(|i| app.session.ledger().entries().get(i))
    {
        let file_size = helpers::font_file_size(&entry.source_path);
        let rows = helpers::entry_metadata_lines(entry, file_size)
            .iter()
            .map(|line| text(line).size(12).into())
            .collect::<Vec<_>>();

        container(column![text("Font Details").size(16), column(rows).spacing(4)].spacing(8))
            .padding(12)
            .width(Length::Fill)
            .style(iced::theme::Container::Box)
            .into()
    } else {
        container(
            column![
                text("Font Details").size(16),
                text("Select a font to view its details.")
                    .size(12)
                    .style(iced::theme::Text::Color(iced::Color::from_rgb(
                        0.5, 0.5, 0.5,
                    ))),
            ]
            .spacing(6),
        )
        .padding(12)
        .width(Length::Fill)
        .style(iced::theme::Container::Box)
        .into()
    }
}

/// Build the drop area view.
fn drop_area_view(app: &FontleaseApp) -> Element<'_, Message> {
    let scan_summary = app.last_scan_stats.as_ref().map(|stats| {
        let sample_preview = if stats.sample_files.is_empty() {
            String::new()
        } else {
            format!(" e.g. {}", stats.sample_files.join(", "))
        };

        format!(
            "Last drop: {} font(s) from {} file(s) across {} folder(s){}",
            stats.fonts_found, stats.files_checked, stats.directories_scanned, sample_preview
        )
    });

    let drop_area_content = if app.is_dragging {
        let hover_info = if let Some(ref hovered_file) = app.hovered_file {
            let file_name = hovered_file
                .file_name()
                .unwrap_or_default()
                .to_string_lossy();

            if hovered_file.is_dir() {
                text(format!("Folder: {} (scanned for fonts)", file_name)).size(14)
            } else {
                text(format!("File: {}", file_name)).size(14)
            }
        } else {
            text("Drop fonts or folders here").size(16)
        };

        column![
            hover_info,
            text("Collections (.ttc/.otc) are expanded into their member fonts")
                .size(10)
                .style(iced::theme::Text::Color(iced::Color::from_rgb(
                    0.3, 0.3, 0.3
                ))),
        ]
        .spacing(6)
        .align_items(iced::Alignment::Center)
    } else {
        let idle_text = if app.session.ledger().is_empty() {
            text("Drag & drop fonts to register them").size(14)
        } else {
            text(format!(
                "Drag & drop more fonts ({} registered)",
                app.session.ledger().len()
            ))
            .size(14)
        };

        column![
            idle_text,
            scan_summary
                .as_ref()
                .map(|summary| {
                    text(summary)
                        .size(10)
                        .style(iced::theme::Text::Color(iced::Color::from_rgb(
                            0.3, 0.5, 0.3,
                        )))
                })
                .unwrap_or_else(|| text("").into()),
        ]
        .spacing(8)
        .align_items(iced::Alignment::Center)
    };

    let drop_area_style = if app.is_dragging {
        iced::theme::Container::Custom(Box::new(DragActiveStyle))
    } else {
        iced::theme::Container::Box
    };

    container(drop_area_content)
        .padding(20)
        .width(Length::Fill)
        .height(Length::Fixed(100.0))
        .center_x()
        .center_y()
        .style(drop_area_style)
        .into()
}

/// Build the recent-failure notices view.
fn notices_view(app: &FontleaseApp) -> Element<'_, Message> {
    if app.notices.is_empty() {
        return text("").into();
    }

    let lines = app
        .notices
        .iter()
        .map(|notice| {
            text(notice)
                .size(11)
                .style(iced::theme::Text::Color(iced::Color::from_rgb(
                    0.6, 0.25, 0.2,
                )))
                .into()
        })
        .collect::<Vec<_>>();

    container(
        column![
            row![
                text("Notices").size(14),
                button("Clear")
                    .style(iced::theme::Button::Secondary)
                    .on_press(Message::DismissNotices),
            ]
            .spacing(10)
            .align_items(iced::Alignment::Center),
            column(lines).spacing(2),
        ]
        .spacing(6),
    )
    .padding(10)
    .width(Length::Fill)
    .style(iced::theme::Container::Box)
    .into()
}
