//! Custom styles for the fontlease GUI application.

use iced::{widget::container, Theme};

/// Container style for the active drag state.
pub struct DragActiveStyle;

impl container::StyleSheet for DragActiveStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(iced::Background::Color(iced::Color::from_rgba(
                0.88, 0.96, 0.88, 0.9,
            ))),
            text_color: Some(iced::Color::from_rgb(0.1, 0.35, 0.15)),
            border: iced::border::Border {
                color: iced::Color::from_rgb(0.15, 0.6, 0.25),
                width: 3.0,
                radius: 12.0.into(),
            },
            shadow: iced::Shadow {
                color: iced::Color::from_rgba(0.1, 0.4, 0.2, 0.35),
                offset: iced::Vector::new(0.0, 6.0),
                blur_radius: 18.0,
            },
        }
    }
}

/// Container style for the hidden-session indicator window.
pub struct IndicatorStyle;

impl container::StyleSheet for IndicatorStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(iced::Background::Color(iced::Color::from_rgba(
                0.12, 0.13, 0.16, 0.96,
            ))),
            text_color: Some(iced::Color::from_rgb(0.92, 0.93, 0.95)),
            border: iced::border::Border {
                color: iced::Color::from_rgb(0.35, 0.38, 0.45),
                width: 1.0,
                radius: 10.0.into(),
            },
            shadow: iced::Shadow {
                color: iced::Color::from_rgba(0.0, 0.0, 0.0, 0.4),
                offset: iced::Vector::new(0.0, 4.0),
                blur_radius: 14.0,
            },
        }
    }
}
