use ratatui::style::{Color, Modifier, Style};

use crate::notify::NotificationLevel;
use crate::session::{CountdownLabel, Urgency};

/// Text colour at a given opacity. Fades towards black, the usual terminal
/// background.
pub fn faded_text_style(opacity: f64) -> Style {
    let level = (255.0 * opacity.clamp(0.0, 1.0)).round() as u8;
    let style = Style::default().fg(Color::Rgb(level, level, level));
    if opacity < 0.5 {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

pub fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Calm => Color::Reset,
        Urgency::Low => Color::Rgb(254, 226, 226),
        Urgency::Medium => Color::Rgb(252, 165, 165),
        Urgency::High => Color::Rgb(239, 68, 68),
    }
}

/// Label text and style for the countdown indicator; `None` when hidden
pub fn countdown_span(label: CountdownLabel) -> Option<(String, Style)> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match label {
        CountdownLabel::Hidden => None,
        CountdownLabel::Counting { remaining, urgency } => {
            Some((remaining.to_string(), bold.fg(urgency_color(urgency))))
        }
        CountdownLabel::Fading => Some((
            "⚠ Fading".to_string(),
            bold.fg(Color::Red).add_modifier(Modifier::SLOW_BLINK),
        )),
    }
}

pub fn notification_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Destructive => Color::Red,
        NotificationLevel::Error => Color::LightRed,
    }
}
