//! Color palette and preset styles.

use ratatui::style::{Color, Modifier, Style};

/// Herbal palette: leaf greens on a dark earth background.
pub struct Theme;

impl Theme {
    /// Leaf green
    pub const PRIMARY: Color = Color::Rgb(34, 139, 34);
    pub const PRIMARY_LIGHT: Color = Color::Rgb(134, 239, 172);

    /// Turmeric
    pub const ACCENT: Color = Color::Rgb(234, 179, 8);

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129);
    pub const WARNING: Color = Color::Rgb(251, 191, 36);
    pub const DANGER: Color = Color::Rgb(244, 63, 94);

    pub const BG_DARK: Color = Color::Rgb(28, 25, 23);

    pub const BORDER: Color = Color::Rgb(168, 162, 158);
    pub const TEXT_PRIMARY: Color = Color::Rgb(250, 250, 249);
    pub const TEXT_SECONDARY: Color = Color::Rgb(168, 162, 158);
    pub const TEXT_MUTED: Color = Color::Rgb(120, 113, 108);

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Herb names and other recommendations
    #[must_use]
    pub fn accent() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Cursor row in a list
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Gauge color for a confidence in `[0, 1]`.
    ///
    /// Confidence tops out at 0.95, so the bands sit lower than a plain
    /// probability scale would.
    #[must_use]
    pub fn confidence(confidence: f64) -> Style {
        if confidence >= 0.6 {
            Self::success()
        } else if confidence >= 0.3 {
            Self::warning()
        } else {
            Self::danger()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bands() {
        assert_eq!(Theme::confidence(0.9), Theme::success());
        assert_eq!(Theme::confidence(0.3), Theme::warning());
        assert_eq!(Theme::confidence(0.1), Theme::danger());
    }
}
