//! Dashboard color palette and styles.
//!
//! Green and red follow the status colors of the prediction result; the rest
//! is a dark slate palette that keeps them readable.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::DeviceStatus;

/// Dashboard theme color palette.
pub struct TurbineTheme;

impl TurbineTheme {
    // === Primary Colors ===

    /// Steel blue - Primary color
    pub const PRIMARY: Color = Color::Rgb(56, 132, 196); // #3884C4

    /// Lighter blue for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(125, 185, 232); // #7DB9E8

    /// Darker blue for accents
    pub const PRIMARY_DARK: Color = Color::Rgb(30, 86, 140); // #1E568C

    // === Secondary Colors ===

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    /// Green - Normal status
    pub const SUCCESS: Color = Color::Rgb(76, 175, 80); // #4CAF50

    /// Red - Malfunction status
    pub const DANGER: Color = Color::Rgb(255, 82, 82); // #FF5252

    // === Background Colors ===

    /// Near-black with blue tint
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    // === Text Colors ===

    /// Primary text (white)
    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    /// Secondary text (gray)
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Muted text
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text
    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Style for secondary text
    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for muted text
    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    /// Style for success messages
    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Style for danger/error messages
    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the edit cursor
    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    /// Style for borders
    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    /// Style for focused borders
    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for the header
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Get device status style
    #[must_use]
    pub fn status(status: DeviceStatus) -> Style {
        let (r, g, b) = status.color();
        Style::default().fg(Color::Rgb(r, g, b))
    }

    /// Style for the percentage drawn on a chart bar
    #[must_use]
    pub fn bar_value(status: DeviceStatus) -> Style {
        let (r, g, b) = status.color();
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Color::Rgb(r, g, b))
            .add_modifier(Modifier::BOLD)
    }
}
