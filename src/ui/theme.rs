//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and chart lines.
    pub accent: Color,
    /// Fill color for the utilization gauges.
    pub gauge: Color,
    /// Color for the nominal (not throttled) state.
    pub ok: Color,
    /// Color for the throttled state and errors.
    pub alert: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for block titles.
    pub title: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            gauge: Color::Green,
            ok: Color::Green,
            alert: Color::Red,
            border: Color::Gray,
            title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            accent: Color::Blue,
            gauge: Color::Green,
            ok: Color::Green,
            alert: Color::Red,
            border: Color::DarkGray,
            title: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get the style for the throttle indicator
    pub fn throttle_style(&self, throttling: bool) -> Style {
        if throttling {
            Style::default().fg(self.alert).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.ok)
        }
    }
}
