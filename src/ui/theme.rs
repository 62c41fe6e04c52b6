//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::export::ImageStyle;

/// Which of the two palettes is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Light,
    Dark,
}

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    /// Accent color for highlights and the focused input.
    pub highlight: Color,
    /// Color of the latency line.
    pub line: Color,
    /// Color for axes and their labels.
    pub axis: Color,
    /// Color for a running session and successful replies.
    pub ok: Color,
    /// Color for failed probes and alerts.
    pub failure: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for titles and section headers.
    pub header: Style,
    /// Style for an input being edited.
    pub editing: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            highlight: Color::Cyan,
            line: Color::Rgb(0x1f, 0x77, 0xb4),
            axis: Color::Gray,
            ok: Color::Green,
            failure: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            editing: Style::default().fg(Color::Black).bg(Color::Cyan),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            highlight: Color::Blue,
            line: Color::Rgb(0xff, 0x3b, 0x3b),
            axis: Color::DarkGray,
            ok: Color::Green,
            failure: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            editing: Style::default().fg(Color::White).bg(Color::Blue),
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

    /// Switch between the light and dark palettes.
    pub fn toggled(&self) -> Self {
        match self.kind {
            ThemeKind::Light => Self::dark(),
            ThemeKind::Dark => Self::light(),
        }
    }

    /// Colors for exported chart images matching this palette.
    pub fn image_style(&self) -> ImageStyle {
        match self.kind {
            ThemeKind::Light => ImageStyle::light(),
            ThemeKind::Dark => ImageStyle::dark(),
        }
    }

    /// Style for a single sample value (failures stand out).
    pub fn sample_style(&self, value: f64) -> Style {
        if value == crate::data::FAILED_SAMPLE {
            Style::default().fg(self.failure).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.ok)
        }
    }
}
