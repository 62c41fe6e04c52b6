//! Common UI components shared across the screen.
//!
//! This module contains the header bar, input row, status bar, and the help
//! and alert overlays.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Field};
use crate::data::stats::format_latency;

/// Render the header bar with session state and statistics.
///
/// Displays: running indicator, target, interval, sample count, loss, min/avg/max.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let stats = &app.stats;

    let (status_icon, status_label, status_style) = if session.enabled {
        ("●", "RUNNING", Style::default().fg(app.theme.ok))
    } else {
        ("○", "STOPPED", Style::default().add_modifier(Modifier::DIM))
    };

    let loss_style = if stats.failures > 0 {
        Style::default().fg(app.theme.failure)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("PINGPLOT ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(status_label, status_style),
        Span::raw(format!(
            " {} every {}s │ ",
            session.target,
            session.interval.as_secs_f64()
        )),
        Span::styled(
            format!("{}", stats.count),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" samples │ loss "),
        Span::styled(format!("{:.0}%", stats.loss_percent), loss_style),
        Span::raw(format!(
            " │ min/avg/max {}/{}/{}",
            format_latency(stats.min),
            format_latency(stats.avg),
            format_latency(stats.max)
        )),
    ];

    if let Some(last) = stats.last {
        spans.push(Span::raw(" │ last "));
        let text = if last == crate::data::FAILED_SAMPLE {
            "fail".to_string()
        } else {
            format_latency(Some(last))
        };
        spans.push(Span::styled(text, app.theme.sample_style(last)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the target and interval inputs side by side.
pub fn render_inputs(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::horizontal([Constraint::Fill(3), Constraint::Fill(1)]).split(area);

    render_input(frame, app, Field::Target, &app.target_input, chunks[0]);
    render_input(frame, app, Field::Interval, &app.interval_input, chunks[1]);
}

fn render_input(frame: &mut Frame, app: &App, field: Field, value: &str, area: Rect) {
    let focused = app.focus == field;
    let editing = focused && app.editing;

    let border_style = if focused {
        Style::default().fg(app.theme.highlight)
    } else {
        Style::default().fg(app.theme.border)
    };

    let block = Block::default()
        .title(format!(" {} ", field.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);

    let content = if editing {
        Line::from(vec![
            Span::styled(value.to_string(), app.theme.editing),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else {
        Line::from(value.to_string())
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Render the status bar at the bottom.
///
/// Shows a temporary status message if one is active, otherwise the time
/// since the last sample and the available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.editing {
        "Type to edit | Enter/Esc:done Tab:switch field"
    } else {
        "s:start x:stop p:png c:csv e:edit Tab:field t:theme ?:help q:quit"
    };

    let status = match app.last_sample_at {
        Some(at) => format!(
            " Last sample {:.1}s ago | {}",
            at.elapsed().as_secs_f64(),
            controls
        ),
        None => format!(" {}", controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the chart.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Session",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  s/Enter   Start pinging"),
        Line::from("  x         Stop pinging"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Inputs",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab       Switch target/interval"),
        Line::from("  e/i       Edit focused input"),
        Line::from("  Enter/Esc Finish editing"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Export",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  p         Chart as PNG"),
        Line::from("  c         Samples as CSV"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  t         Toggle light/dark"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let help_area = centered(area, 42, 26);
    frame.render_widget(Clear, help_area);
    frame.render_widget(Paragraph::new(help_text).block(block), help_area);
}

/// Render the consecutive-failure alert as a modal.
pub fn render_alert(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref message) = app.alert else {
        return;
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.clone(),
            Style::default().fg(app.theme.failure).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Alert ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.failure));

    let alert_area = centered(area, 44, 6);
    frame.render_widget(Clear, alert_area);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        alert_area,
    );
}

/// Shown instead of the UI when the terminal is below the minimum size.
pub fn render_too_small(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width,
        area.height,
        super::MIN_WIDTH,
        super::MIN_HEIGHT
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    let top = (area.height / 2).saturating_sub(2);
    let centered = Rect::new(area.x, area.y + top, area.width, 5.min(area.height - top));
    frame.render_widget(paragraph, centered);
}

/// A rectangle of at most `width`x`height` centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered(area, 42, 26);
        assert_eq!(rect.width, 42);
        assert_eq!(rect.height, 22);
        assert_eq!(rect.x, 19);
        assert_eq!(rect.y, 1);
    }

    #[test]
    fn test_centered_shrinks_on_small_terminal() {
        let area = Rect::new(0, 0, 30, 8);
        let rect = centered(area, 44, 6);
        assert_eq!(rect.width, 26);
        assert_eq!(rect.height, 6);
        assert!(rect.right() <= area.right());
    }
}
