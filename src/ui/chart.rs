//! Live latency chart.
//!
//! Redraws the whole line from [`App::chart`] each frame; the axes follow the
//! bounds computed from the current series.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::chart::{SERIES_LABEL, X_TITLE, Y_TITLE};

/// Render the latency chart, or a hint when there is nothing to plot yet.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", SERIES_LABEL))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if app.chart.is_empty() {
        let hint = Paragraph::new("No samples yet. Press s to start pinging.")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let dataset = Dataset::default()
        .name(SERIES_LABEL)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.line))
        .data(&app.chart.points);

    let axis_style = Style::default().fg(app.theme.axis);
    let x_labels: Vec<Span> = app.chart.x_labels().into_iter().map(Span::raw).collect();
    let y_labels: Vec<Span> = app.chart.y_labels().into_iter().map(Span::raw).collect();

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title(Line::from(X_TITLE))
                .style(axis_style)
                .bounds(app.chart.x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Line::from(Y_TITLE))
                .style(axis_style)
                .bounds(app.chart.y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::config::Settings;
    use crate::data::Series;
    use crate::probe::{ProbeError, Prober};
    use crate::sampler::{Sampler, SamplerOptions};
    use crate::ui::Theme;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::runtime::Handle;

    #[derive(Debug)]
    struct Never;

    #[async_trait]
    impl Prober for Never {
        async fn measure(&self, _target: &str) -> Result<f64, ProbeError> {
            Err(ProbeError::Timeout)
        }
    }

    fn app_with(samples: Vec<f64>) -> App {
        let settings = Settings::default();
        let (sampler, events) = Sampler::new(
            Arc::new(Never),
            Series::from_samples(samples),
            SamplerOptions::from(&settings),
            Handle::current(),
        );
        let mut app = App::new(sampler, events, &settings, Theme::dark());
        app.refresh_chart();
        app
    }

    fn rendered_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| crate::ui::draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test]
    async fn test_empty_chart_shows_hint() {
        let text = rendered_text(&app_with(Vec::new()));
        assert!(text.contains("No samples yet"));
    }

    #[tokio::test]
    async fn test_chart_renders_axes() {
        let text = rendered_text(&app_with(vec![10.0, 0.0, 30.0]));
        assert!(text.contains("Latency (ms)"));
        assert!(text.contains("Requests"));
        assert!(!text.contains("No samples yet"));
    }
}
