//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::{PredictionOutcome, RenderModel, CHART_AXIS_MAX};
use crate::domain::DeviceStatus;
use crate::tui::styles::TurbineTheme;

/// Bar length units per full axis. Bars are integer-valued, so probabilities
/// are drawn at 0.1% resolution.
const CHART_RESOLUTION: u64 = 1000;

/// Result panel state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing predicted for the current inputs
    #[default]
    Idle,
    /// Completed with result
    Complete { model: RenderModel },
    /// Error occurred
    Error { message: String },
}

impl From<PredictionOutcome> for ResultState {
    fn from(outcome: PredictionOutcome) -> Self {
        match outcome {
            PredictionOutcome::Rendered(model) => Self::Complete { model },
            PredictionOutcome::Failed { message } => Self::Error { message },
        }
    }
}

/// Render the result panel
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    match state {
        ResultState::Idle => render_idle(f, area),
        ResultState::Complete { model } => render_complete(f, area, model),
        ResultState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Ready to predict turbine status",
            TurbineTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Adjust the readings, then press ", TurbineTheme::text_muted()),
            Span::styled("[Enter]", TurbineTheme::key_hint()),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(TurbineTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_complete(f: &mut Frame, area: Rect, model: &RenderModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Status + probabilities
            Constraint::Length(7), // Chart
            Constraint::Min(0),    // Advice
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[0]);

    render_status(f, top[0], model);
    render_probabilities(f, top[1], model);
    render_chart(f, chunks[1], model);
    render_advice(f, chunks[2], model);
}

fn render_status(f: &mut Frame, area: Rect, model: &RenderModel) {
    let status_style = TurbineTheme::status(model.status);
    let icon = match model.status {
        DeviceStatus::Normal => "OK",
        DeviceStatus::Malfunction => "!",
    };

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} {}", icon, model.status.label().to_uppercase()),
            status_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            model.rendered_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            TurbineTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Prediction ", TurbineTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(status_style),
    );

    f.render_widget(content, area);
}

fn render_probabilities(f: &mut Frame, area: Rect, model: &RenderModel) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Normal probability:      ", TurbineTheme::text_secondary()),
            Span::styled(model.normal_percent.as_str(), TurbineTheme::text()),
        ]),
        Line::from(vec![
            Span::styled(" Malfunction probability: ", TurbineTheme::text_secondary()),
            Span::styled(model.malfunction_percent.as_str(), TurbineTheme::text()),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Probabilities ", TurbineTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(TurbineTheme::border()),
    );

    f.render_widget(content, area);
}

/// Scale a probability onto the fixed integer axis.
fn bar_length(value: f64) -> u64 {
    let fraction = (value / CHART_AXIS_MAX).clamp(0.0, 1.0);
    (fraction * CHART_RESOLUTION as f64).round() as u64
}

fn render_chart(f: &mut Frame, area: Rect, model: &RenderModel) {
    let bars: Vec<Bar> = model
        .chart
        .iter()
        .map(|bar| {
            Bar::default()
                .label(Line::from(bar.label))
                .value(bar_length(bar.value))
                .text_value(bar.annotation.clone())
                .style(TurbineTheme::status(bar.status))
                .value_style(TurbineTheme::bar_value(bar.status))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(" Probability Distribution ", TurbineTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(TurbineTheme::border()),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .max(CHART_RESOLUTION)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}

fn render_advice(f: &mut Frame, area: Rect, model: &RenderModel) {
    let style = TurbineTheme::status(model.status);

    let mut lines = vec![Line::from(Span::styled(
        model.advice.headline,
        style.add_modifier(Modifier::BOLD),
    ))];
    for (i, step) in model.advice.steps.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}. ", i + 1), style),
            Span::styled(*step, TurbineTheme::text()),
        ]));
    }

    let content = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(" Maintenance Advice ", TurbineTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(style),
    );

    f.render_widget(content, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", TurbineTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, TurbineTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(TurbineTheme::danger()),
    );

    f.render_widget(content, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_length_uses_fixed_axis() {
        assert_eq!(bar_length(0.0), 0);
        assert_eq!(bar_length(1.0), CHART_RESOLUTION);
        assert_eq!(bar_length(0.14185), 142);
        assert_eq!(bar_length(1.5), CHART_RESOLUTION);
    }
}
