//! UI module: View components for the TUI.

pub mod form;
pub mod result;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::TurbineTheme;

pub fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Windguard ", TurbineTheme::header()),
        Span::styled(" │ ", TurbineTheme::text_muted()),
        Span::styled("Turbine Status Prediction", TurbineTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(TurbineTheme::border()),
    );

    f.render_widget(header, area);
}

/// Key hints on the first line, model provenance on the second.
pub fn render_footer(f: &mut Frame, area: Rect, editing: bool, model_summary: &str) {
    let hints = if editing {
        Line::from(vec![
            Span::styled("[Enter] ", TurbineTheme::key_hint()),
            Span::styled("Commit & Predict ", TurbineTheme::key_desc()),
            Span::styled("[Tab] ", TurbineTheme::key_hint()),
            Span::styled("Commit & Next ", TurbineTheme::key_desc()),
            Span::styled("[Esc] ", TurbineTheme::key_hint()),
            Span::styled("Cancel Edit", TurbineTheme::key_desc()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", TurbineTheme::key_hint()),
            Span::styled("Field ", TurbineTheme::key_desc()),
            Span::styled("[←→] ", TurbineTheme::key_hint()),
            Span::styled("±0.001 ", TurbineTheme::key_desc()),
            Span::styled("[PgUp/PgDn] ", TurbineTheme::key_hint()),
            Span::styled("±0.1 ", TurbineTheme::key_desc()),
            Span::styled("[Home/End] ", TurbineTheme::key_hint()),
            Span::styled("Min/Max ", TurbineTheme::key_desc()),
            Span::styled("[D] ", TurbineTheme::key_hint()),
            Span::styled("Defaults ", TurbineTheme::key_desc()),
            Span::styled("[Enter] ", TurbineTheme::key_hint()),
            Span::styled("Predict ", TurbineTheme::key_desc()),
            Span::styled("[?] ", TurbineTheme::key_hint()),
            Span::styled("Help ", TurbineTheme::key_desc()),
            Span::styled("[Q] ", TurbineTheme::key_hint()),
            Span::styled("Quit", TurbineTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(vec![
        hints,
        Line::from(Span::styled(model_summary, TurbineTheme::text_muted())),
    ])
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(TurbineTheme::border()),
    );

    f.render_widget(footer, area);
}

/// Usage instructions drawn over the dashboard.
pub fn render_help(f: &mut Frame, area: Rect) {
    let [popup] = Layout::horizontal([Constraint::Percentage(70)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(20)])
        .flex(Flex::Center)
        .areas(popup);

    let heading = |text: &'static str| Line::from(Span::styled(text, TurbineTheme::subtitle()));
    let item = |text: &'static str| Line::from(Span::styled(text, TurbineTheme::text()));

    let text = vec![
        heading("How to use"),
        item("  1. Enter the turbine's live readings in the left panel"),
        item("  2. Press [Enter] to run the prediction"),
        item("  3. Review the status, probabilities and maintenance advice"),
        Line::from(""),
        heading("Parameters (all accept three decimals)"),
        item("  Yaw position: angle between nacelle heading and wind direction"),
        item("  Environment / internal temp: ambient and core component temperature"),
        item("  Output power, wind speed: standardized values"),
        item("  Pitch 2 / 3 angle: live blade pitch angles"),
        Line::from(""),
        heading("Reading the result"),
        Line::from(vec![
            Span::styled("  NORMAL", TurbineTheme::success()),
            Span::styled(" (green): operating within safe parameters", TurbineTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  MALFUNCTION", TurbineTheme::danger()),
            Span::styled(" (red): potential fault risk detected", TurbineTheme::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled("[?] or [Esc] to close", TurbineTheme::text_muted()))
            .alignment(Alignment::Right),
    ];

    let help = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(" Usage ", TurbineTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(TurbineTheme::border_focused()),
    );

    f.render_widget(Clear, popup);
    f.render_widget(help, popup);
}

/// Split the body into the form column and the result column.
#[must_use]
pub fn body_columns(area: Rect) -> (Rect, Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(area);
    (columns[0], columns[1])
}
