//! Turbine readings input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{FeatureSpec, Observation, FEATURES, FEATURE_COUNT};
use crate::tui::styles::TurbineTheme;

/// Form field: one bounded numeric input
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FeatureSpec,
    /// Committed value, always within the field range
    pub value: f64,
    /// Text being typed, not yet committed
    pub buffer: Option<String>,
}

impl FormField {
    fn new(spec: &'static FeatureSpec) -> Self {
        Self {
            spec,
            value: spec.default,
            buffer: None,
        }
    }

    /// Clamp into range and snap to the display precision.
    fn set(&mut self, value: f64) {
        let rounded = (value * 1000.0).round() / 1000.0;
        // `+ 0.0` turns a rounded -0.0 into 0.0
        self.value = self.spec.clamp(rounded) + 0.0;
    }

    /// Text shown in the input box.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.buffer {
            Some(text) => text.clone(),
            None => self.spec.format(self.value),
        }
    }
}

/// Input form state
pub struct InputFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for InputFormState {
    fn default() -> Self {
        Self {
            fields: FEATURES.iter().map(FormField::new).collect(),
            selected_field: 0,
            error_message: None,
        }
    }
}

impl InputFormState {
    fn current(&mut self) -> &mut FormField {
        &mut self.fields[self.selected_field]
    }

    /// Whether the focused field has uncommitted text
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.fields[self.selected_field].buffer.is_some()
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        let _ = self.commit();
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        let _ = self.commit();
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Step the current value by `steps` increments, saturating at the bounds.
    pub fn step(&mut self, steps: f64) {
        if self.commit().is_err() {
            return;
        }
        let field = self.current();
        let target = field.value + steps * field.spec.step;
        field.set(target);
    }

    /// Jump the current value to its lower bound
    pub fn set_min(&mut self) {
        self.error_message = None;
        let field = self.current();
        field.buffer = None;
        field.value = field.spec.min;
    }

    /// Jump the current value to its upper bound
    pub fn set_max(&mut self) {
        self.error_message = None;
        let field = self.current();
        field.buffer = None;
        field.value = field.spec.max;
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == '-' {
            self.current().buffer.get_or_insert_with(String::new).push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character, starting an edit from the shown value
    pub fn delete_char(&mut self) {
        let field = self.current();
        let mut text = field.display();
        text.pop();
        field.buffer = Some(text);
    }

    /// Drop uncommitted text in the current field
    pub fn cancel_edit(&mut self) {
        self.current().buffer = None;
        self.error_message = None;
    }

    /// Restore the current field to its default
    pub fn reset_field(&mut self) {
        let field = self.current();
        field.buffer = None;
        field.value = field.spec.default;
        self.error_message = None;
    }

    /// Restore every field to its default
    pub fn reset_all(&mut self) {
        for field in self.fields.iter_mut() {
            field.buffer = None;
            field.value = field.spec.default;
        }
        self.error_message = None;
    }

    /// Parse and clamp the current field's typed text.
    ///
    /// On a parse error the previous value is kept and the error is shown.
    pub fn commit(&mut self) -> Result<(), String> {
        let field = self.current();
        let Some(text) = field.buffer.take() else {
            return Ok(());
        };

        match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => {
                field.set(value);
                self.error_message = None;
                Ok(())
            }
            _ => {
                let message = format!("{}: Invalid number {:?}", field.spec.label, text);
                self.error_message = Some(message.clone());
                Err(message)
            }
        }
    }

    /// Commit pending text and snapshot all values into an observation
    pub fn to_observation(&mut self) -> Result<Observation, String> {
        self.commit()?;

        let mut values = [0.0; FEATURE_COUNT];
        for (slot, field) in values.iter_mut().zip(self.fields.iter()) {
            *slot = field.value;
        }
        Ok(Observation::from_array(values))
    }
}

/// Render the input form
pub fn render_input_form(f: &mut Frame, area: Rect, state: &InputFormState) {
    let block = Block::default()
        .title(Span::styled(" Operating Parameters ", TurbineTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(TurbineTheme::border());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let field_height = 3;
    let constraints: Vec<Constraint> = state
        .fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in state.fields.iter().enumerate() {
        render_field(f, chunks[i], field, i == state.selected_field);
    }

    if let Some(err) = &state.error_message {
        let error = Paragraph::new(Line::from(vec![
            Span::styled("! ", TurbineTheme::danger()),
            Span::styled(err.clone(), TurbineTheme::danger()),
        ]));
        f.render_widget(error, chunks[state.fields.len()]);
    }
}

fn render_field(f: &mut Frame, area: Rect, field: &FormField, is_selected: bool) {
    let border_style = if is_selected {
        TurbineTheme::border_focused()
    } else {
        TurbineTheme::border()
    };

    let title_style = if is_selected {
        TurbineTheme::focused()
    } else {
        TurbineTheme::text_secondary()
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", field.spec.label), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(field.display(), TurbineTheme::text()),
    ];
    if is_selected {
        if field.buffer.is_some() {
            spans.push(Span::styled("▌", TurbineTheme::cursor()));
        }
        spans.push(Span::styled(
            format!("  {} [{}, {}]", field.spec.hint, field.spec.min, field.spec.max),
            TurbineTheme::text_muted(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
