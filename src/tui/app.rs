//! Main TUI application state machine.
//!
//! Handles:
//! - Input event handling
//! - Form editing
//! - Synchronous prediction on [Enter]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::xgboost::XgboostClassifier;
use crate::application::PredictionService;
use crate::config::AppConfig;
use crate::ports::Classifier;

use super::ui::{
    body_columns,
    form::{render_input_form, InputFormState},
    render_footer, render_header, render_help,
    result::{render_result, ResultState},
};

/// PgUp/PgDn move this many steps at once.
const COARSE_STEPS: f64 = 100.0;

/// Main application state
pub struct App<C>
where
    C: Classifier,
{
    /// Whether the app should quit
    should_quit: bool,

    /// Prediction service over the loaded model
    service: PredictionService<C>,

    /// Input form state
    form_state: InputFormState,

    /// Result panel state
    result_state: ResultState,

    /// Whether the usage overlay is open
    show_help: bool,

    /// One-line model description for the footer
    model_summary: String,
}

impl App<XgboostClassifier> {
    /// Create a new application, loading the model named by `config`.
    ///
    /// # Errors
    /// Returns error if the model cannot be loaded or verified. The dashboard
    /// cannot serve any request without it.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let model = crate::load_classifier(config)
            .with_context(|| format!("Failed to load model from {:?}", config.model_path))?;

        let info = model.info();
        let model_summary = format!(
            "Windguard v{} │ XGBoost {} │ {} trees │ {}",
            env!("CARGO_PKG_VERSION"),
            info.xgboost_version.as_deref().unwrap_or("(unknown version)"),
            info.num_trees,
            if info.verified {
                "digest verified"
            } else {
                "unverified"
            }
        );

        Self::with_dependencies(PredictionService::new(Arc::new(model)), model_summary)
    }
}

impl<C> App<C>
where
    C: Classifier,
{
    /// Create application with injected dependencies.
    ///
    /// # Errors
    /// Returns error if initialization fails.
    pub fn with_dependencies(
        service: PredictionService<C>,
        model_summary: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            should_quit: false,
            service,
            form_state: InputFormState::default(),
            result_state: ResultState::default(),
            show_help: false,
            model_summary: model_summary.into(),
        })
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the whole dashboard into one frame.
    pub fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Body
                Constraint::Length(3), // Footer
            ])
            .split(f.area());

        render_header(f, chunks[0]);

        let (form_area, result_area) = body_columns(chunks[1]);
        render_input_form(f, form_area, &self.form_state);
        render_result(f, result_area, &self.result_state);

        render_footer(
            f,
            chunks[2],
            self.form_state.is_editing(),
            &self.model_summary,
        );

        if self.show_help {
            render_help(f, chunks[1]);
        }
    }

    /// Whether a quit was requested.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Current result panel state.
    #[must_use]
    pub fn result_state(&self) -> &ResultState {
        &self.result_state
    }

    /// Current form state.
    #[must_use]
    pub fn form_state(&self) -> &InputFormState {
        &self.form_state
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match key {
            KeyCode::Esc => {
                if self.form_state.is_editing() {
                    self.form_state.cancel_edit();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
            }
            KeyCode::Enter => {
                self.submit();
            }
            _ => self.handle_edit_key(key),
        }
    }

    /// Keys that change a value. Any change invalidates the shown result.
    fn handle_edit_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => self.form_state.step(-1.0),
            KeyCode::Right => self.form_state.step(1.0),
            KeyCode::PageDown => self.form_state.step(-COARSE_STEPS),
            KeyCode::PageUp => self.form_state.step(COARSE_STEPS),
            KeyCode::Home => self.form_state.set_min(),
            KeyCode::End => self.form_state.set_max(),
            KeyCode::Delete => self.form_state.reset_field(),
            KeyCode::Char('d') | KeyCode::Char('D') => self.form_state.reset_all(),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                self.form_state.input_char(c)
            }
            _ => return,
        }

        self.result_state = ResultState::Idle;
    }

    fn submit(&mut self) {
        match self.form_state.to_observation() {
            Ok(observation) => {
                self.result_state = self.service.predict(observation).into();
            }
            Err(e) => {
                tracing::debug!("Form not submitted: {}", e);
                self.result_state = ResultState::Idle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FailingClassifier, TemperatureClassifier};
    use crate::domain::DeviceStatus;
    use ratatui::backend::TestBackend;

    fn app_with<C: Classifier>(classifier: C) -> App<C> {
        App::with_dependencies(PredictionService::new(Arc::new(classifier)), "test model")
            .expect("App should build")
    }

    fn press(app: &mut App<impl Classifier>, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key, KeyModifiers::NONE);
        }
    }

    fn type_text(app: &mut App<impl Classifier>, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    fn screen_text(app: &App<impl Classifier>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).expect("terminal");
        terminal.draw(|f| app.draw(f)).expect("draw");
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_enter_predicts_with_current_values() {
        let mut app = app_with(TemperatureClassifier);
        press(&mut app, &[KeyCode::Down; 5]);
        type_text(&mut app, "75");
        press(&mut app, &[KeyCode::Enter]);

        match app.result_state() {
            ResultState::Complete { model } => {
                assert_eq!(model.status, DeviceStatus::Malfunction);
                assert_eq!(model.observation.int_tmp, 75.0);
            }
            other => panic!("Expected result, got {other:?}"),
        }
    }

    #[test]
    fn test_edit_clears_previous_result() {
        let mut app = app_with(TemperatureClassifier);
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.result_state(), ResultState::Complete { .. }));

        press(&mut app, &[KeyCode::Right]);
        assert!(matches!(app.result_state(), ResultState::Idle));

        // Navigation alone keeps the result.
        press(&mut app, &[KeyCode::Enter, KeyCode::Down]);
        assert!(matches!(app.result_state(), ResultState::Complete { .. }));
    }

    #[test]
    fn test_failure_shows_error_and_recovers() {
        let mut app = app_with(FailingClassifier("model exploded"));
        press(&mut app, &[KeyCode::Enter]);

        match app.result_state() {
            ResultState::Error { message } => assert!(message.contains("model exploded")),
            other => panic!("Expected error, got {other:?}"),
        }

        let screen = screen_text(&app);
        assert!(screen.contains("model exploded"));
        assert!(!screen.contains("Maintenance Advice"));
        assert!(!screen.contains("Probability Distribution"));
        assert!(!app.should_quit());
    }

    #[test]
    fn test_invalid_typed_value_blocks_prediction() {
        let mut app = app_with(TemperatureClassifier);
        type_text(&mut app, "1-2");
        press(&mut app, &[KeyCode::Enter]);

        assert!(matches!(app.result_state(), ResultState::Idle));
        assert!(app.form_state().error_message.is_some());
    }

    #[test]
    fn test_bounds_via_home_and_end() {
        let mut app = app_with(TemperatureClassifier);
        press(&mut app, &[KeyCode::Down; 5]);
        press(&mut app, &[KeyCode::End, KeyCode::Enter]);
        match app.result_state() {
            ResultState::Complete { model } => assert_eq!(model.observation.int_tmp, 80.0),
            other => panic!("Expected result, got {other:?}"),
        }

        press(&mut app, &[KeyCode::Home, KeyCode::Enter]);
        match app.result_state() {
            ResultState::Complete { model } => assert_eq!(model.observation.int_tmp, -5.0),
            other => panic!("Expected result, got {other:?}"),
        }
    }

    #[test]
    fn test_rendered_result_on_screen() {
        let mut app = app_with(TemperatureClassifier);
        press(&mut app, &[KeyCode::Enter]);

        // Default internal temp 45 maps to p = 50/85.
        let screen = screen_text(&app);
        assert!(screen.contains("MALFUNCTION"));
        assert!(screen.contains("Probability Distribution"));
        assert!(screen.contains("Maintenance Advice"));
        assert!(screen.contains("58.824%"));
        assert!(screen.contains("41.176%"));
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app_with(TemperatureClassifier);
        press(&mut app, &[KeyCode::Char('?'), KeyCode::Enter, KeyCode::Char('q')]);
        assert!(matches!(app.result_state(), ResultState::Idle));
        assert!(!app.should_quit());
        assert!(screen_text(&app).contains("How to use"));

        press(&mut app, &[KeyCode::Esc, KeyCode::Char('q')]);
        assert!(app.should_quit());
    }

    #[test]
    fn test_footer_hints_follow_edit_mode() {
        let mut app = app_with(TemperatureClassifier);
        assert!(screen_text(&app).contains("[Enter] Predict"));

        type_text(&mut app, "1");
        let screen = screen_text(&app);
        assert!(screen.contains("[Tab] Commit & Next"));
        assert!(screen.contains("[Esc] Cancel Edit"));
    }

    #[test]
    fn test_escape_cancels_edit_before_quitting() {
        let mut app = app_with(TemperatureClassifier);
        type_text(&mut app, "2.5");
        press(&mut app, &[KeyCode::Esc]);
        assert!(!app.should_quit());
        assert_eq!(app.form_state().fields[0].value, 0.0);

        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit());
    }
}
