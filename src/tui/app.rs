//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
use std::path::PathBuf;
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
    Terminal,
};

use crate::adapters::csv::load_prescriptions;
use crate::adapters::sqlite::SqliteStorage;
use crate::adapters::tree::DecisionTreeClassifier;
use crate::application::{export_report, AssessmentService, DiseasePredictor};
use crate::config::AppConfig;
use crate::domain::SymptomVocabulary;

use super::ui::{
    dashboard::{render_dashboard, DashboardState, RecentRow},
    form::{render_form, FormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

const RECENT_LIMIT: usize = 10;

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Form,
    Result,
}

type Service = AssessmentService<DecisionTreeClassifier, SqliteStorage>;

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,
    service: Service,
    report_dir: PathBuf,
    dashboard_state: DashboardState,
    form_state: FormState,
    result_state: Option<ResultState>,
}

impl App {
    /// Load the dataset, train the predictor and open the database.
    ///
    /// # Errors
    /// Returns error if the dataset cannot be loaded, training fails, or the
    /// database cannot be opened.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let records = load_prescriptions(&config.dataset_path)
            .with_context(|| format!("Failed to load dataset from {:?}", config.dataset_path))?;
        let predictor = DiseasePredictor::train(records, SymptomVocabulary::standard(), config.split_seed)
            .context("Failed to train predictor")?;

        let storage = SqliteStorage::new(&config.db_path)
            .with_context(|| format!("Failed to open database {:?}", config.db_path))?;

        let service = AssessmentService::new(Arc::new(predictor), Arc::new(storage));
        Ok(Self::with_service(service, config.report_dir.clone()))
    }

    /// Create application around an existing service (Composition Root pattern).
    #[must_use]
    pub fn with_service(service: Service, report_dir: PathBuf) -> Self {
        let form_state = FormState::new(service.predictor().vocabulary().names());
        let mut app = Self {
            screen: Screen::Dashboard,
            should_quit: false,
            service,
            report_dir,
            dashboard_state: DashboardState::default(),
            form_state,
            result_state: None,
        };
        app.update_dashboard_state();
        app
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, chunks[0], &self.dashboard_state),
                    Screen::Form => render_form(f, chunks[0], &self.form_state),
                    Screen::Result => {
                        if let Some(state) = &self.result_state {
                            render_result(f, chunks[0], state);
                        }
                    }
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
                return;
            }
            KeyCode::Enter => {
                self.submit_form();
                return;
            }
            _ => {}
        }

        let form = &mut self.form_state;
        match key {
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Up => form.move_cursor(false),
            KeyCode::Down => form.move_cursor(true),
            KeyCode::Left => form.adjust(false),
            KeyCode::Right => form.adjust(true),
            KeyCode::Char(' ') => form.toggle_current(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                form.input_digit(c.to_digit(10).unwrap_or(0));
            }
            KeyCode::Backspace => form.delete_digit(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_current(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(),
            KeyCode::Esc => {
                self.update_dashboard_state();
                self.screen = Screen::Dashboard;
            }
            _ => {}
        }
    }

    fn open_form(&mut self) {
        self.form_state = FormState::new(self.service.predictor().vocabulary().names());
        self.screen = Screen::Form;
    }

    fn submit_form(&mut self) {
        let request = match self.form_state.to_request() {
            Ok(request) => request,
            Err(message) => {
                self.form_state.error_message = Some(message);
                return;
            }
        };

        match self.service.assess(request) {
            Ok(assessment) => {
                self.result_state = Some(ResultState::new(assessment));
                self.screen = Screen::Result;
            }
            Err(e) => {
                tracing::error!("Assessment failed: {}", e);
                self.form_state.error_message = Some(e.to_string());
            }
        }
    }

    fn export_current(&mut self) {
        let Some(state) = self.result_state.as_mut() else {
            return;
        };
        state.status = Some(
            export_report(&state.assessment, &self.report_dir)
                .map(|path| format!("Report written to {}", path.display()))
                .map_err(|e| {
                    tracing::error!("Report export failed: {}", e);
                    format!("Export failed: {e}")
                }),
        );
    }

    fn update_dashboard_state(&mut self) {
        let state = &mut self.dashboard_state;
        state.report = self.service.predictor().training_report().cloned();
        state.storage_error = None;

        match self.service.count() {
            Ok(count) => state.saved_count = count,
            Err(e) => {
                tracing::warn!("Failed to count assessments: {}", e);
                state.storage_error = Some("Storage unavailable".to_string());
            }
        }

        match self.service.recent(RECENT_LIMIT) {
            Ok(recent) => state.recent = recent.iter().map(RecentRow::from).collect(),
            Err(e) => {
                tracing::warn!("Failed to load recent assessments: {}", e);
                state.recent.clear();
                state.storage_error = Some("Storage unavailable".to_string());
            }
        }
    }
}
