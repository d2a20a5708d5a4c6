//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::adapters::tree::{format_accuracy, TrainingReport};
use crate::domain::Assessment;
use crate::tui::styles::Theme;

use super::{header_bar, key_hints};

/// One row of the recent predictions table.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentRow {
    pub when: String,
    pub disease: String,
    pub confidence: String,
}

impl From<&Assessment> for RecentRow {
    fn from(a: &Assessment) -> Self {
        Self {
            when: a
                .created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            disease: a.prediction.disease.clone(),
            confidence: a.prediction.confidence_percent(),
        }
    }
}

/// Dashboard state for rendering.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub report: Option<TrainingReport>,
    pub saved_count: usize,
    pub recent: Vec<RecentRow>,
    /// Set when storage could not be read
    pub storage_error: Option<String>,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(2), // Keys
        ])
        .split(area);

    f.render_widget(
        header_bar("Ayurdx", "Symptom-based Disease Prediction"),
        chunks[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_model_status(f, columns[0], state);
    render_recent(f, columns[1], state);

    f.render_widget(
        Paragraph::new(key_hints(&[("N", "New assessment"), ("Q", "Quit")])),
        chunks[2],
    );
}

fn status_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label}: "), Theme::text_secondary()),
        Span::styled(value, Theme::text()),
    ])
}

fn render_model_status(f: &mut Frame, area: Rect, state: &DashboardState) {
    let mut lines = Vec::new();
    match &state.report {
        Some(report) => {
            lines.push(Line::from(Span::styled("  OK Model trained", Theme::success())));
            lines.push(status_line("Diseases", report.labels.to_string()));
            lines.push(status_line(
                "Split (train/val/test)",
                format!(
                    "{}/{}/{}",
                    report.train_size, report.validation_size, report.test_size
                ),
            ));
            lines.push(status_line("Tree depth", report.depth.to_string()));
            lines.push(status_line("Validation accuracy", format_accuracy(report.validation_accuracy)));
            lines.push(status_line("Test accuracy", format_accuracy(report.test_accuracy)));
            lines.push(status_line("Seed", report.seed.to_string()));
        }
        None => lines.push(Line::from(Span::styled("  FAIL Model not trained", Theme::danger()))),
    }
    lines.push(Line::from(""));
    lines.push(status_line("Saved assessments", state.saved_count.to_string()));
    if let Some(err) = &state.storage_error {
        lines.push(Line::from(Span::styled(format!("  ! {err}"), Theme::danger())));
    }

    let block = Block::default()
        .title(Span::styled(" Model Status ", Theme::subtitle()))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_recent(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(Span::styled(" Recent Predictions ", Theme::subtitle()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if state.recent.is_empty() {
        let empty_msg = Paragraph::new(Line::from(Span::styled(
            "No assessments yet. Press [N] to start.",
            Theme::text_muted(),
        )))
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    }

    let rows = state.recent.iter().map(|r| {
        Row::new(vec![
            Cell::from(Span::styled(r.when.clone(), Theme::text_muted())),
            Cell::from(Span::styled(r.disease.clone(), Theme::text())),
            Cell::from(Span::styled(r.confidence.clone(), Theme::accent())),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(17),
            Constraint::Min(12),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(vec!["When", "Disease", "Conf."]).style(Theme::focused()))
    .block(block);

    f.render_widget(table, area);
}
