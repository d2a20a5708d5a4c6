//! Assessment form: symptom checklist plus demographics.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::application::AssessmentRequest;
use crate::domain::{Gender, Severity};
use crate::tui::styles::Theme;

use super::{header_bar, key_hints};

pub const MAX_AGE: u32 = 120;
const DEFAULT_AGE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Symptoms,
    Age,
    Severity,
    Gender,
}

impl FormField {
    const ORDER: [FormField; 4] = [Self::Symptoms, Self::Age, Self::Severity, Self::Gender];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Form state
pub struct FormState {
    pub symptoms: Vec<String>,
    pub checked: Vec<bool>,
    pub cursor: usize,
    pub focus: FormField,
    pub age: u32,
    pub severity: Severity,
    pub gender: Gender,
    pub error_message: Option<String>,
}

impl FormState {
    #[must_use]
    pub fn new(symptoms: &[String]) -> Self {
        Self {
            symptoms: symptoms.to_vec(),
            checked: vec![false; symptoms.len()],
            cursor: 0,
            focus: FormField::Symptoms,
            age: DEFAULT_AGE,
            severity: Severity::Normal,
            gender: Gender::Male,
            error_message: None,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Up/Down: move through the checklist while it has focus.
    pub fn move_cursor(&mut self, down: bool) {
        if self.focus != FormField::Symptoms || self.symptoms.is_empty() {
            return;
        }
        let len = self.symptoms.len();
        self.cursor = if down {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    pub fn toggle_current(&mut self) {
        if self.focus != FormField::Symptoms {
            return;
        }
        if let Some(flag) = self.checked.get_mut(self.cursor) {
            *flag = !*flag;
            self.error_message = None;
        }
    }

    /// Left/Right on the focused scalar field.
    pub fn adjust(&mut self, increase: bool) {
        match self.focus {
            FormField::Symptoms => {}
            FormField::Age => {
                self.age = if increase {
                    (self.age + 1).min(MAX_AGE)
                } else {
                    self.age.saturating_sub(1)
                };
            }
            FormField::Severity => {
                let level = self.severity.level();
                let level = if increase { level + 1 } else { level.saturating_sub(1) };
                if let Some(severity) = Severity::from_level(level) {
                    self.severity = severity;
                }
            }
            FormField::Gender => {
                self.gender = match self.gender {
                    Gender::Male => Gender::Female,
                    _ => Gender::Male,
                };
            }
        }
    }

    /// Type a digit into the age field; values over the maximum restart from the digit.
    pub fn input_digit(&mut self, digit: u32) {
        if self.focus != FormField::Age || digit > 9 {
            return;
        }
        let next = self.age * 10 + digit;
        self.age = if next > MAX_AGE { digit } else { next };
    }

    pub fn delete_digit(&mut self) {
        if self.focus == FormField::Age {
            self.age /= 10;
        }
    }

    #[must_use]
    pub fn selected_symptoms(&self) -> Vec<String> {
        self.symptoms
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Build the request, or explain why the form cannot be submitted.
    pub fn to_request(&self) -> Result<AssessmentRequest, String> {
        let symptoms = self.selected_symptoms();
        if symptoms.is_empty() {
            return Err("Select at least one symptom".to_string());
        }
        Ok(AssessmentRequest {
            symptoms,
            age: self.age,
            severity: self.severity,
            gender: self.gender,
        })
    }
}

/// Render the assessment form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    let selected = state.checked.iter().filter(|c| **c).count();
    let subtitle = format!("{selected} symptom(s) selected");
    f.render_widget(header_bar("New Assessment", &subtitle), chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .margin(1)
        .split(chunks[1]);

    render_checklist(f, columns[0], state);
    render_demographics(f, columns[1], state);
    render_form_footer(f, chunks[2], state);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let (border, title_style) = if focused {
        (Theme::border_focused(), Theme::focused())
    } else {
        (Theme::border(), Theme::text_secondary())
    };
    Block::default()
        .title(Span::styled(format!(" {title} "), title_style))
        .borders(Borders::ALL)
        .border_style(border)
}

fn render_checklist(f: &mut Frame, area: Rect, state: &FormState) {
    let items: Vec<ListItem> = state
        .symptoms
        .iter()
        .zip(&state.checked)
        .map(|(name, checked)| {
            let mark = if *checked { "[x] " } else { "[ ] " };
            let style = if *checked { Theme::success() } else { Theme::text() };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(name.replace('_', " "), style),
            ]))
        })
        .collect();

    let focused = state.focus == FormField::Symptoms;
    let list = List::new(items)
        .block(field_block("Symptoms", focused))
        .highlight_style(if focused { Theme::selected() } else { Theme::text() });

    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_demographics(f: &mut Frame, area: Rect, state: &FormState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let fields = [
        (FormField::Age, "Age", format!("{} years", state.age)),
        (
            FormField::Severity,
            "Severity",
            format!("{} ({})", state.severity.level(), state.severity.label()),
        ),
        (FormField::Gender, "Gender", state.gender.display_name().to_string()),
    ];

    for (i, (field, label, value)) in fields.into_iter().enumerate() {
        let focused = state.focus == field;
        let value_style = if focused { Theme::focused() } else { Theme::text() };
        let content = Paragraph::new(Line::from(vec![
            Span::styled(if focused { " ◀ " } else { "   " }, Theme::text_muted()),
            Span::styled(value, value_style),
            Span::styled(if focused { " ▶" } else { "" }, Theme::text_muted()),
        ]))
        .block(field_block(label, focused));
        f.render_widget(content, rows[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", Theme::danger()),
            Span::styled(err.clone(), Theme::danger()),
        ])
    } else {
        key_hints(&[
            ("Tab", "Next field"),
            ("↑↓", "Move"),
            ("Space", "Toggle"),
            ("←→", "Adjust"),
            ("Enter", "Predict"),
            ("Esc", "Cancel"),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> FormState {
        let names: Vec<String> = ["headache", "nausea", "Fever"].iter().map(|s| (*s).to_string()).collect();
        FormState::new(&names)
    }

    #[test]
    fn test_empty_selection_rejected() {
        let form = state();
        assert_eq!(form.to_request(), Err("Select at least one symptom".to_string()));
    }

    #[test]
    fn test_toggle_and_request() {
        let mut form = state();
        form.toggle_current();
        form.move_cursor(true);
        form.move_cursor(true);
        form.toggle_current();
        form.move_cursor(true);
        assert_eq!(form.cursor, 0);

        let request = form.to_request().expect("Should build request");
        assert_eq!(request.symptoms, vec!["headache".to_string(), "Fever".to_string()]);
        assert_eq!(request.age, DEFAULT_AGE);
        assert_eq!(request.severity, Severity::Normal);
        assert_eq!(request.gender, Gender::Male);

        form.toggle_current();
        assert_eq!(form.selected_symptoms(), vec!["Fever".to_string()]);
    }

    #[test]
    fn test_checklist_keys_ignored_off_focus() {
        let mut form = state();
        for field in [FormField::Age, FormField::Severity, FormField::Gender] {
            form.next_field();
            assert_eq!(form.focus, field);
            form.toggle_current();
            form.move_cursor(true);
            form.move_cursor(false);
        }
        assert!(form.selected_symptoms().is_empty());
        assert_eq!(form.cursor, 0);

        form.next_field();
        form.toggle_current();
        assert_eq!(form.selected_symptoms(), vec!["headache".to_string()]);
    }

    #[test]
    fn test_age_bounds() {
        let mut form = state();
        form.focus = FormField::Age;
        form.age = 0;
        form.adjust(false);
        assert_eq!(form.age, 0);

        form.age = MAX_AGE;
        form.adjust(true);
        assert_eq!(form.age, MAX_AGE);

        form.age = 12;
        form.input_digit(5);
        assert_eq!(form.age, 5);
        form.input_digit(4);
        assert_eq!(form.age, 54);
        form.delete_digit();
        assert_eq!(form.age, 5);
    }

    #[test]
    fn test_severity_stays_in_range() {
        let mut form = state();
        form.focus = FormField::Severity;
        for _ in 0..5 {
            form.adjust(true);
        }
        assert_eq!(form.severity, Severity::High);
        for _ in 0..5 {
            form.adjust(false);
        }
        assert_eq!(form.severity, Severity::Low);
    }

    #[test]
    fn test_field_cycle_and_gender() {
        let mut form = state();
        form.prev_field();
        assert_eq!(form.focus, FormField::Gender);
        form.adjust(true);
        assert_eq!(form.gender, Gender::Female);
        form.adjust(true);
        assert_eq!(form.gender, Gender::Male);
        form.next_field();
        assert_eq!(form.focus, FormField::Symptoms);
    }
}
