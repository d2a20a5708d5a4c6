//! Result view: prediction, confidence gauge and recommendations.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::Assessment;
use crate::tui::styles::Theme;

use super::{header_bar, key_hints};

/// Result screen state
pub struct ResultState {
    pub assessment: Assessment,
    /// Outcome of the last export, shown in the footer
    pub status: Option<Result<String, String>>,
}

impl ResultState {
    #[must_use]
    pub fn new(assessment: Assessment) -> Self {
        Self {
            assessment,
            status: None,
        }
    }
}

pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(9), // Prediction
            Constraint::Min(0),    // Recommendations
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let saved = match state.assessment.id {
        Some(_) => "Saved",
        None => "Not saved",
    };
    f.render_widget(header_bar("Assessment Result", saved), chunks[0]);
    render_prediction(f, chunks[1], &state.assessment);
    render_recommendations(f, chunks[2], &state.assessment);
    render_result_footer(f, chunks[3], state);
}

fn render_prediction(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let block = Block::default()
        .title(Span::styled(" Predicted Condition ", Theme::subtitle()))
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Disease
            Constraint::Length(3), // Confidence
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let prediction = &assessment.prediction;
    let style = Theme::confidence(prediction.confidence);

    let disease = Paragraph::new(Line::from(Span::styled(
        prediction.disease.clone(),
        style.add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(disease, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Confidence ", Theme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .gauge_style(style)
        .ratio(prediction.confidence.clamp(0.0, 1.0))
        .label(prediction.confidence_percent());
    f.render_widget(gauge, chunks[1]);
}

fn section<'a>(title: &'a str, items: &'a [String]) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(title, Theme::focused()))];
    lines.extend(items.iter().map(|item| {
        Line::from(vec![
            Span::styled("  - ", Theme::text_muted()),
            Span::styled(item.as_str(), Theme::accent()),
        ])
    }));
    lines.push(Line::from(""));
    lines
}

fn render_recommendations(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let rec = &assessment.recommendations;
    let mut lines = section("Recommended Herbs", &rec.herbs);
    lines.extend(section("Lifestyle", &rec.lifestyle));
    lines.extend(section("Diet", &rec.diet));

    let content = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled(" Ayurvedic Recommendations ", Theme::subtitle()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match &state.status {
        Some(Ok(message)) => Line::from(Span::styled(message.clone(), Theme::success())),
        Some(Err(message)) => Line::from(vec![
            Span::styled("! ", Theme::danger()),
            Span::styled(message.clone(), Theme::danger()),
        ]),
        None => key_hints(&[("E", "Export report"), ("N", "New assessment"), ("Esc", "Dashboard")]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );

    f.render_widget(footer, area);
}
