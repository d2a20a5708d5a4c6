//! UI module: View components for the TUI.

pub mod dashboard;
pub mod form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::DISCLAIMER;
use crate::tui::styles::Theme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![
        Span::styled("DISCLAIMER: ", Theme::warning()),
        Span::styled(DISCLAIMER, Theme::text_muted()),
    ])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Theme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Key hint line: `[K] Desc [K] Desc ...`.
pub(crate) fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let spans: Vec<Span<'static>> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), Theme::key_hint()),
                Span::styled(format!("{desc} "), Theme::key_desc()),
            ]
        })
        .collect();
    Line::from(spans)
}

pub(crate) fn header_bar<'a>(title: &'a str, subtitle: &'a str) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![
        Span::styled(" ", Theme::text()),
        Span::styled(title, Theme::title()),
        Span::styled(" │ ", Theme::text_muted()),
        Span::styled(subtitle, Theme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    )
}
