//! Survey form rendering

use super::field_renderer::draw_field;
use crate::app::App;
use crate::state::{Form, MIN_FEEDBACK_CHARS};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the active fields for the current topic
pub fn draw_survey_form(frame: &mut Frame, area: Rect, app: &App) {
    let store = app.session.store();

    let block = Block::default()
        .title(" Survey ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let mut constraints: Vec<Constraint> = (0..store.field_count())
        .filter_map(|index| store.get_field(index))
        .map(|field| {
            if field.is_multiline() {
                Constraint::Min(5)
            } else {
                Constraint::Length(3)
            }
        })
        .collect();
    constraints.push(Constraint::Length(1)); // Help text

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    let errors = store.current_errors();
    for index in 0..store.field_count() {
        if let Some(field) = store.get_field(index) {
            draw_field(
                frame,
                chunks[index],
                field,
                store.active_field() == index,
                errors.get(field.name()),
            );
        }
    }

    let help_spans = help_spans(app);
    let help = Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    if let Some(help_area) = chunks.last() {
        frame.render_widget(help, *help_area);
    }
}

/// Key hints for the focused field
fn help_spans(app: &App) -> Vec<Span<'static>> {
    let store = app.session.store();
    let focused = store.get_field(store.active_field());
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));

    let mut spans = vec![key("Tab"), Span::raw(": next  ")];
    match focused {
        Some(field) if field.is_choice() => {
            spans.push(key("←/→"));
            spans.push(Span::raw(": choose  "));
        }
        Some(field) if field.is_multiline() => {
            let count = field.as_text().chars().count();
            spans.push(Span::raw(format!("{count}/{MIN_FEEDBACK_CHARS} chars  ")));
        }
        _ => {}
    }
    spans.extend([
        key("Ctrl+S"),
        Span::raw(": submit  "),
        key("Ctrl+R"),
        Span::raw(": check"),
    ]);
    spans
}
