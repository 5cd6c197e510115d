//! Side panel: supplementary questions and the submission summary

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn bullet(text: &str) -> Line<'_> {
    Line::from(vec![
        Span::styled("  • ", Style::default().fg(Color::Cyan)),
        Span::raw(text),
    ])
}

/// Draw the side panel
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let topic = session.store().topic();

    let mut content = vec![heading("Supplementary Questions"), Line::from("")];

    let questions = session.displayed_questions();
    if !topic.is_selected() {
        content.push(Line::from(Span::styled(
            "Select a survey topic.",
            Style::default().fg(Color::DarkGray),
        )));
    } else if questions.is_empty() {
        content.push(Line::from(Span::styled(
            format!("No questions for {topic} yet."),
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        content.extend(questions.iter().map(|q| bullet(q)));
    }

    if let Some(snapshot) = session.snapshot() {
        content.push(Line::from(""));
        content.push(heading("Submission Summary"));
        content.push(Line::from(Span::styled(
            snapshot.submitted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            Style::default().fg(Color::DarkGray),
        )));
        for (label, value) in snapshot.summary_lines() {
            content.push(Line::from(vec![
                Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
                Span::raw(value),
            ]));
        }

        if !snapshot.questions.is_empty() {
            content.push(Line::from(""));
            content.push(heading("Additional Questions"));
            content.extend(snapshot.questions.iter().map(|q| bullet(q)));
        }
    }

    let fetcher = session.fetcher();
    if fetcher.failures() > 0 || fetcher.stale_discards() > 0 {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!(
                "fetches: {} issued, {} failed, {} superseded",
                fetcher.latest_generation(),
                fetcher.failures(),
                fetcher.stale_discards()
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(" Summary ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
