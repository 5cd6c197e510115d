//! Application state and core logic

use crate::config::SurveyConfig;
use crate::questions::{HttpQuestionService, QuestionService};
use crate::state::{FetchOutcome, FieldName, Form, FormField, SessionEvent, SubmitStart, SurveySession};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;

/// Main application struct
pub struct App {
    /// The survey being filled in
    pub session: SurveySession,
    /// Whether the app should quit
    quit: bool,
    /// One-line feedback shown in the status bar
    pub status_message: Option<String>,
}

impl App {
    /// Create a new App talking to the configured question service
    pub fn new(config: &SurveyConfig) -> Result<Self> {
        let service = HttpQuestionService::new(config)?;
        tracing::info!(url = service.url(), "using question service");
        Ok(Self::with_service(Arc::new(service)))
    }

    pub fn with_service(service: Arc<dyn QuestionService>) -> Self {
        Self {
            session: SurveySession::new(service),
            quit: false,
            status_message: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Resolve background fetches that finished since the last tick
    pub fn poll_fetches(&mut self) {
        for event in self.session.poll_fetches() {
            match event {
                SessionEvent::Questions(FetchOutcome::Applied { topic, count }) => {
                    self.status_message = Some(format!("Loaded {count} questions for {topic}"));
                }
                SessionEvent::Questions(FetchOutcome::Failed { topic, error }) => {
                    self.status_message =
                        Some(format!("Could not load questions for {topic}: {error}"));
                }
                SessionEvent::Questions(FetchOutcome::Stale(ticket)) => {
                    tracing::trace!(generation = ticket.generation, "ignored superseded questions");
                }
                SessionEvent::Submitted(snapshot) => {
                    self.status_message = Some(format!(
                        "Submitted with {} additional questions",
                        snapshot.questions.len()
                    ));
                }
            }
        }
    }

    /// Handle key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Char('r') if ctrl => self.revalidate(),
            KeyCode::Tab | KeyCode::Down => self.session.store_mut().next_field(),
            KeyCode::BackTab | KeyCode::Up => self.session.store_mut().prev_field(),
            KeyCode::Left => self.edit_focused(|field| field.cycle_choice(false)),
            KeyCode::Right => self.edit_focused(|field| field.cycle_choice(true)),
            KeyCode::Backspace => self.edit_focused(|field| field.without_last_char()),
            KeyCode::Enter => {
                if self.focused_is_multiline() {
                    self.edit_focused(|field| field.with_char('\n'));
                } else {
                    self.session.store_mut().next_field();
                }
            }
            KeyCode::Char(c) if !ctrl => self.edit_focused(|field| field.with_char(c)),
            _ => {}
        }
        Ok(())
    }

    fn focused_is_multiline(&self) -> bool {
        let store = self.session.store();
        store
            .get_field(store.active_field())
            .is_some_and(|field| field.is_multiline())
    }

    /// Compute a new value for the focused field and apply it as one change event
    fn edit_focused(&mut self, edit: impl FnOnce(&FormField) -> Option<String>) {
        let store = self.session.store();
        let Some(name) = store.focused() else {
            return;
        };
        let next = edit(store.values().field(name));
        if let Some(value) = next {
            self.session.apply_change(name, value);
        }
    }

    fn revalidate(&mut self) {
        let count = self.session.revalidate().len();
        self.status_message = Some(attention_message(count));
    }

    /// Start a submit; the summary shows up once its questions resolve
    fn submit(&mut self) {
        match self.session.submit() {
            SubmitStart::Pending(_) => {
                self.status_message = Some("Submitting...".to_string());
            }
            SubmitStart::Rejected(errors) => {
                // Move focus to the first failing field
                if let Some(first) = errors.fields().next() {
                    self.focus(first);
                }
                self.status_message = Some(attention_message(errors.len()));
            }
        }
    }

    fn focus(&mut self, name: FieldName) {
        let store = self.session.store_mut();
        if let Some(index) = store.active_fields().iter().position(|n| *n == name) {
            store.set_active_field(index);
        }
    }
}

fn attention_message(count: usize) -> String {
    match count {
        0 => "No problems found".to_string(),
        1 => "1 field needs attention".to_string(),
        n => format!("{n} fields need attention"),
    }
}
