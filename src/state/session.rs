//! One survey session: the single owner of form state
//!
//! Topic changes dispatch background fetches; their completions come back
//! over a channel and are resolved here, on the owner's side, so the
//! staleness check always sees the latest state.

use super::fetcher::{FetchCompletion, FetchOutcome, FetchTicket, QuestionFetcher};
use super::forms::{ErrorMap, FieldName, FormError, FormStateStore, Topic};
use super::submission::{SubmissionCoordinator, SubmissionSnapshot, SubmitStart};
use crate::questions::QuestionService;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Something that happened while resolving finished fetches
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A question fetch was applied, failed or discarded
    Questions(FetchOutcome),
    /// The pending submit froze its snapshot
    Submitted(SubmissionSnapshot),
}

pub struct SurveySession {
    store: FormStateStore,
    fetcher: QuestionFetcher,
    coordinator: SubmissionCoordinator,
    service: Arc<dyn QuestionService>,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
}

impl SurveySession {
    pub fn new(service: Arc<dyn QuestionService>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            store: FormStateStore::new(),
            fetcher: QuestionFetcher::new(),
            coordinator: SubmissionCoordinator::new(),
            service,
            completions_tx,
            completions_rx,
        }
    }

    pub fn store(&self) -> &FormStateStore {
        &self.store
    }

    /// Mutable access for focus movement
    pub fn store_mut(&mut self) -> &mut FormStateStore {
        &mut self.store
    }

    pub fn fetcher(&self) -> &QuestionFetcher {
        &self.fetcher
    }

    pub fn snapshot(&self) -> Option<&SubmissionSnapshot> {
        self.coordinator.snapshot()
    }

    /// Supplementary questions to display for the current topic
    pub fn displayed_questions(&self) -> &[String] {
        self.fetcher.questions_for(self.store.topic())
    }

    /// Apply one field edit. A change of topic starts a background fetch.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn apply_change(&mut self, name: FieldName, value: impl Into<String>) {
        if let Some(topic) = self.store.apply_change(name, value) {
            self.dispatch(topic);
        }
    }

    /// Apply one edit from an event source that names fields by string
    #[allow(dead_code)] // The terminal front end edits through FieldName; string sources use this
    pub fn apply_named_change(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        if let Some(topic) = self.store.apply_named_change(name, value)? {
            self.dispatch(topic);
        }
        Ok(())
    }

    pub fn revalidate(&mut self) -> &ErrorMap {
        self.store.revalidate()
    }

    /// Validate and, when clean, start the question refresh in the
    /// background. The snapshot arrives later as `SessionEvent::Submitted`.
    pub fn submit(&mut self) -> SubmitStart {
        let start = self.coordinator.begin(&mut self.store, &mut self.fetcher);
        if let SubmitStart::Pending(ticket) = &start {
            self.spawn_fetch(*ticket);
        }
        start
    }

    /// Resolve every fetch that has finished so far, without waiting
    pub fn poll_fetches(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            let (outcome, submitted) = self.resolve(completion);
            events.push(SessionEvent::Questions(outcome));
            events.extend(submitted.map(SessionEvent::Submitted));
        }
        events
    }

    /// Wait for the next background fetch to finish and resolve it
    #[cfg(test)]
    pub async fn next_fetch(&mut self) -> Option<FetchOutcome> {
        let completion = self.completions_rx.recv().await?;
        Some(self.resolve(completion).0)
    }

    /// Apply or discard one completion, then let a pending submit finish on it
    fn resolve(&mut self, completion: FetchCompletion) -> (FetchOutcome, Option<SubmissionSnapshot>) {
        let ticket = completion.ticket;
        let outcome = self.fetcher.resolve(completion, self.store.topic());
        let submitted = self
            .coordinator
            .complete(ticket, &mut self.store, &self.fetcher);
        (outcome, submitted)
    }

    fn dispatch(&mut self, topic: Topic) {
        let ticket = self.fetcher.begin(topic);
        self.spawn_fetch(ticket);
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let service = Arc::clone(&self.service);
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let completion = FetchCompletion::run(service.as_ref(), ticket).await;
            if tx.send(completion).is_err() {
                tracing::debug!(generation = ticket.generation, "session closed before fetch finished");
            }
        });
    }
}
