//! Submission flow: validate, refresh questions, freeze a snapshot
//!
//! A submit is split in two so the event loop never waits on the network:
//! `begin` validates and issues the refresh ticket, `complete` freezes the
//! snapshot once that ticket has been resolved by the fetcher.

use super::fetcher::{FetchTicket, QuestionFetcher};
use super::forms::{active_fields, validate, ErrorMap, FieldName, FormStateStore, FormValues, Topic};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Where the form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SubmissionPhase {
    #[default]
    Editing,
    Validating,
    ErrorsShown,
    Fetching,
    Summarized,
}

impl SubmissionPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Editing => "Editing",
            Self::Validating => "Validating",
            Self::ErrorsShown => "Errors",
            Self::Fetching => "Fetching questions",
            Self::Summarized => "Submitted",
        }
    }
}

/// Immutable record of an accepted submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionSnapshot {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub topic: Topic,
    pub values: BTreeMap<FieldName, String>,
    pub questions: Vec<String>,
}

impl SubmissionSnapshot {
    fn new(values: &FormValues, questions: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            topic: values.topic(),
            values: values.to_map(),
            questions,
        }
    }

    pub fn value(&self, name: FieldName) -> &str {
        self.values.get(&name).map(String::as_str).unwrap_or_default()
    }

    /// (label, value) for every field that was active at submit time
    pub fn summary_lines(&self) -> Vec<(&'static str, &str)> {
        active_fields(self.topic)
            .into_iter()
            .map(|name| (name.spec().label, self.value(name)))
            .collect()
    }
}

/// Result of starting a submit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    /// Validation failed; nothing was fetched
    Rejected(ErrorMap),
    /// Validation passed; the snapshot is frozen when this ticket resolves
    Pending(FetchTicket),
}

/// A validated submit waiting on its question refresh
#[derive(Debug)]
struct PendingSubmission {
    ticket: FetchTicket,
    values: FormValues,
}

/// Drives Editing -> Validating -> (ErrorsShown | Fetching -> Summarized)
#[derive(Debug, Default)]
pub struct SubmissionCoordinator {
    pending: Option<PendingSubmission>,
    last_snapshot: Option<SubmissionSnapshot>,
}

impl SubmissionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the last accepted submission, kept until the next one
    pub fn snapshot(&self) -> Option<&SubmissionSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Ticket of the submit still waiting on its question refresh
    pub fn pending_ticket(&self) -> Option<FetchTicket> {
        self.pending.as_ref().map(|pending| pending.ticket)
    }

    /// Validate the form and, when it is clean, issue the question refresh.
    ///
    /// The refresh always gets a new generation, even if the topic has not
    /// changed since the last applied result. Values are captured here, so
    /// edits made while the refresh is in flight do not leak into the
    /// snapshot.
    pub fn begin(&mut self, store: &mut FormStateStore, fetcher: &mut QuestionFetcher) -> SubmitStart {
        store.set_phase(SubmissionPhase::Validating);
        let errors = validate(store.values());
        store.set_errors(errors.clone());

        if !errors.is_empty() {
            tracing::info!(failures = errors.len(), "submission rejected");
            self.pending = None;
            store.set_phase(SubmissionPhase::ErrorsShown);
            return SubmitStart::Rejected(errors);
        }

        store.set_phase(SubmissionPhase::Fetching);
        let ticket = fetcher.begin(store.topic());
        self.pending = Some(PendingSubmission {
            ticket,
            values: store.values().clone(),
        });
        SubmitStart::Pending(ticket)
    }

    /// Freeze the snapshot for the pending submit once `ticket` has been
    /// resolved, whether it was applied, failed or superseded.
    ///
    /// Returns `None` when `ticket` does not belong to the pending submit.
    /// The snapshot carries whatever questions are held for the submitted
    /// topic, so a failed refresh falls back to earlier questions for that
    /// topic, or to none.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        store: &mut FormStateStore,
        fetcher: &QuestionFetcher,
    ) -> Option<SubmissionSnapshot> {
        if self.pending_ticket() != Some(ticket) {
            return None;
        }
        let pending = self.pending.take()?;

        let questions = fetcher.questions_for(ticket.topic).to_vec();
        let snapshot = SubmissionSnapshot::new(&pending.values, questions);
        tracing::info!(id = %snapshot.id, topic = %ticket.topic, "submission accepted");

        self.last_snapshot = Some(snapshot.clone());
        store.set_phase(SubmissionPhase::Summarized);
        Some(snapshot)
    }
}
