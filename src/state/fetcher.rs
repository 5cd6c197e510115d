//! Supplementary question cache with a staleness guard
//!
//! Every fetch gets a ticket carrying a monotonically increasing
//! generation and the topic it was started for. A result is applied only
//! if its ticket is the newest one issued and its topic is still the
//! current topic when it resolves. Anything else is discarded and counted.

use crate::questions::{FetchError, QuestionService};
use crate::state::Topic;

/// Identity of one fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub topic: Topic,
}

/// Questions produced by the newest applied fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplementaryQuestions {
    pub topic: Topic,
    pub questions: Vec<String>,
}

/// A finished fetch, waiting to be resolved against current state
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: Result<Vec<String>, FetchError>,
}

impl FetchCompletion {
    /// Run the fetch described by `ticket`
    pub async fn run(service: &dyn QuestionService, ticket: FetchTicket) -> Self {
        let result = service.fetch_questions(ticket.topic).await;
        Self { ticket, result }
    }
}

/// What resolving a completion did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { topic: Topic, count: usize },
    Failed { topic: Topic, error: FetchError },
    Stale(FetchTicket),
}

#[derive(Debug, Default)]
pub struct QuestionFetcher {
    latest_generation: u64,
    current: Option<SupplementaryQuestions>,
    stale_discards: u64,
    failures: u64,
}

impl QuestionFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new fetch. Any ticket issued earlier is now stale.
    pub fn begin(&mut self, topic: Topic) -> FetchTicket {
        self.latest_generation += 1;
        let ticket = FetchTicket {
            generation: self.latest_generation,
            topic,
        };
        tracing::debug!(generation = ticket.generation, topic = %topic, "dispatching question fetch");
        ticket
    }

    /// Apply or discard a finished fetch.
    ///
    /// `current_topic` is the topic selected at the moment of resolution,
    /// not when the fetch started.
    pub fn resolve(&mut self, completion: FetchCompletion, current_topic: Topic) -> FetchOutcome {
        let FetchCompletion { ticket, result } = completion;

        if ticket.generation != self.latest_generation || ticket.topic != current_topic {
            self.stale_discards += 1;
            tracing::debug!(
                generation = ticket.generation,
                latest = self.latest_generation,
                topic = %ticket.topic,
                current = %current_topic,
                "discarding stale question fetch"
            );
            return FetchOutcome::Stale(ticket);
        }

        match result {
            Ok(questions) => {
                let count = questions.len();
                tracing::info!(topic = %ticket.topic, count, "supplementary questions updated");
                self.current = Some(SupplementaryQuestions {
                    topic: ticket.topic,
                    questions,
                });
                FetchOutcome::Applied {
                    topic: ticket.topic,
                    count,
                }
            }
            Err(error) => {
                // Previously applied questions stay in place
                self.failures += 1;
                tracing::warn!(topic = %ticket.topic, %error, "failed to fetch supplementary questions");
                FetchOutcome::Failed {
                    topic: ticket.topic,
                    error,
                }
            }
        }
    }

    /// Questions to show for `topic`. Empty unless the newest applied
    /// result was fetched for that topic.
    pub fn questions_for(&self, topic: Topic) -> &[String] {
        match &self.current {
            Some(current) if current.topic == topic => &current.questions,
            _ => &[],
        }
    }

    /// Generation of the newest ticket issued
    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    /// Results dropped because they were superseded
    pub fn stale_discards(&self) -> u64 {
        self.stale_discards
    }

    /// Current fetches that failed
    pub fn failures(&self) -> u64 {
        self.failures
    }
}
