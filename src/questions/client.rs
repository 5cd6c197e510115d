//! HTTP client for the supplementary question service
//!
//! Issues `GET <url>?topic=<Topic>` and reads the `questions` array from
//! the JSON object in the response body.

use super::traits::{FetchError, QuestionService};
use crate::config::SurveyConfig;
use crate::state::Topic;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Client for the remote question service
pub struct HttpQuestionService {
    client: Client,
    url: String,
}

impl HttpQuestionService {
    /// Create a client from the user configuration
    pub fn new(config: &SurveyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: config.questions_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuestionService for HttpQuestionService {
    async fn fetch_questions(&self, topic: Topic) -> Result<Vec<String>, FetchError> {
        tracing::debug!(url = %self.url, topic = %topic, "requesting supplementary questions");

        let response = self
            .client
            .get(&self.url)
            .query(&[("topic", topic.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        parse_questions(&body)
    }
}

/// Extract the question list from a response body.
///
/// Any JSON body without a `questions` key yields an empty list, which
/// covers endpoints that ignore the topic and answer with something else
/// entirely. Malformed JSON, or a `questions` value that is not a list of
/// strings, is a parse failure.
pub(crate) fn parse_questions(body: &str) -> Result<Vec<String>, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    match value.get("questions") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(questions) => Vec::<String>::deserialize(questions)
            .map_err(|e| FetchError::Parse(format!("questions: {e}"))),
    }
}
