//! Remote supplementary question service

mod client;
mod traits;

pub use client::HttpQuestionService;
pub use traits::{FetchError, QuestionService};

#[cfg(test)]
pub use traits::MockQuestionService;
