//! Survey state module

mod fetcher;
mod forms;
mod session;
mod submission;

pub use fetcher::*;
pub use forms::*;
pub use session::*;
pub use submission::*;
