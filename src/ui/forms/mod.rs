//! Form rendering module
//!
//! - `field_renderer`: single field box with inline error
//! - `survey_form`: the active field set for the current topic

mod field_renderer;
mod survey_form;

pub use survey_form::draw_survey_form;
