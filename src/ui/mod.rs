//! UI module for rendering the TUI

mod forms;
mod layout;
mod summary;

use crate::app::App;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let (form_area, panel_area) = layout::create_layout(area);

    forms::draw_survey_form(frame, form_area, app);
    summary::draw(frame, panel_area, app);

    layout::draw_status_bar(frame, app);
}
