mod dashboard;
mod overlays;

use crate::tui::app::AppState;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::prelude::Frame;

pub fn draw(f: &mut Frame, app: &AppState) {
    dashboard::draw_dashboard(f, app);
    if app.help_open() {
        overlays::draw_help(f);
    } else if app.raw_open() {
        overlays::draw_raw(f, app);
    }
}

/// Area inside a one-cell border.
pub(super) fn inner(area: Rect) -> Rect {
    area.inner(Margin::new(1, 1))
}

/// A rectangle of the given percentages, centred in `r`.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center).areas(r);
    let [area] =
        Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center).areas(row);
    area
}
