use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::{centered_rect, inner};

pub(super) fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Dashboard:", bold)),
        Line::from("- J: raw JSON of the latest export"),
        Line::from("- ?: this help"),
        Line::from("- Q: quit"),
        Line::from(""),
        Line::from(Span::styled("Raw JSON:", bold)),
        Line::from("- Up / Down: scroll"),
        Line::from("- Esc or J: close"),
        Line::from(""),
        Line::from("The dashboard follows the export file and updates on every change."),
        Line::from("Close help: ? or Esc"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

pub(super) fn draw_raw(f: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 85, f.area());
    let total = app.raw_lines().len();
    let title = format!("Raw Game State ({}/{total})", (app.raw_offset() + 1).min(total));
    let block = Block::default().title(title).borders(Borders::ALL);
    let lines: Vec<Line> = app
        .raw_lines()
        .iter()
        .skip(app.raw_offset())
        .take(AppState::RAW_PAGE_SIZE.max(inner(area).height as usize))
        .map(|l| Line::from(l.as_str()))
        .collect();
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines), inner(area));
}
