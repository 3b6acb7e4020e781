use crate::cards::{Card, Rank, Suit};
use crate::snapshot::{GameSnapshot, Metric};
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::inner;

pub(super) fn draw_dashboard(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let header_height: u16 = 2 + 2;
    let hand_height: u16 = 5;
    let status_height: u16 = 2 + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height), // run / player metrics
            Constraint::Length(hand_height),   // cards in hand
            Constraint::Min(3),                // analysis + jokers
            Constraint::Length(status_height), // status bar
        ])
        .split(size);

    let snapshot = app.view().snapshot().map(|s| &**s);

    draw_header(f, chunks[0], snapshot);
    draw_hand(f, chunks[1], snapshot);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    draw_analysis(f, cols[0], app);
    draw_jokers(f, cols[1], snapshot);

    draw_status(f, chunks[3], app);
}

fn metric_or_dash(m: Option<&Metric>) -> String {
    m.map_or_else(|| "--".to_string(), Metric::to_string)
}

fn draw_header(f: &mut Frame, area: Rect, snapshot: Option<&GameSnapshot>) {
    let pd = snapshot.and_then(|s| s.player_data.as_ref());
    let ri = snapshot.and_then(|s| s.run_info.as_ref());
    let lines = vec![
        Line::from(format!(
            "Cash: ${}   Hands: {}   Discards: {}",
            metric_or_dash(pd.and_then(|p| p.cash.as_ref())),
            metric_or_dash(pd.and_then(|p| p.hands_left.as_ref())),
            metric_or_dash(pd.and_then(|p| p.discards_left.as_ref())),
        )),
        Line::from(format!(
            "Ante: {}   Round: {}   Chips to beat: {}   Blind: {}",
            metric_or_dash(ri.and_then(|r| r.ante.as_ref())),
            metric_or_dash(ri.and_then(|r| r.round.as_ref())),
            metric_or_dash(ri.and_then(|r| r.chips_to_beat.as_ref())),
            ri.and_then(|r| r.current_blind_name.as_deref()).unwrap_or("--"),
        )),
    ];
    let header = Paragraph::new(lines)
        .block(Block::default().title("balatro-watch").borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_hand(f: &mut Frame, area: Rect, snapshot: Option<&GameSnapshot>) {
    let cards = snapshot.map_or(&[][..], |s| s.current_hand.as_slice());
    let block =
        Block::default().title(format!("Hand ({} cards)", cards.len())).borders(Borders::ALL);
    let hand_inner = inner(area);
    f.render_widget(block, area);
    if cards.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No cards in hand",
            Style::default().add_modifier(Modifier::DIM),
        )))
        .alignment(Alignment::Center);
        f.render_widget(msg, hand_inner);
        return;
    }
    let n = cards.len() as u16;
    let card_width = (hand_inner.width / n.max(1)).clamp(4, 9);
    let card_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..n).map(|_| Constraint::Length(card_width)).collect::<Vec<_>>())
        .split(hand_inner);
    for (card, chunk) in cards.iter().zip(card_chunks.iter()) {
        render_card_widget(f, *chunk, card);
    }
}

fn draw_analysis(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default().title("Possible Hands").borders(Borders::ALL);
    let mut lines: Vec<Line> = Vec::new();
    match app.analysis() {
        None => lines.push(Line::from(Span::styled(
            "No cards in hand currently.",
            Style::default().add_modifier(Modifier::DIM),
        ))),
        Some(c) => {
            if c.is_empty() {
                lines.push(Line::from("High card only"));
            }
            for finding in c.findings() {
                lines.push(Line::from(Span::styled(
                    finding.to_string(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(format!("{} cards to work with", c.card_count)));
            lines.push(Line::from(format!("Suits: {}", c.suits)));
            lines.push(Line::from(format!("Ranks: {}", c.ranks)));
        }
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn draw_jokers(f: &mut Frame, area: Rect, snapshot: Option<&GameSnapshot>) {
    let jokers = snapshot.map_or(&[][..], |s| s.jokers.as_slice());
    let block =
        Block::default().title(format!("Jokers ({})", jokers.len())).borders(Borders::ALL);
    let items: Vec<ListItem> = jokers
        .iter()
        .map(|j| {
            let mut spans = vec![Span::raw(j.name.clone().unwrap_or_else(|| "Unknown".into()))];
            if let Some(edition) = &j.edition {
                spans.push(Span::styled(
                    format!(" [{edition}]"),
                    Style::default().fg(Color::Magenta),
                ));
            }
            if let Some(key) = &j.key {
                spans.push(Span::styled(
                    format!(" ({key})"),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let status_inner = inner(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(status_inner);

    let view = app.view();
    let path = app.snapshot_path().display();
    let mut left = vec![if app.waiting() {
        Line::from(Span::styled(
            format!("Waiting for export at {path}"),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(format!("Watching {path}"))
    }];
    match (view.last_error(), view.updated_at()) {
        (Some(err), _) => {
            left.push(Line::from(Span::styled(
                format!("Error: {err}"),
                Style::default().fg(Color::Red),
            )));
        }
        (None, Some(at)) => {
            left.push(Line::from(format!(
                "Updated at {} ({} updates)",
                at.format("%H:%M:%S"),
                view.updates()
            )));
        }
        (None, None) => left.push(Line::from("No state yet")),
    }

    let right = vec![Line::from(""), Line::from("? help • J raw JSON • Q quit")];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );
}

fn suit_glyph_and_style(s: Option<Suit>) -> (char, Style) {
    match s {
        Some(Suit::Hearts) => ('♥', Style::default().fg(Color::Red)),
        Some(Suit::Diamonds) => ('♦', Style::default().fg(Color::Red)),
        Some(Suit::Spades) => ('♠', Style::default().fg(Color::White)),
        Some(Suit::Clubs) => ('♣', Style::default().fg(Color::White)),
        None => ('?', Style::default().add_modifier(Modifier::DIM)),
    }
}

fn render_card_widget(f: &mut Frame, area: Rect, card: &Card) {
    let mut block = Block::default().borders(Borders::ALL);
    // Enhanced, editioned or sealed cards get a highlighted border.
    if card.enhancement().is_some() || card.edition().is_some() || card.seal().is_some() {
        block = block.border_style(Style::default().fg(Color::Cyan));
    }
    let card_inner = inner(area);
    f.render_widget(block, area);
    let (glyph, style) = suit_glyph_and_style(card.suit());
    let rank = card.rank().map_or("?", Rank::short);
    let label = Line::from(Span::styled(format!("{rank}{glyph}"), style));
    f.render_widget(Paragraph::new(label).alignment(Alignment::Center), card_inner);
}
