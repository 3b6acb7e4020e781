//! Plain-text reports of a snapshot and of a hand classification.

use crate::cards::Card;
use crate::classifier::Classification;
use crate::snapshot::{GameSnapshot, Metric};
use std::fmt;

pub const NO_STATE: &str =
    "Game state file not found. Make sure the game is running and the state has been exported.";
pub const NO_CARDS: &str = "No cards in hand currently.";

/// Full state report: player, run, hand and jokers, optionally followed by
/// the raw document.
///
/// ```
/// use balatro_watch::render::StateReport;
/// use balatro_watch::snapshot::GameSnapshot;
///
/// let snap = GameSnapshot::from_json(r#"{"player_data":{"cash":7}}"#).unwrap();
/// let text = StateReport::new(&snap).to_string();
/// assert!(text.contains("Cash: $7"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StateReport<'a> {
    snapshot: &'a GameSnapshot,
    raw: bool,
}

impl<'a> StateReport<'a> {
    pub fn new(snapshot: &'a GameSnapshot) -> Self {
        Self { snapshot, raw: false }
    }

    /// Append the raw JSON document.
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
}

fn metric(m: &Option<Metric>) -> String {
    m.as_ref().map_or_else(|| "0".to_string(), Metric::to_string)
}

impl fmt::Display for StateReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot;
        writeln!(f, "=== Balatro Game State ===")?;
        writeln!(f)?;

        if let Some(pd) = &s.player_data {
            writeln!(f, "Cash: ${}", metric(&pd.cash))?;
            writeln!(f, "Hands Left: {}", metric(&pd.hands_left))?;
            writeln!(f, "Discards Left: {}", metric(&pd.discards_left))?;
            writeln!(f)?;
        }

        if let Some(ri) = &s.run_info {
            writeln!(f, "Ante: {} | Round: {}", metric(&ri.ante), metric(&ri.round))?;
            writeln!(f, "Chips to Beat: {}", metric(&ri.chips_to_beat))?;
            writeln!(f, "Current Blind: {}", ri.current_blind_name.as_deref().unwrap_or("None"))?;
            writeln!(f)?;
        }

        if s.has_cards() {
            writeln!(f, "Current Hand ({} cards):", s.current_hand.len())?;
            for card in &s.current_hand {
                writeln!(f, "  - {}", CardLine(card))?;
            }
            writeln!(f)?;
        }

        if !s.jokers.is_empty() {
            writeln!(f, "Jokers ({}):", s.jokers.len())?;
            for joker in &s.jokers {
                let name = joker.name.as_deref().unwrap_or("Unknown");
                let key = joker.key.as_deref().unwrap_or("?");
                match joker.edition.as_deref() {
                    Some(edition) => writeln!(f, "  - {name} [{edition}] ({key})")?,
                    None => writeln!(f, "  - {name} ({key})")?,
                }
            }
            writeln!(f)?;
        }

        if self.raw {
            writeln!(f, "=== Raw Game State JSON ===")?;
            let pretty = serde_json::to_string_pretty(&s.raw).map_err(|_| fmt::Error)?;
            writeln!(f, "{pretty}")?;
        }
        Ok(())
    }
}

/// `Ace of Spades (Enhancement: m_steel, Seal: Red)`.
#[derive(Debug, Clone, Copy)]
pub struct CardLine<'a>(pub &'a Card);

impl fmt::Display for CardLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = self.0;
        let rank = card.rank().map_or("?", |r| r.name());
        let suit = card.suit().map_or("?", |s| s.name());
        write!(f, "{rank} of {suit}")?;
        let extras: Vec<String> = [
            ("Enhancement", card.enhancement()),
            ("Edition", card.edition()),
            ("Seal", card.seal()),
        ]
        .into_iter()
        .filter_map(|(label, tag)| tag.map(|t| format!("{label}: {t}")))
        .collect();
        if !extras.is_empty() {
            write!(f, " ({})", extras.join(", "))?;
        }
        Ok(())
    }
}

/// Hand analysis report: each finding, the card count and both tallies.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisReport<'a>(pub &'a Classification);

impl fmt::Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        writeln!(f, "=== Possible Poker Hands ===")?;
        writeln!(f)?;
        for finding in c.findings() {
            writeln!(f, "{finding}")?;
        }
        writeln!(f)?;
        writeln!(f, "You have {} cards to work with", c.card_count)?;
        writeln!(f, "Suits: {}", c.suits)?;
        writeln!(f, "Ranks: {}", c.ranks)
    }
}

/// Compact one-line hand: `AS KH 10D`.
pub fn hand_summary(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect::<Vec<_>>().join(" ")
}
