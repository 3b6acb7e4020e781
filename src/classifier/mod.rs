//! Hand classification: which named poker combinations are latent in a hand.
//!
//! Only rank multiplicity and suit counts are examined. Rank adjacency is
//! never evaluated, so straights and straight flushes are not reported.

mod tally;

pub use tally::Tally;

use crate::cards::{Card, Rank, Suit};
use std::fmt;

/// A named combination found in a hand, with the rank(s) or suit that define it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Finding {
    FourOfAKind(Rank),
    ThreeOfAKind(Rank),
    FullHouse { trips: Rank, pair: Rank },
    TwoPair(Rank, Rank),
    Pair(Rank),
    Flush(Suit),
}

impl Finding {
    pub const fn label(self) -> &'static str {
        match self {
            Finding::FourOfAKind(_) => "Four of a Kind",
            Finding::ThreeOfAKind(_) => "Three of a Kind",
            Finding::FullHouse { .. } => "Full House",
            Finding::TwoPair(..) => "Two Pair",
            Finding::Pair(_) => "Pair",
            Finding::Flush(_) => "Flush",
        }
    }
}

/// ```
/// use balatro_watch::cards::{Rank, Suit};
/// use balatro_watch::classifier::Finding;
///
/// let fh = Finding::FullHouse { trips: Rank::Two, pair: Rank::Five };
/// assert_eq!(fh.to_string(), "Full House: 2s full of 5s");
/// assert_eq!(Finding::Flush(Suit::Spades).to_string(), "Flush: Spades");
/// ```
impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.label())?;
        match *self {
            Finding::FourOfAKind(r) | Finding::ThreeOfAKind(r) => write!(f, "{r}"),
            Finding::FullHouse { trips, pair } => write!(f, "{trips}s full of {pair}s"),
            Finding::TwoPair(a, b) => write!(f, "{a}s and {b}s"),
            Finding::Pair(r) => write!(f, "{r}s"),
            Finding::Flush(s) => write!(f, "{s}"),
        }
    }
}

/// Result of classifying a hand: the findings in derivation order plus the
/// raw tallies they were derived from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct Classification {
    pub card_count: usize,
    pub ranks: Tally<Rank>,
    pub suits: Tally<Suit>,
    findings: Vec<Finding>,
}

impl Classification {
    /// Findings in the order they were derived: quads, trips, full house,
    /// two pair or pair, flush.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// True when no named combination was found.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn four_of_a_kind(&self) -> Option<Rank> {
        self.findings.iter().find_map(|f| match f {
            Finding::FourOfAKind(r) => Some(*r),
            _ => None,
        })
    }

    pub fn three_of_a_kind(&self) -> Option<Rank> {
        self.findings.iter().find_map(|f| match f {
            Finding::ThreeOfAKind(r) => Some(*r),
            _ => None,
        })
    }

    /// `(trips, pair)` ranks of a full house.
    pub fn full_house(&self) -> Option<(Rank, Rank)> {
        self.findings.iter().find_map(|f| match f {
            Finding::FullHouse { trips, pair } => Some((*trips, *pair)),
            _ => None,
        })
    }

    pub fn two_pair(&self) -> Option<(Rank, Rank)> {
        self.findings.iter().find_map(|f| match f {
            Finding::TwoPair(a, b) => Some((*a, *b)),
            _ => None,
        })
    }

    pub fn pair(&self) -> Option<Rank> {
        self.findings.iter().find_map(|f| match f {
            Finding::Pair(r) => Some(*r),
            _ => None,
        })
    }

    pub fn flush(&self) -> Option<Suit> {
        self.findings.iter().find_map(|f| match f {
            Finding::Flush(s) => Some(*s),
            _ => None,
        })
    }
}

/// Number of same-suit cards that make a flush.
pub const FLUSH_SIZE: usize = 5;

/// Classify a hand of any size.
///
/// Ties between ranks with the same count are broken by the order in which
/// each rank first appears in `cards`, never by rank value. Cards with an
/// unknown rank or suit are left out of the corresponding tally.
///
/// ```
/// use balatro_watch::cards::parse_cards;
/// use balatro_watch::classifier::classify;
/// use balatro_watch::cards::Rank;
///
/// let hand = parse_cards("AS AH KD KC QS").unwrap();
/// let result = classify(&hand);
/// assert_eq!(result.two_pair(), Some((Rank::Ace, Rank::King)));
/// assert_eq!(result.full_house(), None);
/// ```
pub fn classify(cards: &[Card]) -> Classification {
    let ranks: Tally<Rank> = cards.iter().filter_map(Card::rank).collect();
    let suits: Tally<Suit> = cards.iter().filter_map(Card::suit).collect();

    let pairs = ranks.with_count(2);
    let trips = ranks.with_count(3);
    let quads = ranks.with_count(4);

    let mut findings = Vec::new();
    if let Some(&quad) = quads.first() {
        findings.push(Finding::FourOfAKind(quad));
    }
    if let Some(&trip) = trips.first() {
        findings.push(Finding::ThreeOfAKind(trip));
        if let Some(&pair) = pairs.first() {
            findings.push(Finding::FullHouse { trips: trip, pair });
        }
    }
    match pairs.as_slice() {
        [first, second, ..] => findings.push(Finding::TwoPair(*first, *second)),
        [only] => findings.push(Finding::Pair(*only)),
        [] => {}
    }
    if let Some(suit) = suits.first_at_least(FLUSH_SIZE) {
        findings.push(Finding::Flush(suit));
    }

    Classification { card_count: cards.len(), ranks, suits, findings }
}
