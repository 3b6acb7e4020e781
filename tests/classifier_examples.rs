use balatro_watch::cards::{parse_cards, Card, Rank, Suit};
use balatro_watch::classifier::{classify, Finding};

fn hand(s: &str) -> Vec<Card> {
    parse_cards(s).unwrap()
}

#[test]
fn full_house() {
    let c = classify(&hand("2S 2H 2D 5C 5S"));
    assert_eq!(
        c.findings(),
        &[
            Finding::ThreeOfAKind(Rank::Two),
            Finding::FullHouse { trips: Rank::Two, pair: Rank::Five },
            Finding::Pair(Rank::Five),
        ]
    );
    assert_eq!(c.card_count, 5);
}

#[test]
fn two_pair_in_first_seen_order() {
    let c = classify(&hand("KS 3H 3D KC 9S"));
    assert_eq!(c.two_pair(), Some((Rank::King, Rank::Three)));
    assert_eq!(c.pair(), None);
    assert_eq!(c.findings()[0].to_string(), "Two Pair: Kings and 3s");
}

#[test]
fn flush_in_a_larger_hand() {
    let c = classify(&hand("2H 7H 9H JH KH 3S 4C 8D"));
    assert_eq!(c.flush(), Some(Suit::Hearts));
    assert_eq!(c.suits.get(Suit::Hearts), 5);
    assert!(c.pair().is_none());
}

#[test]
fn quads_and_trips_together() {
    let c = classify(&hand("9S 9H 9D 9C 4S 4H 4D"));
    assert_eq!(c.four_of_a_kind(), Some(Rank::Nine));
    assert_eq!(c.three_of_a_kind(), Some(Rank::Four));
    // no count-2 rank, so no full house
    assert_eq!(c.full_house(), None);
    assert_eq!(c.pair(), None);
}

#[test]
fn straights_are_not_reported() {
    let c = classify(&hand("5S 6H 7D 8C 9S"));
    assert!(c.is_empty());
    assert_eq!(c.ranks.len(), 5);
}

#[test]
fn five_of_a_rank_is_not_quads() {
    let cards: Vec<Card> = Suit::ALL
        .iter()
        .chain(&[Suit::Spades])
        .map(|&s| Card::new(Rank::Ace, s))
        .collect();
    let c = classify(&cards);
    assert_eq!(c.ranks.get(Rank::Ace), 5);
    assert!(c.four_of_a_kind().is_none());
    assert!(c.is_empty());
}

#[test]
fn cards_from_json_with_unknown_values() {
    let cards: Vec<Card> = serde_json::from_str(
        r#"[
            {"rank":"Ace","suit":"Spades"},
            {"rank":"Ace","suit":"Hearts","enhancement":"m_glass"},
            {"rank":"Stone","suit":"Clubs"},
            {"suit":"Diamonds"}
        ]"#,
    )
    .unwrap();
    let c = classify(&cards);
    assert_eq!(c.card_count, 4);
    assert_eq!(c.ranks.total(), 2);
    assert_eq!(c.suits.total(), 4);
    assert_eq!(c.pair(), Some(Rank::Ace));
}
