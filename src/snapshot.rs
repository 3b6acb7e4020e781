//! Data model of the exported game-state document.
//!
//! Every field is optional in the export. Missing objects become `None`,
//! missing lists become empty, and loosely typed numbers are kept as given.

use crate::cards::{value_tag, Card};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// A numeric field as the game exported it. The exporter is not consistent
/// about integers vs floats vs strings (large chip targets arrive as text),
/// so the value is kept for display rather than coerced.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Metric {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Metric::Int(v) => Some(*v),
            Metric::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Metric::Float(_) => None,
            Metric::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Int(v) => write!(f, "{v}"),
            Metric::Float(v) => write!(f, "{v}"),
            Metric::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PlayerData {
    #[serde(deserialize_with = "lenient")]
    pub cash: Option<Metric>,
    #[serde(deserialize_with = "lenient")]
    pub hands_left: Option<Metric>,
    #[serde(deserialize_with = "lenient")]
    pub discards_left: Option<Metric>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RunInfo {
    #[serde(deserialize_with = "lenient")]
    pub ante: Option<Metric>,
    #[serde(deserialize_with = "lenient")]
    pub round: Option<Metric>,
    #[serde(deserialize_with = "lenient")]
    pub chips_to_beat: Option<Metric>,
    #[serde(deserialize_with = "lenient_tag")]
    pub current_blind_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Joker {
    #[serde(deserialize_with = "lenient_tag")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_tag")]
    pub key: Option<String>,
    #[serde(deserialize_with = "lenient_tag")]
    pub edition: Option<String>,
}

/// One complete, successfully parsed export.
///
/// ```
/// use balatro_watch::snapshot::GameSnapshot;
///
/// let snap = GameSnapshot::from_json(r#"{"player_data":{"cash":4}}"#).unwrap();
/// assert_eq!(snap.player_data.unwrap().cash.unwrap().as_i64(), Some(4));
/// assert!(snap.current_hand.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct GameSnapshot {
    #[serde(deserialize_with = "lenient")]
    pub player_data: Option<PlayerData>,
    #[serde(deserialize_with = "lenient")]
    pub run_info: Option<RunInfo>,
    #[serde(deserialize_with = "lenient_list")]
    pub current_hand: Vec<Card>,
    #[serde(deserialize_with = "lenient_list")]
    pub jokers: Vec<Joker>,
    /// The document exactly as parsed, for raw display.
    #[serde(skip)]
    pub raw: Value,
}

impl GameSnapshot {
    /// Parse a snapshot from JSON text. The top level must be an object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: Value = serde_json::from_str(text)?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        if !raw.is_object() {
            return Err(serde::de::Error::custom("game state must be a JSON object"));
        }
        let mut snapshot = GameSnapshot::deserialize(&raw)?;
        snapshot.raw = raw;
        Ok(snapshot)
    }

    /// True when the export carried at least one card in hand.
    pub fn has_cards(&self) -> bool {
        !self.current_hand.is_empty()
    }
}

/// A value of the wrong shape reads as absent instead of failing the document.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.and_then(|v| T::deserialize(v).ok()))
}

fn lenient_tag<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(d)?.and_then(value_tag))
}

/// A list field that is `null` or not an array reads as empty; entries that
/// are not records are dropped.
fn lenient_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(v) => Some(v),
            Err(e) => {
                log::debug!("skipping malformed list entry: {e}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    const FULL: &str = r#"{
        "player_data": {"cash": 12, "hands_left": 3, "discards_left": 2},
        "run_info": {"ante": 2, "round": 5, "chips_to_beat": "1.2e5", "current_blind_name": "Big Blind"},
        "current_hand": [
            {"rank": "Ace", "suit": "Spades", "enhancement": "m_steel", "edition": "none", "seal": "Red"},
            {"rank": "10", "suit": "Hearts"}
        ],
        "jokers": [{"name": "Joker", "key": "j_joker", "edition": "e_foil"}]
    }"#;

    #[test]
    fn parses_full_export() {
        let snap = GameSnapshot::from_json(FULL).unwrap();
        let pd = snap.player_data.as_ref().unwrap();
        assert_eq!(pd.cash, Some(Metric::Int(12)));
        assert_eq!(pd.hands_left.as_ref().and_then(Metric::as_i64), Some(3));
        let ri = snap.run_info.as_ref().unwrap();
        assert_eq!(ri.chips_to_beat, Some(Metric::Text("1.2e5".into())));
        assert_eq!(ri.current_blind_name.as_deref(), Some("Big Blind"));
        assert_eq!(snap.current_hand.len(), 2);
        assert_eq!(snap.current_hand[0].rank(), Some(Rank::Ace));
        assert_eq!(snap.current_hand[0].seal(), Some("Red"));
        assert_eq!(snap.current_hand[1].suit(), Some(Suit::Hearts));
        assert_eq!(snap.jokers[0].key.as_deref(), Some("j_joker"));
        assert_eq!(snap.raw["player_data"]["cash"], 12);
    }

    #[test]
    fn missing_sections_are_tolerated() {
        let snap = GameSnapshot::from_json("{}").unwrap();
        assert!(snap.player_data.is_none());
        assert!(snap.run_info.is_none());
        assert!(!snap.has_cards());
        assert!(snap.jokers.is_empty());

        let snap = GameSnapshot::from_json(r#"{"current_hand": null, "jokers": {}}"#).unwrap();
        assert!(!snap.has_cards());
        assert!(snap.jokers.is_empty());

        let snap =
            GameSnapshot::from_json(r#"{"current_hand": ["AS", {"rank":"2","suit":"Clubs"}]}"#)
                .unwrap();
        assert_eq!(snap.current_hand.len(), 1);
    }

    #[test]
    fn odd_metric_types_do_not_fail() {
        let snap = GameSnapshot::from_json(r#"{"player_data":{"cash":{"x":1},"hands_left":4.0}}"#)
            .unwrap();
        let pd = snap.player_data.unwrap();
        assert_eq!(pd.cash, None);
        assert_eq!(pd.hands_left.and_then(|m| m.as_i64()), Some(4));

        let snap = GameSnapshot::from_json(r#"{"run_info":"pending","player_data":{}}"#).unwrap();
        assert!(snap.run_info.is_none());
        assert_eq!(snap.player_data, Some(PlayerData::default()));
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert!(GameSnapshot::from_json("[1,2,3]").is_err());
        assert!(GameSnapshot::from_json("[]").is_err());
        assert!(GameSnapshot::from_json("null").is_err());
        assert!(GameSnapshot::from_json("{\"player_data\": ").is_err());
    }
}
