use std::fmt;

/// Counts occurrences of a value, iterating in first-seen order.
///
/// The classifier's "first pair found" rule depends on this order, so the
/// backing store is a small vector rather than a hash map. There are at
/// most 13 ranks or 4 suits, so lookups stay linear and cheap.
///
/// Example: tallying ranks of K 5 K 2 yields [(King, 2), (Five, 1), (Two, 1)].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K> {
    entries: Vec<(K, usize)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: Copy + PartialEq> Tally<K> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Increment the count for `key`, appending it if this is its first sighting.
    pub fn add(&mut self, key: K) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key, 1)),
        }
    }

    /// Count for `key`, zero if never seen.
    pub fn get(&self, key: K) -> usize {
        self.entries.iter().find(|(k, _)| *k == key).map_or(0, |(_, c)| *c)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (K, usize)> + '_ {
        self.entries.iter().copied()
    }

    /// Keys whose count is exactly `n`, in first-seen order.
    pub fn with_count(&self, n: usize) -> Vec<K> {
        self.entries.iter().filter(|(_, c)| *c == n).map(|(k, _)| *k).collect()
    }

    /// First key whose count is at least `n`.
    pub fn first_at_least(&self, n: usize) -> Option<K> {
        self.entries.iter().find(|(_, c)| *c >= n).map(|(k, _)| *k)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy + PartialEq> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

/// Renders as `{King: 2, 5: 1}`.
impl<K: Copy + PartialEq + fmt::Display> fmt::Display for Tally<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, count)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {count}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn keeps_first_seen_order() {
        let tally: Tally<Rank> =
            [Rank::King, Rank::Five, Rank::King, Rank::Two].into_iter().collect();
        let entries: Vec<(Rank, usize)> = tally.iter().collect();
        assert_eq!(entries, vec![(Rank::King, 2), (Rank::Five, 1), (Rank::Two, 1)]);
    }

    #[test]
    fn counts_and_totals() {
        let tally: Tally<Suit> =
            [Suit::Hearts, Suit::Hearts, Suit::Clubs, Suit::Hearts].into_iter().collect();
        assert_eq!(tally.get(Suit::Hearts), 3);
        assert_eq!(tally.get(Suit::Spades), 0);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.first_at_least(3), Some(Suit::Hearts));
        assert_eq!(tally.first_at_least(4), None);
    }

    #[test]
    fn with_count_is_exact() {
        let tally: Tally<Rank> =
            [Rank::Ace, Rank::Ace, Rank::Ace, Rank::Two, Rank::Two, Rank::Nine, Rank::Nine]
                .into_iter()
                .collect();
        assert_eq!(tally.with_count(2), vec![Rank::Two, Rank::Nine]);
        assert_eq!(tally.with_count(3), vec![Rank::Ace]);
        assert!(tally.with_count(4).is_empty());
    }

    #[test]
    fn display_lists_entries() {
        let tally: Tally<Rank> = [Rank::King, Rank::Five, Rank::King].into_iter().collect();
        assert_eq!(tally.to_string(), "{King: 2, 5: 1}");
        assert_eq!(Tally::<Rank>::new().to_string(), "{}");
    }
}
