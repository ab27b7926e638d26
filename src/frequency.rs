//! Frequency tables and top-k ranking
//!
//! Every corpus statistic (frequent words, hashtags, active users) counts keys
//! into a [`FrequencyTable`] and ranks it with [`select_top_k`].
//!
//! The table remembers the order in which keys were first inserted. Ranking
//! breaks ties between equal counts by that order, so the key that was seen
//! first wins.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

use thiserror::Error;

/// Number of entries reported by every top list.
pub const TOP_K: usize = 10;

/// Error type for ranking failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// Empty table or a zero-sized request
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

/// Insertion-ordered map from key to occurrence count.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    /// Position of each key in `entries`
    index: HashMap<K, usize>,
    /// Keys and counts in first-insertion order
    entries: Vec<(K, u64)>,
    /// Sum of all counts
    total: u64,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self { index: HashMap::new(), entries: Vec::new(), total: 0 }
    }
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of a key.
    pub fn add(&mut self, key: K) {
        self.add_count(key, 1);
    }

    /// Add `count` occurrences of a key, inserting it if unseen.
    pub fn add_count(&mut self, key: K, count: u64) {
        let slot = self.slot(key);
        self.entries[slot].1 += count;
        self.total += count;
    }

    /// Make sure a key is present, with a count of zero if it is new.
    ///
    /// Keys inserted this way keep their position for tie-breaking but are
    /// never ranked while their count stays zero.
    pub fn touch(&mut self, key: K) {
        self.slot(key);
    }

    fn slot(&mut self, key: K) -> usize {
        if let Some(&slot) = self.index.get(&key) {
            return slot;
        }
        let slot = self.entries.len();
        self.index.insert(key.clone(), slot);
        self.entries.push((key, 0));
        slot
    }

    /// Get the count for a key (0 if absent).
    pub fn get(&self, key: &K) -> u64 {
        self.index.get(key).map(|&slot| self.entries[slot].1).unwrap_or(0)
    }

    /// Whether the key has been inserted.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, count)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// Share of a key in the total, in percent.
    pub fn percentage(&self, key: &K) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.get(key) as f64 / self.total as f64) * 100.0
    }

    /// Rank this table, see [`select_top_k`].
    pub fn top(&self, k: usize) -> Result<Vec<(K, u64)>, RankError> {
        select_top_k(self, k)
    }
}

impl<K: Eq + Hash + Clone> Extend<K> for FrequencyTable<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

/// Ordering key for ranking: higher count first, then earlier insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rank {
    count: u64,
    position: usize,
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count.cmp(&other.count).then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Select the `k` keys with the highest counts.
///
/// Results are sorted by count (descending); equal counts keep insertion
/// order. Keys with a count of zero are never selected, so the result holds
/// `min(k, positive keys)` entries. The table is not modified, and ranking
/// the same table twice gives the same answer.
///
/// Runs in O(n log k) with a bounded min-heap.
///
/// # Examples
///
/// ```
/// use tweetsent::frequency::{select_top_k, FrequencyTable};
///
/// let mut table = FrequencyTable::new();
/// table.add_count("a", 5);
/// table.add_count("b", 3);
/// table.add_count("c", 3);
/// table.add_count("d", 1);
///
/// let top = select_top_k(&table, 3).unwrap();
/// assert_eq!(top, vec![("a", 5), ("b", 3), ("c", 3)]);
/// ```
///
/// # Errors
///
/// Returns [`RankError::InvalidInput`] if the table is empty or `k` is zero.
pub fn select_top_k<K: Eq + Hash + Clone>(
    table: &FrequencyTable<K>,
    k: usize,
) -> Result<Vec<(K, u64)>, RankError> {
    if k == 0 {
        return Err(RankError::InvalidInput("k must be at least 1"));
    }
    if table.is_empty() {
        return Err(RankError::InvalidInput("frequency table is empty"));
    }

    // Min-heap on rank: the weakest kept candidate sits on top
    let mut heap: BinaryHeap<Reverse<Rank>> = BinaryHeap::with_capacity(k + 1);
    for (position, (_, count)) in table.entries.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        heap.push(Reverse(Rank { count: *count, position }));
        if heap.len() > k {
            heap.pop();
        }
    }

    let mut ranked: Vec<Rank> = heap.into_iter().map(|Reverse(rank)| rank).collect();
    ranked.sort_unstable_by(|a, b| b.cmp(a));

    Ok(ranked
        .into_iter()
        .map(|rank| {
            let (key, count) = &table.entries[rank.position];
            (key.clone(), *count)
        })
        .collect())
}
