//! Bounded conversational memory.
//!
//! Skill context slots that track "recently used" items (section titles,
//! content pages, templates) must avoid repetition without growing without
//! bound over a long conversation. `BoundedHistory` keeps the most recent
//! `CAP` entries, dropping the oldest on overflow.

use serde::{Deserialize, Serialize};

/// An append-mostly list that retains only the most recent `CAP` entries.
///
/// Serializes as a plain list so it round-trips through the persisted
/// attribute maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct BoundedHistory<const CAP: usize> {
    items: Vec<String>,
}

impl<const CAP: usize> BoundedHistory<CAP> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an item, evicting the oldest entry when over capacity.
    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
        if self.items.len() > CAP {
            let overflow = self.items.len() - CAP;
            self.items.drain(..overflow);
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    pub fn last(&self) -> Option<&str> {
        self.items.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// The most recent `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[String] {
        let start = self.items.len().saturating_sub(n);
        &self.items[start..]
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<const CAP: usize> From<Vec<String>> for BoundedHistory<CAP> {
    fn from(mut items: Vec<String>) -> Self {
        if items.len() > CAP {
            let overflow = items.len() - CAP;
            items.drain(..overflow);
        }
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_insertion_order() {
        let mut history: BoundedHistory<4> = BoundedHistory::new();
        history.push("a");
        history.push("b");
        let items: Vec<&str> = history.iter().collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn push_evicts_oldest_beyond_cap() {
        let mut history: BoundedHistory<2> = BoundedHistory::new();
        history.push("first");
        history.push("second");
        history.push("third");
        assert_eq!(history.len(), 2);
        assert!(!history.contains("first"));
        assert!(history.contains("second"));
        assert_eq!(history.last(), Some("third"));
    }

    #[test]
    fn recent_returns_trailing_entries() {
        let mut history: BoundedHistory<8> = BoundedHistory::new();
        for item in ["a", "b", "c", "d"] {
            history.push(item);
        }
        assert_eq!(history.recent(2), &["c".to_string(), "d".to_string()]);
        assert_eq!(history.recent(10).len(), 4);
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut history: BoundedHistory<4> = BoundedHistory::new();
        history.push("habitat");
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, "[\"habitat\"]");
        let back: BoundedHistory<4> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
    }

    #[test]
    fn from_oversized_vec_truncates_from_front() {
        let history: BoundedHistory<2> =
            Vec::from(["a".to_string(), "b".to_string(), "c".to_string()]).into();
        let items: Vec<&str> = history.iter().collect();
        assert_eq!(items, vec!["b", "c"]);
    }
}
