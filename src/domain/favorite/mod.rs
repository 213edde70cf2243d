//! Favorite domain — the user's favorited symbols and the favorites sub-client.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use crate::shared::Symbol;
use serde::{Deserialize, Serialize};

/// Outcome of a favorite toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The backend accepted the add.
    Added,
    /// The backend accepted the removal.
    Removed,
    /// A toggle for the same symbol was still in flight; nothing was sent.
    Suppressed,
}

/// The set of favorited symbols, in the order they were added.
///
/// Backed by a `Vec`: a user's favorites are bounded by the watch list, so a
/// linear scan is cheaper than hashing at this size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<Symbol>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.0.iter().any(|s| s == symbol)
    }

    /// Add `symbol` if absent. Returns `true` if it was inserted.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        if self.contains(&symbol) {
            return false;
        }
        self.0.push(symbol);
        true
    }

    /// Remove `symbol` if present. Returns `true` if it was removed.
    pub fn remove(&mut self, symbol: &Symbol) -> bool {
        match self.0.iter().position(|s| s == symbol) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    /// Flip membership. Returns `true` if `symbol` is a favorite afterwards.
    pub fn toggle(&mut self, symbol: &Symbol) -> bool {
        if self.remove(symbol) {
            false
        } else {
            self.0.push(symbol.clone());
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn to_vec(&self) -> Vec<Symbol> {
        self.0.clone()
    }
}

impl FromIterator<Symbol> for Favorites {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut favorites = Favorites::new();
        for symbol in iter {
            favorites.insert(symbol);
        }
        favorites
    }
}

impl<'a> IntoIterator for &'a Favorites {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_iter_dedups_and_keeps_order() {
        let favorites: Favorites = ["ETH", "AAPL", "ETH", "V"]
            .into_iter()
            .map(Symbol::from)
            .collect();
        let order: Vec<_> = favorites.iter().map(Symbol::as_str).collect();
        assert_eq!(order, ["ETH", "AAPL", "V"]);
    }

    #[test]
    fn test_toggle() {
        let mut favorites = Favorites::new();
        let sym = Symbol::from("SOL");
        assert!(favorites.toggle(&sym));
        assert!(favorites.contains(&sym));
        assert!(!favorites.toggle(&sym));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_insert_and_remove_report_change() {
        let mut favorites = Favorites::new();
        assert!(favorites.insert(Symbol::from("JPM")));
        assert!(!favorites.insert(Symbol::from("JPM")));
        assert!(favorites.remove(&Symbol::from("JPM")));
        assert!(!favorites.remove(&Symbol::from("JPM")));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let favorites: Favorites = [Symbol::from("AAPL")].into_iter().collect();
        assert_eq!(serde_json::to_string(&favorites).unwrap(), "[\"AAPL\"]");
    }
}
