//! Per-connection subscription manager.
//!
//! Tracks which pairs a WebSocket client is subscribed to and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::PairKey;

/// Manages the set of pair subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed pairs. Ignored while `subscribe_all` is set.
    pairs: HashSet<PairKey>,
    /// Whether the client subscribes to everything (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds pairs to the subscription set. `wildcard` enables match-all.
    pub fn subscribe(&mut self, pairs: &[PairKey], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for pair in pairs {
            self.pairs.insert(*pair);
        }
    }

    /// Removes pairs from the subscription set. `wildcard` clears
    /// match-all.
    pub fn unsubscribe(&mut self, pairs: &[PairKey], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for pair in pairs {
            self.pairs.remove(pair);
        }
    }

    /// Returns `true` if an event tagged with `pair` should be delivered.
    ///
    /// Events without a pair (token creations) only match the wildcard.
    #[must_use]
    pub fn matches(&self, pair: Option<PairKey>) -> bool {
        if self.subscribe_all {
            return true;
        }
        pair.is_some_and(|p| self.pairs.contains(&p))
    }

    /// Returns the number of explicitly subscribed pairs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Address;

    fn pair(a: u8, b: u8) -> PairKey {
        let Ok(pair) = PairKey::new(Address::from_bytes([a; 20]), Address::from_bytes([b; 20]))
        else {
            panic!("valid pair");
        };
        pair
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(Some(pair(1, 2))));
        assert!(!mgr.matches(None));
    }

    #[test]
    fn subscribe_specific_pair() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[pair(1, 2)], false);
        assert!(mgr.matches(Some(pair(1, 2))));
        assert!(!mgr.matches(Some(pair(3, 4))));
    }

    #[test]
    fn wildcard_matches_everything_including_pairless() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.matches(Some(pair(1, 2))));
        assert!(mgr.matches(None));
    }

    #[test]
    fn pairless_events_need_wildcard() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[pair(1, 2)], false);
        assert!(!mgr.matches(None));
    }

    #[test]
    fn unsubscribe_removes_pair_and_wildcard() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[pair(1, 2)], true);
        mgr.unsubscribe(&[pair(1, 2)], false);
        assert!(mgr.matches(Some(pair(1, 2)))); // wildcard still on
        mgr.unsubscribe(&[], true);
        assert!(!mgr.matches(Some(pair(1, 2))));
    }

    #[test]
    fn count_tracks_explicit() {
        let mut mgr = SubscriptionManager::new();
        assert_eq!(mgr.count(), 0);
        mgr.subscribe(&[pair(1, 2), pair(3, 4)], false);
        assert_eq!(mgr.count(), 2);
    }
}
