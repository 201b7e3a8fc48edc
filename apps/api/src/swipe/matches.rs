use serde::Serialize;

use crate::models::FeedItem;

/// Accepted cards, in the order they were accepted.
///
/// Keyed by card kind and id, so accepting a card twice (after a deck
/// restart) keeps a single entry.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MatchList {
    items: Vec<FeedItem>,
}

impl MatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the card was already matched.
    pub fn add(&mut self, item: FeedItem) -> bool {
        if self.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains(&self, item: &FeedItem) -> bool {
        self.items.iter().any(|m| same_card(m, item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

fn same_card(a: &FeedItem, b: &FeedItem) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b) && a.id() == b.id()
}
