//! The card stack a session swipes through.
//!
//! A committed decision starts an exit transition; the index advances only
//! once `EXIT_DURATION` has elapsed and the deck is settled. Time is passed in
//! so the deck stays deterministic under tokio's paused clock.

use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;

use crate::models::FeedItem;
use crate::swipe::engine::{ExitTransition, EXIT_DURATION};

#[derive(Debug, Error, PartialEq)]
pub enum DeckError {
    #[error("No more cards; restart the deck to see them again")]
    Exhausted,

    #[error("The previous card is still leaving the screen")]
    ExitInProgress,
}

#[derive(Debug, Clone)]
struct PendingExit {
    transition: ExitTransition,
    deadline: Instant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExitingCard {
    pub item_id: String,
    pub transition: ExitTransition,
}

/// What the swipe screen renders.
#[derive(Debug, Clone, Serialize)]
pub struct DeckView {
    pub current: Option<FeedItem>,
    pub exiting: Option<ExitingCard>,
    /// A card sits behind the current one (stack preview).
    pub has_next: bool,
    pub position: usize,
    pub total: usize,
    pub exhausted: bool,
}

/// A committed decision, returned so the caller can record matches and wait
/// out the transition.
#[derive(Debug, Clone)]
pub struct Committed {
    pub item: FeedItem,
    pub transition: ExitTransition,
    pub deadline: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct SwipeDeck {
    items: Vec<FeedItem>,
    index: usize,
    pending: Option<PendingExit>,
}

impl SwipeDeck {
    pub fn new(items: Vec<FeedItem>) -> Self {
        Self {
            items,
            index: 0,
            pending: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<&FeedItem> {
        self.items.get(self.index)
    }

    /// Finishes an exit whose transition has run its course. Returns whether
    /// the index moved.
    pub fn settle(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(exit) if now >= exit.deadline => {
                self.pending = None;
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    pub fn commit(
        &mut self,
        transition: ExitTransition,
        now: Instant,
    ) -> Result<Committed, DeckError> {
        self.settle(now);
        if self.pending.is_some() {
            return Err(DeckError::ExitInProgress);
        }
        let item = self.current().cloned().ok_or(DeckError::Exhausted)?;
        let deadline = now + EXIT_DURATION;
        self.pending = Some(PendingExit {
            transition,
            deadline,
        });
        Ok(Committed {
            item,
            transition,
            deadline,
        })
    }

    /// Back to the first card. Matches are kept by the caller.
    pub fn restart(&mut self) {
        self.index = 0;
        self.pending = None;
    }

    pub fn view(&mut self, now: Instant) -> DeckView {
        self.settle(now);
        let exiting = self.pending.as_ref().and_then(|exit| {
            self.current().map(|item| ExitingCard {
                item_id: item.id().to_string(),
                transition: exit.transition,
            })
        });
        // While a card exits, the card behind it is what the user sees next.
        let next_index = if exiting.is_some() { self.index + 1 } else { self.index };
        DeckView {
            current: self.items.get(next_index).cloned(),
            has_next: next_index + 1 < self.items.len(),
            exiting,
            position: next_index.min(self.items.len()),
            total: self.items.len(),
            exhausted: next_index >= self.items.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;
    use crate::profiles::feed::seed_deck;
    use crate::swipe::engine::{exit_transition, SwipeDirection};
    use std::time::Duration;

    fn accept() -> ExitTransition {
        exit_transition(SwipeDirection::Accept, 400.0)
    }

    fn reject() -> ExitTransition {
        exit_transition(SwipeDirection::Reject, 400.0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_index_advances_only_after_exit_duration() {
        let mut deck = SwipeDeck::new(seed_deck(Mode::Seeker));
        let start = Instant::now();

        let committed = deck.commit(accept(), start).unwrap();
        assert_eq!(committed.item.id(), "1");
        assert_eq!(committed.deadline, start + EXIT_DURATION);

        assert!(!deck.settle(start + Duration::from_millis(299)));
        assert_eq!(deck.current().map(FeedItem::id), Some("1"));

        assert!(deck.settle(start + EXIT_DURATION));
        assert_eq!(deck.current().map(FeedItem::id), Some("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_during_exit_is_rejected() {
        let mut deck = SwipeDeck::new(seed_deck(Mode::Seeker));
        let start = Instant::now();
        deck.commit(reject(), start).unwrap();

        let err = deck.commit(accept(), start + Duration::from_millis(100)).unwrap_err();
        assert_eq!(err, DeckError::ExitInProgress);

        let committed = deck.commit(accept(), start + EXIT_DURATION).unwrap();
        assert_eq!(committed.item.id(), "2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_and_restart() {
        let mut deck = SwipeDeck::new(seed_deck(Mode::Employer));
        let mut now = Instant::now();
        for _ in 0..deck.len() {
            deck.commit(reject(), now).unwrap();
            now += EXIT_DURATION;
        }

        let view = deck.view(now);
        assert!(view.exhausted);
        assert!(view.current.is_none());
        assert_eq!(deck.commit(accept(), now).unwrap_err(), DeckError::Exhausted);

        deck.restart();
        let view = deck.view(now);
        assert!(!view.exhausted);
        assert_eq!(view.position, 0);
        assert_eq!(view.current.as_ref().map(FeedItem::headline), Some("Sarah Chen"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_during_exit_shows_next_card_and_exiting_card() {
        let mut deck = SwipeDeck::new(seed_deck(Mode::Seeker));
        let start = Instant::now();
        deck.commit(accept(), start).unwrap();

        let view = deck.view(start + Duration::from_millis(50));
        let exiting = view.exiting.expect("card should be exiting");
        assert_eq!(exiting.item_id, "1");
        assert_eq!(exiting.transition.direction, SwipeDirection::Accept);
        assert_eq!(view.current.as_ref().map(FeedItem::id), Some("2"));
        assert!(view.has_next);
        assert_eq!(view.position, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_card_has_no_next() {
        let items = seed_deck(Mode::Seeker).into_iter().take(1).collect();
        let mut deck = SwipeDeck::new(items);
        let view = deck.view(Instant::now());
        assert!(!view.has_next);
        assert_eq!(view.total, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_deck_is_exhausted() {
        let mut deck = SwipeDeck::new(Vec::new());
        assert!(deck.is_empty());
        assert!(deck.view(Instant::now()).exhausted);
    }
}
