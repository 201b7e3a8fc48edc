// Swipe Decision Engine, the per-session card deck, and the match list.

pub mod deck;
pub mod engine;
pub mod handlers;
pub mod matches;

pub use deck::{DeckError, DeckView, SwipeDeck};
pub use engine::{DragRelease, SwipeDirection, SwipeOutcome};
pub use matches::MatchList;
