//! Swipe Decision Engine: turns a released drag gesture into a decision.
//!
//! # Rules
//! - A release commits when |offset| exceeds `offset_threshold(viewport)` or
//!   |velocity| exceeds `VELOCITY_THRESHOLD`. Either alone is enough.
//! - Positive means accept, negative means reject. If the offset crossed its
//!   threshold the offset's sign decides, otherwise the velocity's.
//! - Anything below both thresholds springs back to offset 0.
//!
//! Pure and synchronous. The deck applies the resulting decision.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Constants
// ────────────────────────────────────────────────────────────────────────────

/// Fraction of the viewport width an offset must cover, capped at `MAX_OFFSET_THRESHOLD`.
pub const OFFSET_THRESHOLD_RATIO: f64 = 0.25;
pub const MAX_OFFSET_THRESHOLD: f64 = 100.0;
/// Units per second.
pub const VELOCITY_THRESHOLD: f64 = 500.0;

pub const EXIT_DURATION: Duration = Duration::from_millis(300);
pub const EXIT_OPACITY: f64 = 0.0;
pub const EXIT_SCALE: f64 = 0.95;
/// Minimum exit travel, so small viewports still clear the card.
pub const MIN_EXIT_DISTANCE: f64 = 400.0;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// A drag gesture at the moment of release.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DragRelease {
    pub offset: f64,
    pub velocity: f64,
    pub viewport_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Accept,
    Reject,
}

impl SwipeDirection {
    fn sign(self) -> f64 {
        match self {
            SwipeDirection::Accept => 1.0,
            SwipeDirection::Reject => -1.0,
        }
    }
}

/// The off-screen animation a committed card plays before the deck advances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExitTransition {
    pub direction: SwipeDirection,
    pub translate_x: f64,
    pub opacity: f64,
    pub scale: f64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SwipeOutcome {
    Commit(ExitTransition),
    /// Return to offset 0. Nothing else changes.
    SpringBack,
}

// ────────────────────────────────────────────────────────────────────────────
// Decision
// ────────────────────────────────────────────────────────────────────────────

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn viewport(width: f64) -> f64 {
    finite_or_zero(width).max(0.0)
}

pub fn offset_threshold(viewport_width: f64) -> f64 {
    (OFFSET_THRESHOLD_RATIO * viewport(viewport_width)).min(MAX_OFFSET_THRESHOLD)
}

pub fn exit_transition(direction: SwipeDirection, viewport_width: f64) -> ExitTransition {
    ExitTransition {
        direction,
        translate_x: direction.sign() * viewport(viewport_width).max(MIN_EXIT_DISTANCE),
        opacity: EXIT_OPACITY,
        scale: EXIT_SCALE,
        duration_ms: EXIT_DURATION.as_millis() as u64,
    }
}

pub fn resolve(release: &DragRelease) -> SwipeOutcome {
    let offset = finite_or_zero(release.offset);
    let velocity = finite_or_zero(release.velocity);

    let offset_crossed = offset.abs() > offset_threshold(release.viewport_width);
    let velocity_crossed = velocity.abs() > VELOCITY_THRESHOLD;

    let deciding = if offset_crossed {
        offset
    } else if velocity_crossed {
        velocity
    } else {
        return SwipeOutcome::SpringBack;
    };

    let direction = if deciding > 0.0 {
        SwipeDirection::Accept
    } else {
        SwipeDirection::Reject
    };
    SwipeOutcome::Commit(exit_transition(direction, release.viewport_width))
}
