//! Anti-replay sequence window
//!
//! Tracks the ten most recently accepted sequence ids in a fixed array
//! instead of an unbounded history. Acceptance evicts the smallest held
//! value, so membership is unordered. An id must be strictly greater
//! than the current window minimum (anything at or below the floor is
//! provably stale) and at most `minimum + MAX_SEQUENCE_GAP`, so a huge
//! id cannot lock legitimate low ids out of the window.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of recently accepted sequence ids kept
pub const WINDOW_SIZE: usize = 10;

/// Maximum distance a new id may sit above the current window minimum
pub const MAX_SEQUENCE_GAP: u64 = 10_000;

/// Sequence window rejection kinds
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Sequence id {0} already used")]
    Replayed(u64),
    #[error("Sequence id {id} too low: window minimum is {minimum}")]
    TooLow { id: u64, minimum: u64 },
    #[error("Sequence id {id} too high: window ceiling is {ceiling}")]
    TooHigh { id: u64, ceiling: u64 },
}

/// Fixed-capacity window of recently accepted sequence ids
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SequenceWindow {
    slots: [u64; WINDOW_SIZE],
}

impl Default for SequenceWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceWindow {
    /// Create an empty window (all slots zero)
    pub fn new() -> Self {
        Self {
            slots: [0; WINDOW_SIZE],
        }
    }

    /// Try to accept a sequence id, evicting the window minimum on success
    ///
    /// The overwrite of the minimum slot is the only mutation this type
    /// performs.
    pub fn try_accept(&mut self, id: u64) -> Result<(), SequenceError> {
        let mut min_index = 0;
        for (index, &slot) in self.slots.iter().enumerate() {
            if slot == id {
                return Err(SequenceError::Replayed(id));
            }
            if slot < self.slots[min_index] {
                min_index = index;
            }
        }

        let minimum = self.slots[min_index];
        if id < minimum {
            return Err(SequenceError::TooLow { id, minimum });
        }

        let ceiling = minimum.saturating_add(MAX_SEQUENCE_GAP);
        if id > ceiling {
            return Err(SequenceError::TooHigh { id, ceiling });
        }

        self.slots[min_index] = id;
        Ok(())
    }

    /// The next id guaranteed to be acceptable: `max(slots) + 1`
    pub fn next_available(&self) -> u64 {
        self.slots.iter().copied().max().unwrap_or(0) + 1
    }

    /// Current window minimum (the next eviction candidate)
    pub fn minimum(&self) -> u64 {
        self.slots.iter().copied().min().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_window() {
        let window = SequenceWindow::new();
        assert_eq!(window.next_available(), 1);
        assert_eq!(window.minimum(), 0);
    }

    #[test]
    fn test_accept_and_replay() {
        let mut window = SequenceWindow::new();

        window.try_accept(1).unwrap();
        window.try_accept(2).unwrap();
        assert_eq!(window.try_accept(1), Err(SequenceError::Replayed(1)));
        assert_eq!(window.try_accept(2), Err(SequenceError::Replayed(2)));
    }

    #[test]
    fn test_zero_always_rejected() {
        // Zero matches an empty slot, so it reads as already used
        let mut window = SequenceWindow::new();
        assert_eq!(window.try_accept(0), Err(SequenceError::Replayed(0)));
    }

    #[test]
    fn test_too_low_after_window_fills() {
        let mut window = SequenceWindow::new();

        // Fill all ten slots so the minimum climbs above zero
        for id in 2..=11 {
            window.try_accept(id).unwrap();
        }
        assert_eq!(window.minimum(), 2);

        // 1 was never accepted, but it sits below the floor
        assert_eq!(
            window.try_accept(1),
            Err(SequenceError::TooLow { id: 1, minimum: 2 })
        );

        window.try_accept(12).unwrap();
        // 2 was evicted; resubmitting it is now stale rather than a replay
        assert_eq!(
            window.try_accept(2),
            Err(SequenceError::TooLow { id: 2, minimum: 3 })
        );
    }

    #[test]
    fn test_window_minimum_rejected_as_replay() {
        let mut window = SequenceWindow::new();
        for id in 1..=10 {
            window.try_accept(id).unwrap();
        }
        // The minimum itself is still held in a slot
        assert_eq!(window.try_accept(1), Err(SequenceError::Replayed(1)));
    }

    #[test]
    fn test_ceiling_rejected() {
        let mut window = SequenceWindow::new();
        assert_eq!(
            window.try_accept(MAX_SEQUENCE_GAP + 1),
            Err(SequenceError::TooHigh {
                id: MAX_SEQUENCE_GAP + 1,
                ceiling: MAX_SEQUENCE_GAP,
            })
        );
        // Exactly at the ceiling is fine
        window.try_accept(MAX_SEQUENCE_GAP).unwrap();
    }

    #[test]
    fn test_min_eviction_order_independent() {
        let mut window = SequenceWindow::new();

        window.try_accept(5).unwrap();
        window.try_accept(3).unwrap();
        window.try_accept(9).unwrap();

        assert_eq!(window.next_available(), 10);
        // Out-of-order acceptance keeps all three as used
        assert_eq!(window.try_accept(3), Err(SequenceError::Replayed(3)));
        assert_eq!(window.try_accept(5), Err(SequenceError::Replayed(5)));
        assert_eq!(window.try_accept(9), Err(SequenceError::Replayed(9)));
        // Gaps below the maximum are still acceptable while slots are empty
        window.try_accept(4).unwrap();
    }

    #[test]
    fn test_next_available_tracks_max() {
        let mut window = SequenceWindow::new();
        window.try_accept(7).unwrap();
        assert_eq!(window.next_available(), 8);
        window.try_accept(100).unwrap();
        assert_eq!(window.next_available(), 101);
        window.try_accept(50).unwrap();
        assert_eq!(window.next_available(), 101);
    }

    #[test]
    fn test_failed_accept_does_not_mutate() {
        let mut window = SequenceWindow::new();
        window.try_accept(5).unwrap();
        let before = window.clone();

        assert!(window.try_accept(5).is_err());
        assert!(window.try_accept(MAX_SEQUENCE_GAP + 10).is_err());
        assert_eq!(window, before);
    }
}
