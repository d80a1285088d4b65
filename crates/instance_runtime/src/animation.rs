//! Frame animation state machine
//!
//! Tracks last/current/next frame indices and keeps the caller's *intent*
//! (a requested transition) separate from what the per-tick update actually
//! *applied*. Deferred requests sit in `next` until [`AnimationState::advance`]
//! commits them; forced requests apply immediately.
//!
//! The machine is index-agnostic: range validation against the model's frame
//! count is the instance's job, since the instance owns the model reference.

/// How a requested frame transition should be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Apply at the next update boundary
    Deferred,
    /// Apply immediately, without waiting for an update
    Forced,
}

/// Last/current/next animation frame tracking for one instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationState {
    last: usize,
    current: usize,
    /// Pending transition; `None` means no transition is pending
    next: Option<usize>,
}

impl AnimationState {
    /// Create a state machine resting at frame zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the last frame visited
    pub fn last(&self) -> usize {
        self.last
    }

    /// Get the currently applied frame
    pub fn current(&self) -> usize {
        self.current
    }

    /// Get the pending frame, if a deferred transition is waiting
    pub fn pending(&self) -> Option<usize> {
        self.next
    }

    /// Request a transition to `frame`
    ///
    /// A forced transition commits immediately and clears any pending one;
    /// a deferred transition replaces the pending frame and commits at the
    /// next [`advance`](Self::advance).
    pub fn request(&mut self, frame: usize, transition: Transition) {
        match transition {
            Transition::Forced => {
                self.last = self.current;
                self.current = frame;
                self.next = None;
            }
            Transition::Deferred => {
                self.next = Some(frame);
            }
        }
    }

    /// Commit a pending transition, if any
    ///
    /// Returns `true` when the current frame changed. Calling this with no
    /// pending transition is the steady state and changes nothing.
    pub fn advance(&mut self) -> bool {
        let Some(next) = self.next.take() else {
            return false;
        };

        self.last = self.current;
        self.current = next;
        next != self.last
    }

    /// Drop any pending transition and reset to frame zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_waits_for_advance() {
        let mut state = AnimationState::new();
        state.request(3, Transition::Deferred);

        assert_eq!(state.current(), 0);
        assert_eq!(state.pending(), Some(3));

        assert!(state.advance());
        assert_eq!(state.current(), 3);
        assert_eq!(state.last(), 0);
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn test_forced_applies_immediately() {
        let mut state = AnimationState::new();
        state.request(5, Transition::Forced);

        assert_eq!(state.current(), 5);
        assert_eq!(state.last(), 0);
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn test_forced_clears_pending() {
        let mut state = AnimationState::new();
        state.request(3, Transition::Deferred);
        state.request(7, Transition::Forced);

        assert_eq!(state.current(), 7);
        assert_eq!(state.pending(), None);
        assert!(!state.advance());
        assert_eq!(state.current(), 7);
    }

    #[test]
    fn test_advance_is_idempotent_when_steady() {
        let mut state = AnimationState::new();
        state.request(2, Transition::Deferred);
        assert!(state.advance());
        assert!(!state.advance());
        assert_eq!(state.current(), 2);
    }

    #[test]
    fn test_advance_to_same_frame_reports_no_change() {
        let mut state = AnimationState::new();
        state.request(0, Transition::Deferred);
        assert!(!state.advance());
        assert_eq!(state.current(), 0);
    }
}
