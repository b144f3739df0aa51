//! Nullable clock for crossing vote deadlines on demand.

use coffer_types::Timestamp;
use std::cell::Cell;

/// A manually driven clock.
///
/// Time only moves when a test moves it, so "voting still open" and
/// "voting closed" can be asserted on either side of an exact deadline.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Move forward by `secs`, saturating at the end of time.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get().saturating_add(secs));
    }

    /// Jump to exactly `deadline`, the first instant at which it has passed.
    /// Never moves backwards.
    pub fn reach(&self, deadline: Timestamp) {
        self.current.set(self.current.get().max(deadline.as_secs()));
    }

    /// Jump to one second before `deadline`, the last instant a request
    /// with that deadline is still open.
    pub fn just_before(&self, deadline: Timestamp) {
        self.current.set(deadline.as_secs().saturating_sub(1));
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_on_request() {
        let clock = NullClock::new(1_000);
        assert_eq!(clock.now(), Timestamp::new(1_000));
        clock.advance(500);
        assert_eq!(clock.now(), Timestamp::new(1_500));
    }

    #[test]
    fn straddles_a_deadline() {
        let clock = NullClock::new(1_000);
        let deadline = Timestamp::new(1_300);

        clock.just_before(deadline);
        assert!(!deadline.has_passed(clock.now()));
        clock.reach(deadline);
        assert!(deadline.has_passed(clock.now()));

        clock.reach(Timestamp::new(5));
        assert_eq!(clock.now(), deadline);
    }
}
