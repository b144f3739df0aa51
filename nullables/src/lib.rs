//! Nullable infrastructure for deterministic testing.
//!
//! The treasury never reads a clock itself: every time-dependent call takes a
//! `Timestamp`. Tests and tools that need a moving "now" use [`NullClock`]
//! instead of the system clock so deadlines can be crossed on demand.

pub mod clock;

pub use clock::NullClock;
