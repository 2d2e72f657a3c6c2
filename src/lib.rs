//! StudyKit - exam prep progress tracking
//!
//! StudyKit maintains a per-user progress profile for a study application:
//! XP and levels, daily goals, day streaks, a bounded activity log, and a
//! static achievement catalog evaluated against the current profile.
//!
//! ## Architecture
//!
//! The progress rules are pure state transitions over [`ProgressSnapshot`]
//! values. Persistence goes through the [`store::ProfileStore`] trait (a
//! document store keyed by user id), and day boundaries come from the
//! injected [`clock::Clock`], so every transition is testable without a
//! database or wall clock.

pub mod clock;
pub mod config;
pub mod progress;
pub mod store;

pub use progress::*;
