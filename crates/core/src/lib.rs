//! osi-puzzle-core: Baconian cipher puzzles for the OSI layer lessons
//!
//! Each layer page hides a word behind a row of chips. Every chip carries a
//! five-symbol A/B group that decodes to one letter; the learner flips chips,
//! asks for a hint, or reveals everything, then types a guess.
//!
//! # Architecture
//!
//! - `cipher`: Baconian codec (pure functions, no state)
//! - `puzzle`: chip and per-puzzle state machines
//! - `controller`: binds puzzle state to a page and applies user actions
//! - `events`: listener registration and dispatch
//! - `scheduler`: single-threaded timeline for staggered reveals
//! - `surface`: the page abstraction the controller draws on
//! - `preferences`: durable theme and keyboard-hint flags
//! - `deck`: puzzle content loaded from TOML
//! - `selftest`: known-answer diagnostic for the codec
//! - `metrics`: session counters
//!
//! # Design Principles
//!
//! - **No fatal paths**: malformed groups decode to `?`, missing page targets
//!   are logged and skipped
//! - **Single-threaded**: every change happens inside a dispatched event or a
//!   timeline advance
//! - **Eager decoding**: letters are computed when a puzzle is bound, not
//!   when a chip is flipped

pub mod cipher;
pub mod controller;
pub mod deck;
pub mod error;
pub mod events;
pub mod metrics;
pub mod preferences;
pub mod puzzle;
pub mod scheduler;
pub mod selftest;
pub mod surface;

// Re-export commonly used types
pub use cipher::{decode_group, decode_groups, is_valid_group, normalize_plaintext, DecodedLetter};
pub use controller::PuzzleController;
pub use deck::{Deck, PuzzleSpec};
pub use error::{Error, Result};
