//! Error types for the puzzle engine.
//!
//! Nothing in the codec or the controller is fatal. Malformed cipher groups
//! resolve to [`DecodedLetter::Unknown`](crate::cipher::DecodedLetter), and
//! missing presentation targets are logged and skipped. The errors below are
//! what the fallible edges (surface lookups, deck loading, the preference
//! file) report to their callers.

use thiserror::Error;

/// Top-level error type for all fallible operations in the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A presentation target was missing or malformed
    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),

    /// A puzzle deck failed validation
    #[error("deck error: {0}")]
    Deck(#[from] DeckError),

    /// Reading or writing durable preferences failed
    #[error("preference error: {0}")]
    Preference(#[from] PreferenceError),

    /// Deck TOML could not be parsed
    #[error("deck parse error: {0}")]
    DeckParse(#[from] toml::de::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Presentation-surface lookup failures.
///
/// These are the "missing binding target" cases: the controller logs them and
/// turns the requested operation into a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// No puzzle with this name exists on the surface
    #[error("no puzzle named {puzzle:?} on this page")]
    UnknownPuzzle { puzzle: String },

    /// The puzzle exists but lacks one of its controls
    #[error("puzzle {puzzle:?} has no {control} control")]
    MissingControl {
        puzzle: String,
        control: crate::surface::Control,
    },

    /// Chip index past the end of the puzzle's chip row
    #[error("chip {index} out of range for puzzle {puzzle:?} ({len} chips)")]
    ChipOutOfRange {
        puzzle: String,
        index: usize,
        len: usize,
    },

    /// The puzzle was never initialized by the controller
    #[error("puzzle {puzzle:?} is not initialized")]
    NotInitialized { puzzle: String },
}

/// Deck validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// Deck contains no puzzles
    #[error("deck contains no puzzles")]
    Empty,

    /// Two puzzles share the same id
    #[error("duplicate puzzle id {0:?}")]
    DuplicateId(String),

    /// Requested puzzle id is not in the deck
    #[error("no puzzle with id {0:?} in deck")]
    UnknownPuzzle(String),

    /// A puzzle declares no chips
    #[error("puzzle {0:?} declares no cipher groups")]
    NoGroups(String),
}

/// Durable preference storage errors.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// The preference file exists but could not be read
    #[error("failed to read preference file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The preference file exists but is not a JSON string map
    #[error("malformed preference file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Writing the preference file failed
    #[error("failed to write preference file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Control;

    #[test]
    fn test_display_unknown_puzzle() {
        let err = SurfaceError::UnknownPuzzle {
            puzzle: "network".to_string(),
        };
        assert_eq!(format!("{}", err), "no puzzle named \"network\" on this page");
    }

    #[test]
    fn test_display_missing_control() {
        let err = SurfaceError::MissingControl {
            puzzle: "transport".to_string(),
            control: Control::HintButton,
        };
        assert_eq!(
            format!("{}", err),
            "puzzle \"transport\" has no hint button control"
        );
    }

    #[test]
    fn test_surface_error_converts() {
        let err: Error = SurfaceError::NotInitialized {
            puzzle: "session".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Surface(_)));
        assert!(format!("{}", err).starts_with("surface error:"));
    }

    #[test]
    fn test_deck_error_display() {
        assert_eq!(format!("{}", DeckError::Empty), "deck contains no puzzles");
        assert_eq!(
            format!("{}", DeckError::DuplicateId("session".into())),
            "duplicate puzzle id \"session\""
        );
    }
}
