//! Puzzle content: which layers have puzzles and what their chips encode.
//!
//! A deck is authored in TOML, one `[[puzzle]]` table per layer page:
//!
//! ```toml
//! [[puzzle]]
//! id = "transport"
//! layer = 4
//! title = "Transport Layer"
//! groups = ["BAAAB", "AABAA", "ABABB", "ABAAA", "AAAAA", "AAAAB", "ABABB", "AABAA"]
//! answer = "Reliable"
//! ```
//!
//! The built-in deck covers the transport and session layers.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cipher::{decode_groups, is_valid_group, normalize_plaintext};
use crate::error::{DeckError, Result};

/// One puzzle as declared in content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSpec {
    /// Puzzle instance name, also used to address its controls
    pub id: String,

    /// OSI layer number the page teaches
    pub layer: u8,

    /// Page heading
    pub title: String,

    /// Short narrative shown above the chips
    #[serde(default)]
    pub blurb: String,

    /// Encoded groups in declaration order, one per chip
    pub groups: Vec<String>,

    /// Expected answer (compared after normalization)
    pub answer: String,
}

/// An ordered collection of puzzles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(rename = "puzzle", default)]
    pub puzzles: Vec<PuzzleSpec>,
}

/// Content problems that do not stop a deck from loading.
///
/// Invalid groups still render (as `?`), so these are reported rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintIssue {
    /// A group is not five A/B symbols naming a letter
    InvalidGroup {
        puzzle: String,
        index: usize,
        group: String,
    },

    /// The groups do not decode to the declared answer
    AnswerMismatch {
        puzzle: String,
        decoded: String,
        answer: String,
    },
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintIssue::InvalidGroup { puzzle, index, group } => {
                write!(f, "{}: chip {} has invalid group {:?}", puzzle, index, group)
            }
            LintIssue::AnswerMismatch {
                puzzle,
                decoded,
                answer,
            } => write!(
                f,
                "{}: groups decode to {:?} but answer is {:?}",
                puzzle, decoded, answer
            ),
        }
    }
}

impl Deck {
    /// The transport and session layer puzzles.
    pub fn builtin() -> Self {
        Self {
            puzzles: vec![
                PuzzleSpec {
                    id: "transport".to_string(),
                    layer: 4,
                    title: "Transport Layer".to_string(),
                    blurb: "TCP numbers every segment, waits for acknowledgements and \
                            retransmits what goes missing. One word sums up what that buys you."
                        .to_string(),
                    groups: ["BAAAB", "AABAA", "ABABB", "ABAAA", "AAAAA", "AAAAB", "ABABB", "AABAA"]
                        .iter()
                        .map(|g| g.to_string())
                        .collect(),
                    answer: "RELIABLE".to_string(),
                },
                PuzzleSpec {
                    id: "session".to_string(),
                    layer: 5,
                    title: "Session Layer".to_string(),
                    blurb: "Opening, checkpointing and closing a conversation between two \
                            applications. Decode the name of what this layer manages."
                        .to_string(),
                    groups: ["BAABA", "AABAA", "BAABA", "BAABA", "ABAAA", "ABBBA", "ABBAB"]
                        .iter()
                        .map(|g| g.to_string())
                        .collect(),
                    answer: "SESSION".to_string(),
                },
            ],
        }
    }

    /// Parse and validate a deck from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let deck: Deck = toml::from_str(text)?;
        deck.validate()?;
        Ok(deck)
    }

    /// Read, parse and validate a deck file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Structural checks: non-empty, unique ids, every puzzle has chips.
    pub fn validate(&self) -> std::result::Result<(), DeckError> {
        if self.puzzles.is_empty() {
            return Err(DeckError::Empty);
        }

        let mut seen = HashSet::new();
        for puzzle in &self.puzzles {
            if !seen.insert(puzzle.id.as_str()) {
                return Err(DeckError::DuplicateId(puzzle.id.clone()));
            }
            if puzzle.groups.is_empty() {
                return Err(DeckError::NoGroups(puzzle.id.clone()));
            }
        }

        Ok(())
    }

    /// Look up a puzzle by id.
    pub fn get(&self, id: &str) -> Option<&PuzzleSpec> {
        self.puzzles.iter().find(|p| p.id == id)
    }

    /// Look up a puzzle by id, as an error if absent.
    pub fn require(&self, id: &str) -> std::result::Result<&PuzzleSpec, DeckError> {
        self.get(id)
            .ok_or_else(|| DeckError::UnknownPuzzle(id.to_string()))
    }

    /// Content checks on every puzzle.
    pub fn lint(&self) -> Vec<LintIssue> {
        self.puzzles.iter().flat_map(PuzzleSpec::lint).collect()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PuzzleSpec {
    /// Plaintext the declared groups decode to.
    pub fn decoded(&self) -> String {
        decode_groups(&self.groups)
    }

    /// Content checks for this puzzle.
    pub fn lint(&self) -> Vec<LintIssue> {
        let mut issues: Vec<LintIssue> = self
            .groups
            .iter()
            .enumerate()
            .filter(|(_, group)| !is_valid_group(group))
            .map(|(index, group)| LintIssue::InvalidGroup {
                puzzle: self.id.clone(),
                index,
                group: group.clone(),
            })
            .collect();

        let decoded = self.decoded();
        if decoded != normalize_plaintext(&self.answer) {
            issues.push(LintIssue::AnswerMismatch {
                puzzle: self.id.clone(),
                decoded,
                answer: self.answer.clone(),
            });
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_deck_is_clean() {
        let deck = Deck::builtin();
        assert!(deck.validate().is_ok());
        assert!(deck.lint().is_empty());
        assert_eq!(deck.require("transport").unwrap().decoded(), "RELIABLE");
        assert_eq!(deck.require("session").unwrap().decoded(), "SESSION");
    }

    #[test]
    fn test_from_toml() {
        let text = r#"
            [[puzzle]]
            id = "network"
            layer = 3
            title = "Network Layer"
            groups = ["ABABB", "AABAA"]
            answer = "le"
        "#;
        let deck = Deck::from_toml_str(text).unwrap();
        let puzzle = deck.get("network").unwrap();
        assert_eq!(puzzle.layer, 3);
        assert_eq!(puzzle.blurb, "");
        assert!(deck.lint().is_empty());
    }

    #[test]
    fn test_empty_deck_rejected() {
        let err = Deck::from_toml_str("").unwrap_err();
        assert!(matches!(err, crate::Error::Deck(DeckError::Empty)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut deck = Deck::builtin();
        deck.puzzles.push(deck.puzzles[0].clone());
        assert_eq!(
            deck.validate(),
            Err(DeckError::DuplicateId("transport".to_string()))
        );
    }

    #[test]
    fn test_lint_reports_bad_groups_and_mismatch() {
        let spec = PuzzleSpec {
            id: "broken".to_string(),
            layer: 1,
            title: "Broken".to_string(),
            blurb: String::new(),
            groups: vec!["AAAAA".to_string(), "BBBBB".to_string(), "AAC".to_string()],
            answer: "ABC".to_string(),
        };
        let issues = spec.lint();
        assert_eq!(issues.len(), 3);
        assert_eq!(
            issues[0],
            LintIssue::InvalidGroup {
                puzzle: "broken".to_string(),
                index: 1,
                group: "BBBBB".to_string(),
            }
        );
        assert!(matches!(issues[2], LintIssue::AnswerMismatch { ref decoded, .. } if decoded == "A??"));
    }

    #[test]
    fn test_unknown_puzzle() {
        let deck = Deck::builtin();
        assert_eq!(
            deck.require("physical").unwrap_err(),
            DeckError::UnknownPuzzle("physical".to_string())
        );
    }
}
