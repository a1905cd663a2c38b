//! Practice puzzle generation.
//!
//! When `--practice` is given we build a one-off puzzle from a networking
//! vocabulary word, encoded with the same Baconian codec the layer pages use.
//!
//! # Design
//!
//! Word choice is driven by a seeded ChaCha8 RNG, so a seed always yields the
//! same puzzle. The chosen word's layer becomes the puzzle's layer number.

use osi_puzzle_core::cipher::encode_text;
use osi_puzzle_core::PuzzleSpec;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Id of the generated puzzle on the page.
pub const PRACTICE_ID: &str = "practice";

/// Vocabulary words and the OSI layer each belongs to.
const VOCABULARY: &[(&str, u8)] = &[
    ("SIGNAL", 1),
    ("VOLTAGE", 1),
    ("FRAME", 2),
    ("SWITCH", 2),
    ("PACKET", 3),
    ("ROUTER", 3),
    ("SEGMENT", 4),
    ("PORT", 4),
    ("HANDSHAKE", 4),
    ("DIALOG", 5),
    ("CHECKPOINT", 5),
    ("ENCODING", 6),
    ("SYNTAX", 6),
    ("BROWSER", 7),
];

/// Generate a practice puzzle from the vocabulary.
///
/// # Arguments
/// - `seed`: random seed for determinism
pub fn generate_practice_puzzle(seed: u64) -> PuzzleSpec {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (word, layer) = VOCABULARY[rng.gen_range(0..VOCABULARY.len())];

    PuzzleSpec {
        id: PRACTICE_ID.to_string(),
        layer,
        title: format!("Practice (layer {})", layer),
        blurb: format!(
            "A {}-letter word from layer {} vocabulary. Seed {} replays this puzzle.",
            word.len(),
            layer,
            seed
        ),
        groups: encode_text(word),
        answer: word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_puzzle_is_clean() {
        let puzzle = generate_practice_puzzle(42);
        assert_eq!(puzzle.id, PRACTICE_ID);
        assert!(puzzle.lint().is_empty());
        assert_eq!(puzzle.decoded(), puzzle.answer);
    }

    #[test]
    fn test_determinism() {
        let a = generate_practice_puzzle(12345);
        let b = generate_practice_puzzle(12345);

        assert_eq!(a, b);
    }

    #[test]
    fn test_every_word_encodes() {
        for (word, layer) in VOCABULARY {
            assert!((1..=7).contains(layer));
            assert_eq!(encode_text(word).len(), word.len());
        }
    }

    #[test]
    fn test_seeds_cover_vocabulary() {
        let words: std::collections::HashSet<String> =
            (0..500).map(|seed| generate_practice_puzzle(seed).answer).collect();
        assert!(words.len() > 1);
    }
}
