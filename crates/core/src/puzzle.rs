//! Per-puzzle state: chips, expected answer and guess feedback.
//!
//! # Chip lifecycle
//!
//! A chip starts face down and unrevealed. Any reveal path (click, keyboard,
//! reveal-all, hint) turns it face up and marks it revealed. Clicking a
//! face-up chip turns it face down again, but that is cosmetic: `revealed`
//! is a one-way fact and never goes back to false.
//!
//! # Guess feedback
//!
//! `None -> Correct | Incorrect`, re-enterable. Editing the guess clears
//! feedback; an empty normalized guess also clears it rather than counting
//! as wrong.

use crate::cipher::{decode_group, normalize_plaintext, DecodedLetter};

/// Which side of a chip is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChipFace {
    /// Encoded group showing
    #[default]
    Down,
    /// Decoded letter showing
    Up,
}

impl ChipFace {
    pub fn flipped(self) -> Self {
        match self {
            ChipFace::Down => ChipFace::Up,
            ChipFace::Up => ChipFace::Down,
        }
    }
}

/// Outcome of the last guess check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
}

impl Feedback {
    /// Text for the feedback region (empty when hidden).
    pub fn message(self) -> &'static str {
        match self {
            Feedback::None => "",
            Feedback::Correct => "Correct! You decoded the message.",
            Feedback::Incorrect => "Not quite. Check your letters and try again.",
        }
    }
}

/// Compare a guess with an expected answer after normalizing both.
pub fn evaluate_guess(guess: &str, expected: &str) -> Feedback {
    let guess = normalize_plaintext(guess);
    if guess.is_empty() {
        Feedback::None
    } else if guess == normalize_plaintext(expected) {
        Feedback::Correct
    } else {
        Feedback::Incorrect
    }
}

/// One chip bound to a cipher group and its decoded letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleChip {
    group: String,
    letter: DecodedLetter,
    face: ChipFace,
    revealed: bool,
}

impl PuzzleChip {
    /// Create a face-down chip, decoding its group up front.
    pub fn new(group: &str) -> Self {
        Self {
            group: group.to_string(),
            letter: decode_group(group),
            face: ChipFace::Down,
            revealed: false,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn letter(&self) -> DecodedLetter {
        self.letter
    }

    pub fn face(&self) -> ChipFace {
        self.face
    }

    /// True once the letter has been shown, even if flipped back since.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Face down right now.
    pub fn is_hidden(&self) -> bool {
        self.face == ChipFace::Down
    }

    /// Flip the chip and return the new face.
    pub fn flip(&mut self) -> ChipFace {
        self.face = self.face.flipped();
        if self.face == ChipFace::Up {
            self.revealed = true;
        }
        self.face
    }

    /// Turn face up. Returns true if the chip was face down.
    pub fn reveal(&mut self) -> bool {
        let changed = self.face == ChipFace::Down;
        self.face = ChipFace::Up;
        self.revealed = true;
        changed
    }
}

/// Revealed chips versus total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub revealed: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.revealed == self.total
    }
}

/// State of one puzzle instance.
#[derive(Debug, Clone)]
pub struct PuzzleState {
    id: String,
    chips: Vec<PuzzleChip>,
    expected: String,
    feedback: Feedback,
    hint_visible: bool,
}

impl PuzzleState {
    pub fn new<I, S>(id: &str, groups: I, expected: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.to_string(),
            chips: groups
                .into_iter()
                .map(|group| PuzzleChip::new(group.as_ref()))
                .collect(),
            expected: expected.to_string(),
            feedback: Feedback::None,
            hint_visible: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chips(&self) -> &[PuzzleChip] {
        &self.chips
    }

    pub fn chip(&self, index: usize) -> Option<&PuzzleChip> {
        self.chips.get(index)
    }

    pub fn chip_mut(&mut self, index: usize) -> Option<&mut PuzzleChip> {
        self.chips.get_mut(index)
    }

    /// Answer as declared.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Letters of all chips in order, whether revealed or not.
    pub fn plaintext(&self) -> String {
        self.chips.iter().map(|chip| chip.letter().to_string()).collect()
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn is_solved(&self) -> bool {
        self.feedback == Feedback::Correct
    }

    /// Record a checked guess and update hint availability.
    ///
    /// Incorrect offers the hint, Correct withdraws it, an empty guess
    /// leaves it alone.
    pub fn record_feedback(&mut self, feedback: Feedback) {
        self.feedback = feedback;
        match feedback {
            Feedback::Correct => self.hint_visible = false,
            Feedback::Incorrect => self.hint_visible = true,
            Feedback::None => {}
        }
    }

    /// Guess input changed: back to no feedback.
    pub fn clear_feedback(&mut self) {
        self.feedback = Feedback::None;
    }

    /// Indices of face-down chips in declaration order.
    pub fn hidden_indices(&self) -> Vec<usize> {
        self.chips
            .iter()
            .enumerate()
            .filter(|(_, chip)| chip.is_hidden())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            revealed: self.chips.iter().filter(|chip| chip.is_revealed()).count(),
            total: self.chips.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reliable() -> PuzzleState {
        PuzzleState::new(
            "transport",
            ["BAAAB", "AABAA", "ABABB", "ABAAA", "AAAAA", "AAAAB", "ABABB", "AABAA"],
            "RELIABLE",
        )
    }

    #[test]
    fn test_chips_decoded_eagerly() {
        let state = reliable();
        assert_eq!(state.plaintext(), "RELIABLE");
        assert_eq!(state.plaintext(), state.expected());
        assert_eq!(state.chip(0).unwrap().letter(), DecodedLetter::Letter('R'));
        assert!(state.chips().iter().all(|chip| !chip.is_revealed()));
    }

    #[test]
    fn test_flip_is_one_way_for_revealed() {
        let mut chip = PuzzleChip::new("ABBBA");
        assert_eq!(chip.flip(), ChipFace::Up);
        assert!(chip.is_revealed());

        assert_eq!(chip.flip(), ChipFace::Down);
        assert!(chip.is_hidden());
        assert!(chip.is_revealed());
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut chip = PuzzleChip::new("AABAA");
        assert!(chip.reveal());
        assert!(!chip.reveal());
        assert_eq!(chip.face(), ChipFace::Up);
        assert!(chip.is_revealed());
    }

    #[test]
    fn test_evaluate_guess() {
        assert_eq!(evaluate_guess("r e l i a b l e", "RELIABLE"), Feedback::Correct);
        assert_eq!(evaluate_guess("RELIABLE!", "RELIABLE"), Feedback::Correct);
        assert_eq!(evaluate_guess("reliable", "Reliable."), Feedback::Correct);
        assert_eq!(evaluate_guess("RELIABLY", "RELIABLE"), Feedback::Incorrect);
        assert_eq!(evaluate_guess("", "RELIABLE"), Feedback::None);
        assert_eq!(evaluate_guess(" ?! ", "RELIABLE"), Feedback::None);
    }

    #[test]
    fn test_record_feedback_drives_hint() {
        let mut state = reliable();
        assert!(!state.hint_visible());

        state.record_feedback(Feedback::Incorrect);
        assert!(state.hint_visible());

        state.record_feedback(Feedback::None);
        assert!(state.hint_visible());

        state.record_feedback(Feedback::Correct);
        assert!(!state.hint_visible());
        assert!(state.is_solved());
    }

    #[test]
    fn test_hidden_indices_and_progress() {
        let mut state = reliable();
        state.chip_mut(1).unwrap().reveal();
        state.chip_mut(3).unwrap().flip();
        state.chip_mut(3).unwrap().flip();

        assert_eq!(state.hidden_indices(), vec![0, 2, 3, 4, 5, 6, 7]);
        assert_eq!(state.progress(), Progress { revealed: 2, total: 8 });
        assert!(!state.progress().is_complete());
    }
}
