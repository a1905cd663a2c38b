//! Presentation surface the controller draws on.
//!
//! The controller never owns the page. It reads the chips a puzzle declares
//! and writes chip faces, letter slots, feedback and hint visibility through
//! the [`Surface`] trait. Every lookup can fail with a [`SurfaceError`] when
//! the page is missing a puzzle or one of its controls.
//!
//! [`MemorySurface`] is the in-process page used by the terminal front end
//! and by tests.

use std::fmt;

use crate::cipher::DecodedLetter;
use crate::deck::{Deck, PuzzleSpec};
use crate::error::SurfaceError;
use crate::preferences::Theme;
use crate::puzzle::{ChipFace, Feedback};

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

/// Controls a puzzle instance exposes besides its chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    ChipRow,
    RevealAll,
    GuessInput,
    CheckButton,
    HintButton,
    Feedback,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::ChipRow,
        Control::RevealAll,
        Control::GuessInput,
        Control::CheckButton,
        Control::HintButton,
        Control::Feedback,
    ];
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Control::ChipRow => "chip row",
            Control::RevealAll => "reveal-all button",
            Control::GuessInput => "guess input",
            Control::CheckButton => "check button",
            Control::HintButton => "hint button",
            Control::Feedback => "feedback region",
        };
        f.write_str(name)
    }
}

/// What currently holds keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    None,
    Chip { puzzle: String, index: usize },
    GuessInput { puzzle: String },
}

impl Focus {
    /// True while the user is typing into a text field.
    pub fn is_text_field(&self) -> bool {
        matches!(self, Focus::GuessInput { .. })
    }
}

/// The page as the controller sees it.
pub trait Surface {
    /// Encoded group attribute of every chip in the puzzle, in declaration order.
    fn chip_groups(&self, puzzle: &str) -> SurfaceResult<Vec<String>>;

    /// Fails with `MissingControl` if the puzzle lacks `control`.
    fn require_control(&self, puzzle: &str, control: Control) -> SurfaceResult<()>;

    /// Fill a chip's hidden letter slot.
    fn set_chip_letter(&mut self, puzzle: &str, index: usize, letter: DecodedLetter) -> SurfaceResult<()>;

    fn set_chip_face(&mut self, puzzle: &str, index: usize, face: ChipFace) -> SurfaceResult<()>;

    /// Current text of the puzzle's guess input.
    fn guess_value(&self, puzzle: &str) -> SurfaceResult<String>;

    fn set_feedback(&mut self, puzzle: &str, feedback: Feedback) -> SurfaceResult<()>;

    fn set_hint_visible(&mut self, puzzle: &str, visible: bool) -> SurfaceResult<()>;

    fn focus(&self) -> Focus;

    fn apply_theme(&mut self, theme: Theme);

    /// Environment asks for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;
}

/// Rendered state of one chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipView {
    pub group: String,
    /// Letter slot, empty until the controller fills it
    pub letter: Option<DecodedLetter>,
    pub face: ChipFace,
}

/// Rendered state of one puzzle instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleView {
    pub id: String,
    pub chips: Vec<ChipView>,
    pub controls: Vec<Control>,
    pub guess: String,
    pub feedback: Feedback,
    pub hint_visible: bool,
}

impl PuzzleView {
    /// A view with every control present and all chips face down.
    pub fn from_spec(spec: &PuzzleSpec) -> Self {
        Self {
            id: spec.id.clone(),
            chips: spec
                .groups
                .iter()
                .map(|group| ChipView {
                    group: group.clone(),
                    letter: None,
                    face: ChipFace::Down,
                })
                .collect(),
            controls: Control::ALL.to_vec(),
            guess: String::new(),
            feedback: Feedback::None,
            hint_visible: false,
        }
    }

    pub fn has_control(&self, control: Control) -> bool {
        self.controls.contains(&control)
    }
}

/// In-process page holding puzzle views, focus and theme.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    puzzles: Vec<PuzzleView>,
    focus: Focus,
    theme: Theme,
    reduced_motion: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with one fully-equipped puzzle per deck entry.
    pub fn from_deck(deck: &Deck) -> Self {
        let mut surface = Self::new();
        for spec in &deck.puzzles {
            surface.add_puzzle(spec);
        }
        surface
    }

    pub fn add_puzzle(&mut self, spec: &PuzzleSpec) {
        self.puzzles.push(PuzzleView::from_spec(spec));
    }

    pub fn view(&self, puzzle: &str) -> Option<&PuzzleView> {
        self.puzzles.iter().find(|view| view.id == puzzle)
    }

    pub fn view_mut(&mut self, puzzle: &str) -> Option<&mut PuzzleView> {
        self.puzzles.iter_mut().find(|view| view.id == puzzle)
    }

    /// Delete a control from a puzzle, as an author editing markup might.
    pub fn remove_control(&mut self, puzzle: &str, control: Control) {
        if let Some(view) = self.view_mut(puzzle) {
            view.controls.retain(|c| *c != control);
        }
    }

    /// Replace the text in a puzzle's guess input.
    pub fn set_guess(&mut self, puzzle: &str, text: &str) -> SurfaceResult<()> {
        let view = self.control_mut(puzzle, Control::GuessInput)?;
        view.guess = text.to_string();
        Ok(())
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    fn lookup(&self, puzzle: &str) -> SurfaceResult<&PuzzleView> {
        self.view(puzzle).ok_or_else(|| SurfaceError::UnknownPuzzle {
            puzzle: puzzle.to_string(),
        })
    }

    fn control(&self, puzzle: &str, control: Control) -> SurfaceResult<&PuzzleView> {
        let view = self.lookup(puzzle)?;
        if view.has_control(control) {
            Ok(view)
        } else {
            Err(SurfaceError::MissingControl {
                puzzle: puzzle.to_string(),
                control,
            })
        }
    }

    fn control_mut(&mut self, puzzle: &str, control: Control) -> SurfaceResult<&mut PuzzleView> {
        self.control(puzzle, control)?;
        // lookup succeeded above
        self.view_mut(puzzle).ok_or_else(|| SurfaceError::UnknownPuzzle {
            puzzle: puzzle.to_string(),
        })
    }

    fn chip_mut(&mut self, puzzle: &str, index: usize) -> SurfaceResult<&mut ChipView> {
        let view = self.control_mut(puzzle, Control::ChipRow)?;
        let len = view.chips.len();
        view.chips
            .get_mut(index)
            .ok_or_else(|| SurfaceError::ChipOutOfRange {
                puzzle: puzzle.to_string(),
                index,
                len,
            })
    }
}

impl Surface for MemorySurface {
    fn chip_groups(&self, puzzle: &str) -> SurfaceResult<Vec<String>> {
        let view = self.control(puzzle, Control::ChipRow)?;
        Ok(view.chips.iter().map(|chip| chip.group.clone()).collect())
    }

    fn require_control(&self, puzzle: &str, control: Control) -> SurfaceResult<()> {
        self.control(puzzle, control).map(|_| ())
    }

    fn set_chip_letter(&mut self, puzzle: &str, index: usize, letter: DecodedLetter) -> SurfaceResult<()> {
        self.chip_mut(puzzle, index)?.letter = Some(letter);
        Ok(())
    }

    fn set_chip_face(&mut self, puzzle: &str, index: usize, face: ChipFace) -> SurfaceResult<()> {
        self.chip_mut(puzzle, index)?.face = face;
        Ok(())
    }

    fn guess_value(&self, puzzle: &str) -> SurfaceResult<String> {
        Ok(self.control(puzzle, Control::GuessInput)?.guess.clone())
    }

    fn set_feedback(&mut self, puzzle: &str, feedback: Feedback) -> SurfaceResult<()> {
        self.control_mut(puzzle, Control::Feedback)?.feedback = feedback;
        Ok(())
    }

    fn set_hint_visible(&mut self, puzzle: &str, visible: bool) -> SurfaceResult<()> {
        self.control_mut(puzzle, Control::HintButton)?.hint_visible = visible;
        Ok(())
    }

    fn focus(&self) -> Focus {
        self.focus.clone()
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> MemorySurface {
        MemorySurface::from_deck(&Deck::builtin())
    }

    #[test]
    fn test_chip_groups_in_order() {
        let surface = surface();
        let groups = surface.chip_groups("session").unwrap();
        assert_eq!(groups.len(), 7);
        assert_eq!(groups[0], "BAABA");
        assert_eq!(groups[6], "ABBAB");
    }

    #[test]
    fn test_unknown_puzzle() {
        let surface = surface();
        assert_eq!(
            surface.chip_groups("physical"),
            Err(SurfaceError::UnknownPuzzle {
                puzzle: "physical".to_string()
            })
        );
    }

    #[test]
    fn test_missing_control() {
        let mut surface = surface();
        surface.remove_control("transport", Control::HintButton);

        assert!(surface.require_control("transport", Control::CheckButton).is_ok());
        assert_eq!(
            surface.set_hint_visible("transport", true),
            Err(SurfaceError::MissingControl {
                puzzle: "transport".to_string(),
                control: Control::HintButton,
            })
        );
    }

    #[test]
    fn test_chip_out_of_range() {
        let mut surface = surface();
        let err = surface.set_chip_face("session", 7, ChipFace::Up).unwrap_err();
        assert_eq!(
            err,
            SurfaceError::ChipOutOfRange {
                puzzle: "session".to_string(),
                index: 7,
                len: 7,
            }
        );
    }

    #[test]
    fn test_focus_text_field() {
        let mut surface = surface();
        assert!(!surface.focus().is_text_field());

        surface.set_focus(Focus::Chip {
            puzzle: "session".to_string(),
            index: 0,
        });
        assert!(!surface.focus().is_text_field());

        surface.set_focus(Focus::GuessInput {
            puzzle: "session".to_string(),
        });
        assert!(surface.focus().is_text_field());
    }

    #[test]
    fn test_guess_roundtrip() {
        let mut surface = surface();
        surface.set_guess("transport", "reliable?").unwrap();
        assert_eq!(surface.guess_value("transport").unwrap(), "reliable?");
    }
}
