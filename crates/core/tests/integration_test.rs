//! Integration tests for a full puzzle page.
//!
//! These drive the controller the way the front end does: build a page from
//! a deck, initialize one puzzle, then feed user events and advance the
//! clock, checking what the page shows afterwards.

use std::time::Duration;

use osi_puzzle_core::{
    deck::Deck,
    events::{Key, Target, UiEvent},
    preferences::{FileStore, Preferences, Theme},
    puzzle::{ChipFace, Feedback},
    surface::{Focus, MemorySurface},
    PuzzleController,
};

const TRANSPORT: &str = "transport";

fn page() -> PuzzleController<MemorySurface> {
    let deck = Deck::builtin();
    let spec = deck.require(TRANSPORT).expect("builtin deck has transport");
    let surface = MemorySurface::from_deck(&deck);

    let mut controller = PuzzleController::new(surface, Preferences::ephemeral())
        .with_stagger(Duration::from_millis(50));
    controller.initialize(&spec.id, &spec.answer);
    controller
}

fn target_input() -> Target {
    Target::GuessInput {
        puzzle: TRANSPORT.to_string(),
    }
}

fn type_guess(controller: &mut PuzzleController<MemorySurface>, text: &str) {
    controller
        .surface_mut()
        .set_guess(TRANSPORT, text)
        .expect("transport has a guess input");
    controller.dispatch(UiEvent::input(target_input()));
}

/// Learner guesses wrong, takes the hint, reveals everything, then solves.
#[test]
fn test_full_attempt() {
    let mut page = page();

    // Step 1: wrong guess offers the hint
    type_guess(&mut page, "unreliable");
    page.dispatch(UiEvent::click(Target::CheckButton {
        puzzle: TRANSPORT.to_string(),
    }));
    let view = page.surface().view(TRANSPORT).unwrap();
    assert_eq!(view.feedback, Feedback::Incorrect);
    assert!(view.hint_visible);

    // Step 2: hint shows the first letter only
    page.dispatch(UiEvent::click(Target::HintButton {
        puzzle: TRANSPORT.to_string(),
    }));
    let view = page.surface().view(TRANSPORT).unwrap();
    assert_eq!(view.chips[0].face, ChipFace::Up);
    assert_eq!(view.chips[0].letter.unwrap().to_string(), "R");
    assert_eq!(view.chips[1].face, ChipFace::Down);

    // Step 3: editing clears the feedback
    type_guess(&mut page, "r e l");
    assert_eq!(page.surface().view(TRANSPORT).unwrap().feedback, Feedback::None);

    // Step 4: reveal all, staggered
    page.dispatch(UiEvent::click(Target::RevealAll {
        puzzle: TRANSPORT.to_string(),
    }));
    assert_eq!(page.pending_reveals(), 7);
    page.advance_by(Duration::from_millis(120));
    assert_eq!(page.progress(TRANSPORT).unwrap().revealed, 4);
    page.advance_by(Duration::from_secs(1));
    assert!(page.progress(TRANSPORT).unwrap().is_complete());

    // Step 5: enter in the input submits
    type_guess(&mut page, "r e l i a b l e");
    page.dispatch(UiEvent::key(target_input(), Key::Enter));
    let view = page.surface().view(TRANSPORT).unwrap();
    assert_eq!(view.feedback, Feedback::Correct);
    assert!(!view.hint_visible);
    assert!(page.puzzle(TRANSPORT).unwrap().is_solved());

    let metrics = page.metrics();
    assert_eq!(metrics.guesses_incorrect, 1);
    assert_eq!(metrics.guesses_correct, 1);
    assert_eq!(metrics.hints_used, 1);
    assert_eq!(metrics.chips_revealed, 8);
}

/// The 'r' shortcut reveals the current puzzle unless the user is typing.
#[test]
fn test_reveal_shortcut() {
    let mut page = page();
    page.surface_mut().set_reduced_motion(true);

    page.surface_mut().set_focus(Focus::GuessInput {
        puzzle: TRANSPORT.to_string(),
    });
    page.dispatch(UiEvent::key(target_input(), Key::Char('r')));
    assert_eq!(page.pending_reveals(), 0);

    page.surface_mut().set_focus(Focus::None);
    page.dispatch(UiEvent::key(Target::Document, Key::Char('R')));
    assert_eq!(page.advance_to(Duration::ZERO), 8);
    assert!(page.progress(TRANSPORT).unwrap().is_complete());
}

/// Guessing matches regardless of case, spacing and punctuation.
#[test]
fn test_guess_normalization() {
    for guess in ["RELIABLE!", "r e l i a b l e", "Reliable.", "\treliable\n"] {
        let mut page = page();
        type_guess(&mut page, guess);
        assert_eq!(page.check_guess(TRANSPORT, "RELIABLE"), Feedback::Correct, "{:?}", guess);
    }
}

/// Theme survives a page reload through the preference file.
#[test]
fn test_theme_persists_across_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let deck = Deck::builtin();

    let store = FileStore::open(&path).unwrap();
    let mut first = PuzzleController::new(
        MemorySurface::from_deck(&deck),
        Preferences::new(Box::new(store)),
    );
    assert!(first.take_keyboard_hint());
    first.dispatch(UiEvent::key(Target::Document, Key::Char('d')));
    assert_eq!(first.theme(), Theme::Dark);
    drop(first);

    let store = FileStore::open(&path).unwrap();
    let mut second = PuzzleController::new(
        MemorySurface::from_deck(&deck),
        Preferences::new(Box::new(store)),
    );
    assert_eq!(second.theme(), Theme::Dark);
    assert_eq!(second.surface().theme(), Theme::Dark);
    assert!(!second.take_keyboard_hint());
}

/// A page with a puzzle the author forgot to declare keeps working.
#[test]
fn test_operations_on_missing_puzzle_are_noops() {
    let mut page = page();

    page.toggle_chip("network", 0);
    page.reveal_all_chips("network");
    page.show_hint("network");
    assert_eq!(page.check_guess("network", "PACKET"), Feedback::None);

    assert_eq!(page.pending_reveals(), 0);
    assert_eq!(page.metrics().operations_skipped, 4);
    assert_eq!(page.progress(TRANSPORT).unwrap().revealed, 0);
}
