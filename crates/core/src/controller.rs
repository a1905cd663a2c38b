//! Puzzle controller: binds puzzle state to a presentation surface.
//!
//! The controller reads the chips a puzzle declares on the [`Surface`],
//! decodes every group up front, and registers listeners so that user events
//! become state changes. It owns the per-puzzle [`PuzzleState`], the page's
//! listener registry and the timeline used for staggered reveals.
//!
//! # Failure semantics
//!
//! Nothing here returns an error. An operation aimed at a puzzle, control or
//! chip the surface does not have logs a warning, bumps
//! `operations_skipped` and does nothing else.
//!
//! # Time
//!
//! `reveal_all_chips` schedules reveals and returns at once. They fire when
//! the owner advances the clock with [`PuzzleController::advance_to`]. Under
//! reduced motion every delay is zero, so the next advance fires the lot.

use std::time::Duration;

use crate::cipher::normalize_plaintext;
use crate::error::SurfaceError;
use crate::events::{Action, Dispatcher, Listener, Target, Trigger, UiEvent};
use crate::metrics::Metrics;
use crate::preferences::{Preferences, Theme};
use crate::puzzle::{evaluate_guess, ChipFace, Feedback, Progress, PuzzleState};
use crate::scheduler::Timeline;
use crate::surface::{Control, Surface};

/// Delay between successive reveals in a reveal-all batch.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(120);

/// A reveal waiting on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RevealTask {
    puzzle: String,
    index: usize,
}

/// Puzzle logic for one page.
pub struct PuzzleController<S: Surface> {
    surface: S,
    prefs: Preferences,
    theme: Theme,
    puzzles: Vec<PuzzleState>,
    dispatcher: Dispatcher,
    timeline: Timeline<RevealTask>,
    stagger: Duration,
    current: Option<String>,
    metrics: Metrics,
}

impl<S: Surface> PuzzleController<S> {
    /// Load the page: read the stored theme once, apply it, and register the
    /// site-wide theme shortcut.
    pub fn new(mut surface: S, prefs: Preferences) -> Self {
        let theme = prefs.load_theme();
        surface.apply_theme(theme);

        let mut dispatcher = Dispatcher::new();
        dispatcher.listen(Listener::shortcut('d', Action::ToggleTheme));

        Self {
            surface,
            prefs,
            theme,
            puzzles: Vec::new(),
            dispatcher,
            timeline: Timeline::new(),
            stagger: DEFAULT_STAGGER,
            current: None,
            metrics: Metrics::new(),
        }
    }

    /// Use `stagger` between reveal-all steps instead of the default.
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Bind the named puzzle: decode its chips, fill their letter slots and
    /// register its listeners.
    ///
    /// Call once per puzzle. A second call rebuilds the state but also
    /// registers every listener again, so each event then fires twice.
    pub fn initialize(&mut self, puzzle: &str, expected: &str) {
        let groups = match self.surface.chip_groups(puzzle) {
            Ok(groups) => groups,
            Err(err) => return self.skip("initialize", err),
        };

        let state = PuzzleState::new(puzzle, &groups, expected);
        for (index, chip) in state.chips().iter().enumerate() {
            if let Err(err) = self.surface.set_chip_letter(puzzle, index, chip.letter()) {
                tracing::warn!("initialize: {}", err);
            }
            if chip.letter().is_unknown() {
                tracing::warn!(puzzle, index, group = chip.group(), "chip group does not decode");
            }
        }

        if state.plaintext() != normalize_plaintext(state.expected()) {
            tracing::warn!(
                puzzle,
                decoded = %state.plaintext(),
                expected = state.expected(),
                "chips do not spell the expected answer"
            );
        }

        self.register_listeners(puzzle, expected, groups.len());

        // Fresh attempt: no feedback, hint withheld
        if let Err(err) = self.surface.set_feedback(puzzle, Feedback::None) {
            self.skip("initialize", err);
        }
        if let Err(err) = self.surface.set_hint_visible(puzzle, false) {
            self.skip("initialize", err);
        }

        match self.puzzles.iter_mut().find(|p| p.id() == puzzle) {
            Some(existing) => {
                tracing::debug!(puzzle, "puzzle initialized again");
                *existing = state;
            }
            None => self.puzzles.push(state),
        }
        self.current = Some(puzzle.to_string());

        tracing::debug!(puzzle, chips = groups.len(), "puzzle initialized");
    }

    fn register_listeners(&mut self, puzzle: &str, expected: &str, chips: usize) {
        let name = || puzzle.to_string();

        for index in 0..chips {
            let target = Target::Chip {
                puzzle: name(),
                index,
            };
            let action = Action::ToggleChip {
                puzzle: name(),
                index,
            };
            self.dispatcher
                .listen(Listener::new(target.clone(), Trigger::Click, action.clone()));
            self.dispatcher
                .listen(Listener::new(target, Trigger::Activate, action));
        }

        if self.has_control(puzzle, Control::RevealAll) {
            self.dispatcher.listen(Listener::new(
                Target::RevealAll { puzzle: name() },
                Trigger::Click,
                Action::RevealAll { puzzle: name() },
            ));
        }

        let check = Action::CheckGuess {
            puzzle: name(),
            expected: expected.to_string(),
        };

        if self.has_control(puzzle, Control::GuessInput) {
            self.dispatcher.listen(Listener::new(
                Target::GuessInput { puzzle: name() },
                Trigger::Input,
                Action::ClearFeedback { puzzle: name() },
            ));
            self.dispatcher.listen(Listener::new(
                Target::GuessInput { puzzle: name() },
                Trigger::Enter,
                check.clone(),
            ));
        }

        if self.has_control(puzzle, Control::CheckButton) {
            self.dispatcher.listen(Listener::new(
                Target::CheckButton { puzzle: name() },
                Trigger::Click,
                check,
            ));
        }

        if self.has_control(puzzle, Control::HintButton) {
            self.dispatcher.listen(Listener::new(
                Target::HintButton { puzzle: name() },
                Trigger::Click,
                Action::ShowHint { puzzle: name() },
            ));
        }

        self.dispatcher
            .listen(Listener::shortcut('r', Action::RevealAll { puzzle: name() }));
    }

    fn has_control(&self, puzzle: &str, control: Control) -> bool {
        match self.surface.require_control(puzzle, control) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("initialize: {}", err);
                false
            }
        }
    }

    /// Flip one chip. Turning it face up marks it revealed for good; turning
    /// it back down only changes what is shown.
    pub fn toggle_chip(&mut self, puzzle: &str, index: usize) {
        let face = match self.chip_state(puzzle, index) {
            Ok(state) => state.chip_mut(index).map(|chip| chip.flip()),
            Err(err) => return self.skip("toggle_chip", err),
        };
        let Some(face) = face else { return };

        self.metrics.chip_flips += 1;
        if face == ChipFace::Up {
            self.metrics.chips_revealed += 1;
        }
        if let Err(err) = self.surface.set_chip_face(puzzle, index, face) {
            tracing::warn!("toggle_chip: {}", err);
        }

        tracing::debug!(puzzle, index, ?face, "chip flipped");
    }

    /// Schedule a reveal for every face-down chip, `stagger` apart in
    /// declaration order. Returns immediately.
    pub fn reveal_all_chips(&mut self, puzzle: &str) {
        let hidden = match self.state(puzzle) {
            Ok(state) => state.hidden_indices(),
            Err(err) => return self.skip("reveal_all_chips", err),
        };

        let stagger = if self.surface.prefers_reduced_motion() {
            Duration::ZERO
        } else {
            self.stagger
        };

        for (position, &index) in hidden.iter().enumerate() {
            self.timeline.schedule_after(
                stagger * position as u32,
                RevealTask {
                    puzzle: puzzle.to_string(),
                    index,
                },
            );
        }

        self.metrics.reveal_all_batches += 1;
        self.metrics.reveals_scheduled += hidden.len() as u64;

        tracing::debug!(puzzle, scheduled = hidden.len(), ?stagger, "reveal-all scheduled");
    }

    /// Compare the live guess with `expected` and update feedback.
    ///
    /// An empty normalized guess clears feedback instead of counting as wrong.
    pub fn check_guess(&mut self, puzzle: &str, expected: &str) -> Feedback {
        let guess = match self.surface.guess_value(puzzle) {
            Ok(guess) => guess,
            Err(err) => {
                self.skip("check_guess", err);
                return Feedback::None;
            }
        };

        let feedback = evaluate_guess(&guess, expected);
        let hint_visible = match self.state_mut(puzzle) {
            Ok(state) => {
                state.record_feedback(feedback);
                state.hint_visible()
            }
            Err(err) => {
                self.skip("check_guess", err);
                return Feedback::None;
            }
        };

        match feedback {
            Feedback::None => self.metrics.guesses_empty += 1,
            Feedback::Correct => {
                self.metrics.guesses_checked += 1;
                self.metrics.guesses_correct += 1;
            }
            Feedback::Incorrect => {
                self.metrics.guesses_checked += 1;
                self.metrics.guesses_incorrect += 1;
            }
        }

        if let Err(err) = self.surface.set_feedback(puzzle, feedback) {
            tracing::warn!("check_guess: {}", err);
        }
        if let Err(err) = self.surface.set_hint_visible(puzzle, hint_visible) {
            tracing::warn!("check_guess: {}", err);
        }

        tracing::debug!(puzzle, ?feedback, "guess checked");
        feedback
    }

    /// The guess was edited: drop any feedback.
    pub fn clear_feedback(&mut self, puzzle: &str) {
        match self.state_mut(puzzle) {
            Ok(state) => state.clear_feedback(),
            Err(err) => return self.skip("clear_feedback", err),
        }
        if let Err(err) = self.surface.set_feedback(puzzle, Feedback::None) {
            tracing::warn!("clear_feedback: {}", err);
        }
    }

    /// Reveal the first chip in declaration order if it is face down.
    pub fn show_hint(&mut self, puzzle: &str) {
        let first_hidden = match self.state(puzzle) {
            Ok(state) => state.chip(0).is_some_and(|chip| chip.is_hidden()),
            Err(err) => return self.skip("show_hint", err),
        };

        if !first_hidden {
            tracing::debug!(puzzle, "hint: first chip already showing");
            return;
        }

        self.reveal_chip(puzzle, 0);
        self.metrics.hints_used += 1;
    }

    /// Switch light/dark, apply it and persist it.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.surface.apply_theme(self.theme);
        self.prefs.save_theme(self.theme);
        self.metrics.theme_toggles += 1;

        tracing::debug!(theme = %self.theme, "theme toggled");
    }

    /// Route a user event through the registered listeners and apply the
    /// resulting actions in order. Returns how many actions ran.
    pub fn dispatch(&mut self, event: UiEvent) -> usize {
        let typing = self.surface.focus().is_text_field();
        let actions = self.dispatcher.dispatch(&event, typing);
        let count = actions.len();

        for action in actions {
            self.apply(action);
        }

        count
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::ToggleChip { puzzle, index } => self.toggle_chip(&puzzle, index),
            Action::RevealAll { puzzle } => self.reveal_all_chips(&puzzle),
            Action::CheckGuess { puzzle, expected } => {
                self.check_guess(&puzzle, &expected);
            }
            Action::ClearFeedback { puzzle } => self.clear_feedback(&puzzle),
            Action::ShowHint { puzzle } => self.show_hint(&puzzle),
            Action::ToggleTheme => self.toggle_theme(),
        }
    }

    /// Move the page clock to `now` and fire every reveal that has come due.
    /// Returns how many fired.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        self.timeline.set_now(now);

        let mut fired = 0;
        while let Some(task) = self.timeline.pop_due() {
            self.reveal_chip(&task.puzzle, task.index);
            fired += 1;
        }
        fired
    }

    pub fn advance_by(&mut self, delta: Duration) -> usize {
        let now = self.timeline.now() + delta;
        self.advance_to(now)
    }

    /// When the next scheduled reveal is due, if any.
    pub fn next_reveal_due(&self) -> Option<Duration> {
        self.timeline.next_due()
    }

    pub fn pending_reveals(&self) -> usize {
        self.timeline.pending_count()
    }

    /// Turn a chip face up through a programmatic path (reveal-all, hint).
    /// A chip that is already up stays up.
    fn reveal_chip(&mut self, puzzle: &str, index: usize) {
        let changed = match self.chip_state(puzzle, index) {
            Ok(state) => state.chip_mut(index).is_some_and(|chip| chip.reveal()),
            Err(err) => return self.skip("reveal_chip", err),
        };

        if !changed {
            return;
        }

        self.metrics.chips_revealed += 1;
        if let Err(err) = self.surface.set_chip_face(puzzle, index, ChipFace::Up) {
            tracing::warn!("reveal_chip: {}", err);
        }
    }

    fn state(&self, puzzle: &str) -> Result<&PuzzleState, SurfaceError> {
        self.puzzles
            .iter()
            .find(|p| p.id() == puzzle)
            .ok_or_else(|| SurfaceError::NotInitialized {
                puzzle: puzzle.to_string(),
            })
    }

    fn state_mut(&mut self, puzzle: &str) -> Result<&mut PuzzleState, SurfaceError> {
        self.puzzles
            .iter_mut()
            .find(|p| p.id() == puzzle)
            .ok_or_else(|| SurfaceError::NotInitialized {
                puzzle: puzzle.to_string(),
            })
    }

    /// Puzzle state, checked to contain chip `index`.
    fn chip_state(&mut self, puzzle: &str, index: usize) -> Result<&mut PuzzleState, SurfaceError> {
        let state = self.state_mut(puzzle)?;
        let len = state.chips().len();
        if index >= len {
            return Err(SurfaceError::ChipOutOfRange {
                puzzle: puzzle.to_string(),
                index,
                len,
            });
        }
        Ok(state)
    }

    fn skip(&mut self, operation: &str, err: SurfaceError) {
        self.metrics.operations_skipped += 1;
        tracing::warn!("{}: {}; ignoring", operation, err);
    }

    pub fn puzzle(&self, puzzle: &str) -> Option<&PuzzleState> {
        self.state(puzzle).ok()
    }

    pub fn progress(&self, puzzle: &str) -> Option<Progress> {
        self.puzzle(puzzle).map(PuzzleState::progress)
    }

    /// Most recently initialized puzzle.
    pub fn current_puzzle(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn listener_count(&self) -> usize {
        self.dispatcher.len()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// True the first time a page asks on this preference store.
    pub fn take_keyboard_hint(&mut self) -> bool {
        self.prefs.take_keyboard_hint()
    }

    /// Leave the page, handing back the preferences and final metrics.
    pub fn into_parts(mut self) -> (S, Preferences, Metrics) {
        self.metrics.complete();
        (self.surface, self.prefs, self.metrics)
    }
}
