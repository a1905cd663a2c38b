//! Interactive session: one puzzle page at a time, driven by typed commands.
//!
//! A page is loaded per puzzle, the way each layer lesson is its own page.
//! Loading reads the stored theme; leaving hands the preferences on to the
//! next page and folds the page's counters into the session totals.

use std::time::{Duration, Instant};

use osi_puzzle_core::events::{Target, UiEvent};
use osi_puzzle_core::metrics::Metrics;
use osi_puzzle_core::preferences::Preferences;
use osi_puzzle_core::selftest;
use osi_puzzle_core::surface::{Focus, MemorySurface, Surface};
use osi_puzzle_core::{Deck, PuzzleController, PuzzleSpec};

use crate::config::Config;
use crate::term::{print_help, render_chips, render_page, Command, FocusTarget};

/// What the main loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Open(String),
    Quit,
}

pub struct Session {
    deck: Deck,
    spec: PuzzleSpec,
    page: PuzzleController<MemorySurface>,
    loaded_at: Instant,
    reduced_motion: bool,
    stagger: Duration,
    totals: Metrics,
}

impl Session {
    /// Load the first page.
    pub fn start(config: &Config, deck: Deck, spec: PuzzleSpec, mut prefs: Preferences) -> Self {
        if prefs.take_keyboard_hint() {
            println!("Tip: `key d` toggles the theme and `key r` reveals every chip.");
            println!();
        }

        let page = load_page(&spec, prefs, config.reduced_motion, config.stagger);

        Self {
            deck,
            spec,
            page,
            loaded_at: Instant::now(),
            reduced_motion: config.reduced_motion,
            stagger: config.stagger,
            totals: Metrics::new(),
        }
    }

    /// Leave this page and load `id`. The caller checks `id` exists.
    pub fn open(self, id: &str) -> Self {
        let Session {
            deck,
            spec,
            page,
            reduced_motion,
            stagger,
            mut totals,
            ..
        } = self;

        let (_, prefs, metrics) = page.into_parts();
        totals.merge(&metrics);

        let spec = deck.get(id).cloned().unwrap_or(spec);
        let page = load_page(&spec, prefs, reduced_motion, stagger);

        Self {
            deck,
            spec,
            page,
            loaded_at: Instant::now(),
            reduced_motion,
            stagger,
            totals,
        }
    }

    pub fn has_puzzle(&self, id: &str) -> bool {
        self.deck.get(id).is_some()
    }

    /// Apply one command, then let any scheduled reveals play out.
    pub fn handle(&mut self, command: Command) -> Flow {
        // Catch the page clock up first so new reveals are scheduled from now
        self.page.advance_to(self.loaded_at.elapsed());
        let puzzle = self.spec.id.clone();

        match command {
            Command::Click(number) => {
                if number > self.spec.groups.len() {
                    println!("There is no chip {}.", number);
                    return Flow::Continue;
                }
                self.page.dispatch(UiEvent::click(Target::Chip {
                    puzzle,
                    index: number - 1,
                }));
            }
            Command::Focus(FocusTarget::Chip(number)) => {
                self.page.surface_mut().set_focus(Focus::Chip {
                    puzzle,
                    index: number - 1,
                });
            }
            Command::Focus(FocusTarget::Guess) => {
                self.page.surface_mut().set_focus(Focus::GuessInput { puzzle });
            }
            Command::Blur => self.page.surface_mut().set_focus(Focus::None),
            Command::Type(text) => {
                self.page.surface_mut().set_focus(Focus::GuessInput {
                    puzzle: puzzle.clone(),
                });
                if let Err(err) = self.page.surface_mut().set_guess(&puzzle, &text) {
                    tracing::warn!("type: {}", err);
                    return Flow::Continue;
                }
                self.page.dispatch(UiEvent::input(Target::GuessInput { puzzle }));
            }
            Command::Press(key) => {
                let target = self.focused_target();
                self.page.dispatch(UiEvent::key(target, key));
            }
            Command::Check => {
                self.page.dispatch(UiEvent::click(Target::CheckButton { puzzle }));
            }
            Command::Hint => {
                let offered = self
                    .page
                    .surface()
                    .view(&puzzle)
                    .is_some_and(|view| view.hint_visible);
                if !offered {
                    println!("The hint appears after a wrong guess.");
                    return Flow::Continue;
                }
                self.page.dispatch(UiEvent::click(Target::HintButton { puzzle }));
            }
            Command::Reveal => {
                self.page.dispatch(UiEvent::click(Target::RevealAll { puzzle }));
            }
            Command::Open(id) => return Flow::Open(id),
            Command::List => {
                for spec in &self.deck.puzzles {
                    let marker = if spec.id == self.spec.id { "*" } else { " " };
                    println!("{} {:<12} layer {}  {}", marker, spec.id, spec.layer, spec.title);
                }
                return Flow::Continue;
            }
            Command::Stats => {
                self.totals().print_summary();
                return Flow::Continue;
            }
            Command::SelfTest => {
                println!("{}", selftest::run());
                return Flow::Continue;
            }
            Command::Help => {
                print_help();
                return Flow::Continue;
            }
            Command::Quit => return Flow::Quit,
        }

        self.pump();
        self.render();
        Flow::Continue
    }

    /// Event target for a key press: the focused element, else the document.
    fn focused_target(&self) -> Target {
        match self.page.surface().focus() {
            Focus::Chip { puzzle, index } => Target::Chip { puzzle, index },
            Focus::GuessInput { puzzle } => Target::GuessInput { puzzle },
            Focus::None => Target::Document,
        }
    }

    /// Fire scheduled reveals as their time arrives, redrawing the chip row
    /// after each one. Blocks until nothing is pending.
    fn pump(&mut self) {
        loop {
            let fired = self.page.advance_to(self.loaded_at.elapsed());
            if fired > 0 && self.page.pending_reveals() > 0 {
                if let Some(view) = self.page.surface().view(&self.spec.id) {
                    print!("{}", render_chips(view));
                }
            }

            match self.page.next_reveal_due() {
                Some(due) => std::thread::sleep(due.saturating_sub(self.loaded_at.elapsed())),
                None => break,
            }
        }
    }

    pub fn render(&self) {
        match self.page.surface().view(&self.spec.id) {
            Some(view) => println!(
                "{}",
                render_page(
                    &self.spec,
                    view,
                    self.page.theme(),
                    self.page.progress(&self.spec.id),
                )
            ),
            None => tracing::warn!(puzzle = %self.spec.id, "page has no view to render"),
        }
    }

    /// Session totals including the current page.
    pub fn totals(&self) -> Metrics {
        let mut totals = self.totals.clone();
        totals.merge(self.page.metrics());
        totals
    }

    /// Close the session and return its final counters.
    pub fn finish(self) -> Metrics {
        let mut totals = self.totals;
        let (_, _, metrics) = self.page.into_parts();
        totals.merge(&metrics);
        totals.complete();
        totals
    }
}

/// Build the page for one puzzle and bind it.
fn load_page(
    spec: &PuzzleSpec,
    prefs: Preferences,
    reduced_motion: bool,
    stagger: Duration,
) -> PuzzleController<MemorySurface> {
    let mut surface = MemorySurface::new();
    surface.add_puzzle(spec);
    surface.set_reduced_motion(reduced_motion);

    let mut page = PuzzleController::new(surface, prefs).with_stagger(stagger);
    page.initialize(&spec.id, &spec.answer);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use osi_puzzle_core::events::Key;
    use osi_puzzle_core::puzzle::Feedback;

    fn config(reduced_motion: bool, stagger: Duration) -> Config {
        Config {
            deck_file: None,
            start_puzzle: None,
            practice_seed: None,
            prefs_file: None,
            reduced_motion,
            stagger,
            self_test: false,
            print_config: false,
            print_metrics: false,
            metrics_file: None,
        }
    }

    fn session_with(config: &Config) -> Session {
        let deck = Deck::builtin();
        let spec = deck.puzzles[0].clone();
        Session::start(config, deck, spec, Preferences::ephemeral())
    }

    fn session() -> Session {
        session_with(&config(true, Duration::ZERO))
    }

    fn feedback(session: &Session) -> Feedback {
        session.page.surface().view(&session.spec.id).unwrap().feedback
    }

    #[test]
    fn test_type_and_enter_checks_guess() {
        let mut session = session();
        session.handle(Command::Type("reliable".to_string()));
        session.handle(Command::Press(Key::Enter));
        assert_eq!(feedback(&session), Feedback::Correct);
    }

    #[test]
    fn test_reveal_plays_out() {
        let mut session = session();
        session.handle(Command::Reveal);
        assert!(session.page.progress("transport").unwrap().is_complete());
    }

    #[test]
    fn test_reveal_after_idle_keeps_stagger() {
        let stagger = Duration::from_millis(40);
        let mut session = session_with(&config(false, stagger));
        session.handle(Command::Blur);
        std::thread::sleep(Duration::from_millis(300));

        let started = Instant::now();
        session.handle(Command::Reveal);
        let took = started.elapsed();

        // RELIABLE: eight chips, the first fires at once
        assert!(session.page.progress("transport").unwrap().is_complete());
        assert!(took >= stagger * 7, "reveal-all took {:?}", took);
    }

    #[test]
    fn test_theme_key_only_outside_input() {
        let mut session = session();
        session.handle(Command::Type("d".to_string()));
        session.handle(Command::Press(Key::Char('d')));
        assert_eq!(session.totals().theme_toggles, 0);

        session.handle(Command::Blur);
        session.handle(Command::Press(Key::Char('d')));
        assert_eq!(session.totals().theme_toggles, 1);
    }

    #[test]
    fn test_open_carries_theme_and_totals() {
        let mut session = session();
        session.handle(Command::Press(Key::Char('d')));
        session.handle(Command::Click(1));

        assert!(session.has_puzzle("session"));
        let session = session.open("session");
        assert_eq!(session.spec.id, "session");
        assert_eq!(session.page.theme().as_str(), "dark");

        let totals = session.finish();
        assert_eq!(totals.chip_flips, 1);
        assert_eq!(totals.theme_toggles, 1);
    }

    #[test]
    fn test_hint_withheld_until_wrong_guess() {
        let mut session = session();
        session.handle(Command::Hint);
        assert_eq!(session.totals().hints_used, 0);

        session.handle(Command::Type("wrong".to_string()));
        session.handle(Command::Check);
        session.handle(Command::Hint);
        assert_eq!(session.totals().hints_used, 1);
    }
}
