//! Session counters for the puzzle page.
//!
//! Tracks what the learner did: chip flips, reveals, hints, guesses and theme
//! toggles, plus operations the controller skipped because their target was
//! missing. The controller updates these as it applies actions; the front
//! end prints them at exit.
//!
//! # Thread Safety
//!
//! Not thread-safe. The page is single-threaded and owns its `Metrics`.

use std::time::{Duration, Instant};

/// Counters for one page session.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the session started
    pub start_time: Instant,

    /// When the session ended (set on completion)
    pub end_time: Option<Instant>,

    // === Chips ===
    /// User flips (click or keyboard), either direction
    pub chip_flips: u64,

    /// Chips turned face up by any path
    pub chips_revealed: u64,

    /// Reveal-all requests
    pub reveal_all_batches: u64,

    /// Reveals scheduled by reveal-all
    pub reveals_scheduled: u64,

    /// Hints that revealed a chip
    pub hints_used: u64,

    // === Guesses ===
    /// Guess checks with a non-empty guess
    pub guesses_checked: u64,

    /// Guesses that matched
    pub guesses_correct: u64,

    /// Guesses that did not match
    pub guesses_incorrect: u64,

    /// Checks with an empty normalized guess
    pub guesses_empty: u64,

    // === Page ===
    /// Theme toggles
    pub theme_toggles: u64,

    /// Operations dropped because a target was missing
    pub operations_skipped: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            chip_flips: 0,
            chips_revealed: 0,
            reveal_all_batches: 0,
            reveals_scheduled: 0,
            hints_used: 0,
            guesses_checked: 0,
            guesses_correct: 0,
            guesses_incorrect: 0,
            guesses_empty: 0,
            theme_toggles: 0,
            operations_skipped: 0,
        }
    }

    /// Mark the session as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Fraction of checked guesses that were correct.
    pub fn accuracy(&self) -> f64 {
        if self.guesses_checked == 0 {
            0.0
        } else {
            self.guesses_correct as f64 / self.guesses_checked as f64
        }
    }

    /// Fold another page's counters into these, keeping our start time.
    pub fn merge(&mut self, other: &Metrics) {
        self.chip_flips += other.chip_flips;
        self.chips_revealed += other.chips_revealed;
        self.reveal_all_batches += other.reveal_all_batches;
        self.reveals_scheduled += other.reveals_scheduled;
        self.hints_used += other.hints_used;
        self.guesses_checked += other.guesses_checked;
        self.guesses_correct += other.guesses_correct;
        self.guesses_incorrect += other.guesses_incorrect;
        self.guesses_empty += other.guesses_empty;
        self.theme_toggles += other.theme_toggles;
        self.operations_skipped += other.operations_skipped;
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Session Summary ===");
        println!("Duration: {} s", self.duration().as_secs());
        println!();

        println!("=== Chips ===");
        println!("Flips: {}", self.chip_flips);
        println!("Revealed: {}", self.chips_revealed);
        println!("Reveal-all: {} ({} scheduled)", self.reveal_all_batches, self.reveals_scheduled);
        println!("Hints: {}", self.hints_used);
        println!();

        println!("=== Guesses ===");
        println!("Checked: {}", self.guesses_checked);
        println!("Correct: {} ({:.0}%)", self.guesses_correct, self.accuracy() * 100.0);
        println!("Incorrect: {}", self.guesses_incorrect);
        println!("Empty: {}", self.guesses_empty);
        println!();

        println!("Theme toggles: {}", self.theme_toggles);
        if self.operations_skipped > 0 {
            println!("Skipped operations: {}", self.operations_skipped);
        }
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             chip_flips={}\n\
             chips_revealed={}\n\
             reveal_all_batches={}\n\
             reveals_scheduled={}\n\
             hints_used={}\n\
             guesses_checked={}\n\
             guesses_correct={}\n\
             guesses_incorrect={}\n\
             guesses_empty={}\n\
             accuracy={:.4}\n\
             theme_toggles={}\n\
             operations_skipped={}\n",
            self.duration().as_millis(),
            self.chip_flips,
            self.chips_revealed,
            self.reveal_all_batches,
            self.reveals_scheduled,
            self.hints_used,
            self.guesses_checked,
            self.guesses_correct,
            self.guesses_incorrect,
            self.guesses_empty,
            self.accuracy(),
            self.theme_toggles,
            self.operations_skipped,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.end_time.is_none());
        assert!(metrics.duration().as_millis() < 100);
    }

    #[test]
    fn test_accuracy() {
        let mut metrics = Metrics::new();
        assert_eq!(metrics.accuracy(), 0.0);

        metrics.guesses_checked = 4;
        metrics.guesses_correct = 1;
        assert_eq!(metrics.accuracy(), 0.25);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut metrics = Metrics::new();
        metrics.complete();
        let first = metrics.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(metrics.duration(), first);
    }

    #[test]
    fn test_merge() {
        let mut total = Metrics::new();
        total.chip_flips = 2;

        let mut page = Metrics::new();
        page.chip_flips = 3;
        page.guesses_correct = 1;
        page.guesses_checked = 1;

        total.merge(&page);
        assert_eq!(total.chip_flips, 5);
        assert_eq!(total.accuracy(), 1.0);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new();
        metrics.chip_flips = 3;
        metrics.hints_used = 1;
        metrics.guesses_checked = 2;

        let text = metrics.export_text();
        assert!(text.contains("chip_flips=3"));
        assert!(text.contains("hints_used=1"));
        assert!(text.contains("guesses_checked=2"));
    }
}
