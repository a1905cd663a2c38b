//! Configuration for the osi-puzzle terminal front end.
//!
//! Parses command-line arguments and fills in defaults. The tool works with
//! zero arguments: it opens the transport-layer puzzle from the built-in
//! deck and keeps preferences in the platform data directory.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use osi_puzzle_core::controller::DEFAULT_STAGGER;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "osi-puzzle",
    about = "Decode the Baconian cipher puzzles from the OSI layer lessons",
    version
)]
pub struct Args {
    /// Puzzle deck in TOML (default: built-in transport and session puzzles)
    #[arg(long, value_name = "PATH")]
    pub deck: Option<PathBuf>,

    /// Puzzle to open first (default: first puzzle in the deck)
    #[arg(long, value_name = "ID")]
    pub puzzle: Option<String>,

    /// Preference file (default: <data dir>/osi-puzzle/preferences.json)
    #[arg(long, value_name = "PATH")]
    pub prefs: Option<PathBuf>,

    /// Reveal everything at once instead of one chip at a time
    #[arg(long, env = "OSI_PUZZLE_REDUCED_MOTION")]
    pub reduced_motion: bool,

    /// Delay between chips during reveal-all, in milliseconds
    #[arg(long, value_name = "MS")]
    pub stagger_ms: Option<u64>,

    /// Play a randomly generated practice puzzle instead of the deck
    #[arg(long)]
    pub practice: bool,

    /// Seed for the practice puzzle (default: time-based)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Run the codec self-test and exit
    #[arg(long)]
    pub self_test: bool,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print the session summary at exit
    #[arg(long)]
    pub no_metrics: bool,

    /// Write the session counters as key=value lines to this file at exit
    #[arg(long, value_name = "PATH")]
    pub metrics_file: Option<PathBuf>,
}

/// Complete configuration for a session.
#[derive(Debug, Clone)]
pub struct Config {
    // === Content ===
    /// Deck file (None = built-in deck)
    pub deck_file: Option<PathBuf>,

    /// Puzzle to open first (None = first in deck)
    pub start_puzzle: Option<String>,

    /// Practice puzzle seed (None = play the deck)
    pub practice_seed: Option<u64>,

    // === Page ===
    /// Preference file (None = keep preferences in memory)
    pub prefs_file: Option<PathBuf>,

    /// Collapse reveal-all delays to zero
    pub reduced_motion: bool,

    /// Delay between reveal-all steps
    pub stagger: Duration,

    // === Behavior ===
    pub self_test: bool,
    pub print_config: bool,
    pub print_metrics: bool,

    /// Where to export counters at exit (None = don't export)
    pub metrics_file: Option<PathBuf>,
}

impl Config {
    /// Resolve arguments into a configuration, filling defaults.
    pub fn from_args(args: Args) -> Self {
        let practice_seed = args.practice.then(|| args.seed.unwrap_or_else(time_seed));

        Config {
            deck_file: args.deck,
            start_puzzle: args.puzzle,
            practice_seed,
            prefs_file: args.prefs.or_else(default_prefs_file),
            reduced_motion: args.reduced_motion,
            stagger: args
                .stagger_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_STAGGER),
            self_test: args.self_test,
            print_config: args.print_config,
            print_metrics: !args.no_metrics,
            metrics_file: args.metrics_file,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.deck_file {
            Some(path) => println!("Deck: {}", path.display()),
            None => println!("Deck: (built-in)"),
        }
        println!("Start puzzle: {}", self.start_puzzle.as_deref().unwrap_or("(first)"));
        if let Some(seed) = self.practice_seed {
            println!("Practice seed: {}", seed);
        }
        match &self.prefs_file {
            Some(path) => println!("Preferences: {}", path.display()),
            None => println!("Preferences: (memory only)"),
        }
        println!("Reduced motion: {}", self.reduced_motion);
        println!("Stagger: {} ms", self.stagger.as_millis());
        if let Some(path) = &self.metrics_file {
            println!("Metrics file: {}", path.display());
        }
        println!();
    }
}

fn default_prefs_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("osi-puzzle").join("preferences.json"))
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Config {
        let args = Args::try_parse_from(std::iter::once("osi-puzzle").chain(argv.iter().copied()))
            .expect("arguments parse");
        Config::from_args(args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert!(config.deck_file.is_none());
        assert!(config.start_puzzle.is_none());
        assert!(config.practice_seed.is_none());
        assert_eq!(config.stagger, DEFAULT_STAGGER);
        assert!(config.print_metrics);
        assert!(!config.self_test);
        assert!(config.metrics_file.is_none());
    }

    #[test]
    fn test_practice_with_seed() {
        let config = parse(&["--practice", "--seed", "42"]);
        assert_eq!(config.practice_seed, Some(42));
    }

    #[test]
    fn test_seed_without_practice_is_ignored() {
        let config = parse(&["--seed", "42"]);
        assert!(config.practice_seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--deck",
            "layers.toml",
            "--puzzle",
            "session",
            "--prefs",
            "p.json",
            "--stagger-ms",
            "10",
            "--reduced-motion",
            "--no-metrics",
            "--metrics-file",
            "stats.txt",
        ]);
        assert_eq!(config.deck_file, Some(PathBuf::from("layers.toml")));
        assert_eq!(config.start_puzzle.as_deref(), Some("session"));
        assert_eq!(config.prefs_file, Some(PathBuf::from("p.json")));
        assert_eq!(config.stagger, Duration::from_millis(10));
        assert!(config.reduced_motion);
        assert!(!config.print_metrics);
        assert_eq!(config.metrics_file, Some(PathBuf::from("stats.txt")));
    }

    #[test]
    fn test_unknown_argument_rejected() {
        assert!(Args::try_parse_from(["osi-puzzle", "--bogus"]).is_err());
    }
}
