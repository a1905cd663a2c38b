//! osi-puzzle: play the OSI layer cipher puzzles in a terminal.

mod config;
mod puzzle_gen;
mod session;
mod term;

use std::io::{BufRead, Write};

use anyhow::Context;
use clap::Parser;
use osi_puzzle_core::preferences::{FileStore, Preferences};
use osi_puzzle_core::{selftest, Deck};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Args, Config};
use crate::puzzle_gen::generate_practice_puzzle;
use crate::session::{Flow, Session};
use crate::term::parse_command;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load_deck(config: &Config) -> anyhow::Result<Deck> {
    if let Some(seed) = config.practice_seed {
        return Ok(Deck {
            puzzles: vec![generate_practice_puzzle(seed)],
        });
    }

    match &config.deck_file {
        Some(path) => Deck::load(path).with_context(|| format!("loading deck {}", path.display())),
        None => Ok(Deck::builtin()),
    }
}

/// Open the preference file, falling back to memory if it is unusable.
fn open_preferences(config: &Config) -> Preferences {
    let Some(path) = &config.prefs_file else {
        return Preferences::ephemeral();
    };

    match FileStore::open(path) {
        Ok(store) => Preferences::new(Box::new(store)),
        Err(err) => {
            tracing::warn!("{}; preferences will not be saved", err);
            Preferences::ephemeral()
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_args(Args::parse());
    if config.print_config {
        config.print();
    }

    if config.self_test {
        let report = selftest::run();
        println!("{}", report);
        if !report.all_passed() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let deck = load_deck(&config)?;
    for issue in deck.lint() {
        tracing::warn!("{}", issue);
    }

    let spec = match &config.start_puzzle {
        Some(id) => deck.require(id)?.clone(),
        None => deck.puzzles[0].clone(),
    };

    let prefs = open_preferences(&config);
    let mut session = Session::start(&config, deck, spec, prefs);
    session.render();
    println!("Type `help` for commands.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let command = match parse_command(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        match session.handle(command) {
            Flow::Continue => {}
            Flow::Open(id) => {
                if session.has_puzzle(&id) {
                    session = session.open(&id);
                    session.render();
                } else {
                    println!("No puzzle named {:?}. Try `list`.", id);
                }
            }
            Flow::Quit => break,
        }
    }

    let metrics = session.finish();
    if config.print_metrics {
        metrics.print_summary();
    }
    if let Some(path) = &config.metrics_file {
        std::fs::write(path, metrics.export_text())
            .with_context(|| format!("writing metrics to {}", path.display()))?;
    }

    Ok(())
}
