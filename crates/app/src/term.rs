//! Terminal commands and page rendering.
//!
//! Each input line is one command. Commands that stand for page interactions
//! (click, key presses, typing) are turned into UI events by the session;
//! the rest are front-end housekeeping.

use osi_puzzle_core::events::Key;
use osi_puzzle_core::preferences::Theme;
use osi_puzzle_core::puzzle::{ChipFace, Feedback, Progress};
use osi_puzzle_core::surface::PuzzleView;
use osi_puzzle_core::PuzzleSpec;

/// What a `focus` command points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    /// 1-based chip number as shown on screen
    Chip(usize),
    Guess,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Click chip N (1-based)
    Click(usize),
    Focus(FocusTarget),
    Blur,
    /// Replace the guess text
    Type(String),
    /// Key press on whatever has focus
    Press(Key),
    Check,
    Hint,
    Reveal,
    Open(String),
    List,
    Stats,
    SelfTest,
    Help,
    Quit,
}

/// Parse a command line. Blank lines are `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "click" | "c" => Command::Click(parse_chip_number(rest)?),
        "focus" | "f" => match rest {
            "guess" | "input" => Command::Focus(FocusTarget::Guess),
            _ => {
                let number = rest.strip_prefix("chip").map(str::trim).unwrap_or(rest);
                Command::Focus(FocusTarget::Chip(parse_chip_number(number)?))
            }
        },
        "blur" => Command::Blur,
        "type" | "t" => Command::Type(rest.to_string()),
        "enter" => Command::Press(Key::Enter),
        "space" => Command::Press(Key::Space),
        "esc" | "escape" => Command::Press(Key::Escape),
        "key" | "k" => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Command::Press(Key::Char(c)),
                _ => return Err("key takes a single character".to_string()),
            }
        }
        "check" => Command::Check,
        "hint" => Command::Hint,
        "reveal" => Command::Reveal,
        "open" | "o" => {
            if rest.is_empty() {
                return Err("open requires a puzzle id".to_string());
            }
            Command::Open(rest.to_string())
        }
        "list" | "ls" => Command::List,
        "stats" => Command::Stats,
        "selftest" | "self-test" => Command::SelfTest,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {}", other)),
    };

    Ok(Some(command))
}

fn parse_chip_number(text: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("expected a chip number (1, 2, ...), got {:?}", text)),
    }
}

/// Render a puzzle page as text.
pub fn render_page(spec: &PuzzleSpec, view: &PuzzleView, theme: Theme, progress: Option<Progress>) -> String {
    let mut out = String::new();

    out.push_str(&format!("== Layer {}: {} ==  [{} theme]\n", spec.layer, spec.title, theme));
    if !spec.blurb.is_empty() {
        out.push_str(&spec.blurb);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&render_chips(view));
    out.push('\n');

    out.push_str(&format!("Guess: {:?}\n", view.guess));
    match view.feedback {
        Feedback::None => {}
        feedback => out.push_str(&format!("{}\n", feedback.message())),
    }
    if view.hint_visible {
        out.push_str("Stuck? `hint` reveals the first letter.\n");
    }
    if let Some(progress) = progress {
        out.push_str(&format!("Revealed {}/{}\n", progress.revealed, progress.total));
    }

    out
}

/// Chip row: numbers above, group or letter below.
pub fn render_chips(view: &PuzzleView) -> String {
    let mut numbers = String::new();
    let mut faces = String::new();

    for (index, chip) in view.chips.iter().enumerate() {
        numbers.push_str(&format!(" {:^5} ", index + 1));
        let shown = match (chip.face, chip.letter) {
            (ChipFace::Up, Some(letter)) => format!("{:^5}", letter.to_string()),
            (ChipFace::Up, None) => format!("{:^5}", "?"),
            (ChipFace::Down, _) => format!("{:5}", chip.group),
        };
        faces.push_str(&format!("[{}]", shown));
    }

    format!("{}\n{}\n", numbers.trim_end(), faces)
}

pub fn print_help() {
    println!("Commands:");
    println!("    click N          Flip chip N");
    println!("    focus chip N     Focus chip N (then `space` or `enter` flips it)");
    println!("    focus guess      Focus the guess input");
    println!("    blur             Drop focus");
    println!("    type TEXT        Replace the guess text");
    println!("    enter | space    Press a key on the focused element");
    println!("    key C            Press a character key (d: theme, r: reveal all)");
    println!("    check            Check the guess");
    println!("    hint             Reveal the first chip (after a wrong guess)");
    println!("    reveal           Reveal all chips");
    println!("    open ID | list   Switch puzzle / list puzzles");
    println!("    stats            Show session counters");
    println!("    selftest         Run the codec self-test");
    println!("    quit             Leave");
}

#[cfg(test)]
mod tests {
    use super::*;
    use osi_puzzle_core::cipher::DecodedLetter;
    use osi_puzzle_core::Deck;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("click 3"), Ok(Some(Command::Click(3))));
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(
            parse_command("focus chip 2"),
            Ok(Some(Command::Focus(FocusTarget::Chip(2))))
        );
        assert_eq!(parse_command("focus guess"), Ok(Some(Command::Focus(FocusTarget::Guess))));
        assert_eq!(
            parse_command("type r e l i a b l e"),
            Ok(Some(Command::Type("r e l i a b l e".to_string())))
        );
        assert_eq!(parse_command("key R"), Ok(Some(Command::Press(Key::Char('R')))));
        assert_eq!(parse_command("ENTER"), Ok(Some(Command::Press(Key::Enter))));
        assert_eq!(parse_command("open session"), Ok(Some(Command::Open("session".to_string()))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("click 0").is_err());
        assert!(parse_command("click x").is_err());
        assert!(parse_command("key dd").is_err());
        assert!(parse_command("open").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_render_chips() {
        let deck = Deck::builtin();
        let spec = deck.require("session").unwrap();
        let mut view = PuzzleView::from_spec(spec);
        view.chips[0].letter = Some(DecodedLetter::Letter('S'));
        view.chips[0].face = ChipFace::Up;

        let row = render_chips(&view);
        assert!(row.contains("[  S  ][AABAA]"));
        assert!(row.starts_with("   1"));
    }

    #[test]
    fn test_render_page_feedback() {
        let deck = Deck::builtin();
        let spec = deck.require("transport").unwrap();
        let mut view = PuzzleView::from_spec(spec);
        view.feedback = Feedback::Incorrect;
        view.hint_visible = true;

        let page = render_page(spec, &view, Theme::Dark, None);
        assert!(page.starts_with("== Layer 4: Transport Layer ==  [dark theme]"));
        assert!(page.contains(Feedback::Incorrect.message()));
        assert!(page.contains("`hint`"));
    }
}
