//! Baconian cipher codec.
//!
//! Each letter is written as a group of five symbols drawn from {A, B}. The
//! group is read as a 5-bit number, MSB first, with A = 0 and B = 1, and the
//! number is an offset from 'A'. Only 0-25 name letters; 26-31 decode to
//! [`DecodedLetter::Unknown`].
//!
//! Every function here is pure and total. Malformed input never errors: it
//! decodes to `Unknown`, which renders as `?`.
//!
//! # Example
//! ```
//! use osi_puzzle_core::cipher::{decode_group, decode_groups, normalize_plaintext, DecodedLetter};
//!
//! assert_eq!(decode_group("BAAAB"), DecodedLetter::Letter('R'));
//! assert_eq!(decode_group("bbbbb"), DecodedLetter::Unknown);
//! assert_eq!(decode_groups(["ABBBA", "ABBAB"]), "ON");
//! assert_eq!(normalize_plaintext("Hello World!"), "HELLOWORLD");
//! ```

use std::fmt;

/// Number of symbols in a cipher group.
pub const GROUP_LEN: usize = 5;

/// Highest 5-bit value that names a letter ('Z').
const MAX_LETTER_VALUE: u8 = 25;

/// Rendering of [`DecodedLetter::Unknown`].
pub const UNKNOWN_GLYPH: char = '?';

/// Result of decoding one cipher group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodedLetter {
    /// An uppercase letter A-Z
    Letter(char),
    /// The group was malformed or out of range
    Unknown,
}

impl DecodedLetter {
    pub fn is_unknown(self) -> bool {
        matches!(self, DecodedLetter::Unknown)
    }
}

impl fmt::Display for DecodedLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedLetter::Letter(c) => write!(f, "{}", c),
            DecodedLetter::Unknown => write!(f, "{}", UNKNOWN_GLYPH),
        }
    }
}

/// A validated cipher group: five uppercase symbols from {A, B}.
///
/// # Invariants
/// - exactly [`GROUP_LEN`] symbols
/// - `value` is the MSB-first reading of the symbols (0-31)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CipherGroup {
    value: u8,
}

impl CipherGroup {
    /// Parse a group, accepting either case.
    ///
    /// Returns `None` for the wrong length or any symbol outside {A, B}.
    pub fn parse(group: &str) -> Option<Self> {
        let mut value: u8 = 0;
        let mut count = 0;

        for ch in group.chars() {
            count += 1;
            if count > GROUP_LEN {
                return None;
            }
            let bit = match ch.to_ascii_uppercase() {
                'A' => 0,
                'B' => 1,
                _ => return None,
            };
            value = (value << 1) | bit;
        }

        if count != GROUP_LEN {
            return None;
        }

        Some(Self { value })
    }

    /// Build the group for an integer 0-31.
    pub fn from_value(value: u8) -> Option<Self> {
        if value < 32 {
            Some(Self { value })
        } else {
            None
        }
    }

    /// The 5-bit value of this group.
    pub fn value(self) -> u8 {
        self.value
    }

    /// Letter named by this group, or `Unknown` for 26-31.
    pub fn letter(self) -> DecodedLetter {
        if self.value <= MAX_LETTER_VALUE {
            DecodedLetter::Letter((b'A' + self.value) as char)
        } else {
            DecodedLetter::Unknown
        }
    }
}

impl fmt::Display for CipherGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for shift in (0..GROUP_LEN).rev() {
            let symbol = if (self.value >> shift) & 1 == 1 { 'B' } else { 'A' };
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// True if `group` is five symbols from {A, B} (either case) naming A-Z.
pub fn is_valid_group(group: &str) -> bool {
    !decode_group(group).is_unknown()
}

/// Decode one group. Never fails; malformed input yields `Unknown`.
pub fn decode_group(group: &str) -> DecodedLetter {
    match CipherGroup::parse(group) {
        Some(parsed) => parsed.letter(),
        None => DecodedLetter::Unknown,
    }
}

/// Decode a sequence of groups into plaintext, in order.
///
/// `Unknown` letters appear as `?` so the output keeps one character per
/// group.
pub fn decode_groups<I, S>(groups: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    groups
        .into_iter()
        .map(|group| decode_group(group.as_ref()).to_string())
        .collect()
}

/// Decode a whitespace-separated list of groups.
///
/// Blank input yields an empty string.
pub fn decode_group_list(text: &str) -> String {
    decode_groups(text.split_whitespace())
}

/// Strip everything that is not an ASCII letter and uppercase the rest.
///
/// Applied to both the stored answer and the live guess, so comparison
/// ignores case, whitespace and punctuation.
pub fn normalize_plaintext(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Encode one letter (either case). Non-letters have no group.
pub fn encode_letter(letter: char) -> Option<String> {
    if !letter.is_ascii_alphabetic() {
        return None;
    }
    let value = letter.to_ascii_uppercase() as u8 - b'A';
    CipherGroup::from_value(value).map(|group| group.to_string())
}

/// Encode text after normalization, one group per remaining letter.
pub fn encode_text(text: &str) -> Vec<String> {
    normalize_plaintext(text)
        .chars()
        .filter_map(encode_letter)
        .collect()
}
