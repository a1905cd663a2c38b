//! Built-in diagnostic for the cipher codec.
//!
//! Runs a fixed table of known answers: single groups, normalization inputs,
//! and the two full messages the layer pages use. Each case is logged as it
//! runs and collected into a [`SelfTestReport`].

use std::fmt;

use crate::cipher::{decode_group, decode_groups, normalize_plaintext};

const GROUP_CASES: &[(&str, &str)] = &[
    ("AAAAA", "A"),
    ("AAAAB", "B"),
    ("AABAA", "E"),
    ("ABBBA", "O"),
    ("BAAAB", "R"),
    ("BAABA", "S"),
    ("BBAAB", "Z"),
    ("baaab", "R"),
    ("BBBBB", "?"),
    ("AAAA", "?"),
    ("AAAAC", "?"),
];

const NORMALIZE_CASES: &[(&str, &str)] = &[
    ("Hello World!", "HELLOWORLD"),
    ("SeSsIoN", "SESSION"),
    ("r e l i a b l e", "RELIABLE"),
    ("  ", ""),
];

const MESSAGE_CASES: &[(&[&str], &str)] = &[
    (
        &["BAAAB", "AABAA", "ABABB", "ABAAA", "AAAAA", "AAAAB", "ABABB", "AABAA"],
        "RELIABLE",
    ),
    (
        &["BAABA", "AABAA", "BAABA", "BAABA", "ABAAA", "ABBBA", "ABBAB"],
        "SESSION",
    ),
];

/// Which table a case came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    Group,
    Normalize,
    Message,
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseKind::Group => "decode",
            CaseKind::Normalize => "normalize",
            CaseKind::Message => "message",
        };
        f.write_str(name)
    }
}

/// Result of one known-answer case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub kind: CaseKind,
    pub input: String,
    pub expected: String,
    pub actual: String,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

impl fmt::Display for CaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "PASS" } else { "FAIL" };
        write!(
            f,
            "[{}] {} {:?} -> {:?}",
            status, self.kind, self.input, self.actual
        )?;
        if !self.passed() {
            write!(f, " (expected {:?})", self.expected)?;
        }
        Ok(())
    }
}

/// All case results from one run.
#[derive(Debug, Clone, Default)]
pub struct SelfTestReport {
    pub cases: Vec<CaseResult>,
}

impl SelfTestReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|case| case.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn summary(&self) -> String {
        format!("{}/{} passed", self.passed(), self.cases.len())
    }
}

impl fmt::Display for SelfTestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            writeln!(f, "{}", case)?;
        }
        write!(f, "{}", self.summary())
    }
}

/// Run every known-answer case.
pub fn run() -> SelfTestReport {
    let mut report = SelfTestReport::default();

    for (group, letter) in GROUP_CASES {
        report.cases.push(CaseResult {
            kind: CaseKind::Group,
            input: group.to_string(),
            expected: letter.to_string(),
            actual: decode_group(group).to_string(),
        });
    }

    for (raw, normalized) in NORMALIZE_CASES {
        report.cases.push(CaseResult {
            kind: CaseKind::Normalize,
            input: raw.to_string(),
            expected: normalized.to_string(),
            actual: normalize_plaintext(raw),
        });
    }

    for (groups, message) in MESSAGE_CASES {
        report.cases.push(CaseResult {
            kind: CaseKind::Message,
            input: groups.join(" "),
            expected: message.to_string(),
            actual: decode_groups(groups.iter()),
        });
    }

    for case in &report.cases {
        if case.passed() {
            tracing::debug!("{}", case);
        } else {
            tracing::warn!("{}", case);
        }
    }
    tracing::info!(passed = report.passed(), failed = report.failed(), "codec self-test finished");

    report
}
