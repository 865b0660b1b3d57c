//! Suite reports: ordered verdicts, aggregate counts, and rendering.

use serde::Serialize;
use sha2::{Digest, Sha256};

use sequent_provers::Verdict;
use sequent_theory::{Dialect, Polarity};

/// Lowercase hex SHA-256 of the theory source, recorded so a report can
/// be tied back to the exact text it judged.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Whether a verdict satisfies the test's declared expectation.
///
/// TIMED OUT and CRASHED never match, regardless of polarity: an
/// inconclusive prover cannot confirm either expectation.
pub fn matches_expectation(verdict: &Verdict, polarity: Polarity) -> bool {
    matches!(
        (verdict, polarity),
        (Verdict::Proved { .. }, Polarity::Prove) | (Verdict::NotProved { .. }, Polarity::Refute)
    )
}

/// Outcome of one test case.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    pub name: String,
    /// 1-based discovery order in the theory file.
    pub index: usize,
    /// Source line of the test-case marker.
    pub line: usize,
    pub polarity: Polarity,
    pub verdict: Verdict,
    pub matches_expectation: bool,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<String>,
}

/// One run's results in source order, plus aggregate counts.
///
/// A fresh report is produced per invocation of the harness; nothing is
/// carried across runs.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub theory_file: String,
    pub dialect: Dialect,
    pub backend: String,
    pub theory_sha256: String,
    pub outcomes: Vec<TestOutcome>,
    pub matched: usize,
    pub mismatched: usize,
    pub errors: usize,
}

impl SuiteReport {
    pub(crate) fn new(
        theory_file: String,
        dialect: Dialect,
        backend: String,
        theory_sha256: String,
        outcomes: Vec<TestOutcome>,
    ) -> Self {
        let matched = outcomes.iter().filter(|o| o.matches_expectation).count();
        let mismatched = outcomes
            .iter()
            .filter(|o| !o.matches_expectation && o.verdict.is_conclusive())
            .count();
        let errors = outcomes
            .iter()
            .filter(|o| !o.verdict.is_conclusive())
            .count();
        SuiteReport {
            theory_file,
            dialect,
            backend,
            theory_sha256,
            outcomes,
            matched,
            mismatched,
            errors,
        }
    }

    /// Compact per-test marker sequence, in source order: `.` matched,
    /// `F` conclusive mismatch, `T` timed out, `E` crashed.
    pub fn markers(&self) -> String {
        self.outcomes
            .iter()
            .map(|o| {
                if o.matches_expectation {
                    '.'
                } else {
                    match o.verdict {
                        Verdict::TimedOut => 'T',
                        Verdict::Crashed { .. } => 'E',
                        _ => 'F',
                    }
                }
            })
            .collect()
    }

    pub fn all_matched(&self) -> bool {
        self.mismatched == 0 && self.errors == 0
    }

    /// Process exit status for this run: 0 when every case matched its
    /// expectation, 1 otherwise. Usage errors exit with 2 before any
    /// report exists.
    pub fn exit_code(&self) -> i32 {
        if self.all_matched() {
            0
        } else {
            1
        }
    }
}

/// Human-readable rendering: marker sequence, detail for every
/// non-matching case (every case when `verbose`), then a summary line.
pub fn render_text(report: &SuiteReport, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str("Test results:\n\n");
    out.push_str(&report.markers());
    out.push_str("\n\n");

    for outcome in &report.outcomes {
        if outcome.matches_expectation && !verbose {
            continue;
        }
        out.push_str(&format!(
            "Test case #{} `{}` (line {}) {} in {}ms.\n",
            outcome.index,
            outcome.name,
            outcome.line,
            describe(outcome),
            outcome.duration_ms,
        ));
        if let Verdict::Crashed { reason } = &outcome.verdict {
            for line in reason.lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        if !outcome.matches_expectation {
            if let Some(path) = &outcome.transcript_path {
                out.push_str(&format!("    transcript: {path}\n"));
            }
        }
    }

    out.push_str(&format!(
        "\nSummary: {} matched, {} mismatched, {} errors [{}]\n",
        report.matched,
        report.mismatched,
        report.errors,
        if report.all_matched() { "PASS" } else { "FAIL" },
    ));
    out
}

fn describe(outcome: &TestOutcome) -> String {
    if outcome.matches_expectation {
        return format!("matched expectation ({})", outcome.verdict);
    }
    match &outcome.verdict {
        Verdict::TimedOut => "timed out".into(),
        Verdict::Crashed { .. } => "crashed".into(),
        verdict => {
            let wanted = match outcome.polarity {
                Polarity::Prove => "a proof",
                Polarity::Refute => "no proof",
            };
            format!("expected {wanted}, prover answered {verdict}")
        }
    }
}
