//! Uniform classification of prover outcomes.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The harness's classification of one prover run.
///
/// Verdicts are pure output: they hold no process resources and can be
/// moved freely between worker threads and the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// The prover reported a proof. `answer` carries the prover's own
    /// confirmation label when its output grammar provides one.
    Proved {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        answer: Option<String>,
    },
    /// The prover exhausted its search without finding a proof.
    NotProved {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        answer: Option<String>,
    },
    /// The wall-clock limit expired before the prover finished.
    TimedOut,
    /// The prover died or produced output no adapter recognizes.
    Crashed { reason: String },
}

impl Verdict {
    /// True when the prover actually answered the question either way.
    pub fn is_conclusive(&self) -> bool {
        matches!(self, Verdict::Proved { .. } | Verdict::NotProved { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Proved { .. } => "PROVED",
            Verdict::NotProved { .. } => "NOT PROVED",
            Verdict::TimedOut => "TIMED OUT",
            Verdict::Crashed { .. } => "CRASHED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Proved {
                answer: Some(label),
            } => write!(f, "PROVED ({label})"),
            Verdict::NotProved {
                answer: Some(label),
            } => write!(f, "NOT PROVED ({label})"),
            Verdict::Crashed { reason } => write!(f, "CRASHED: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Raw output of one prover subprocess, before any interpretation.
///
/// Owned transiently by the backend adapter, which consumes it into a
/// [`Verdict`] and a transcript.
#[derive(Debug, Clone)]
pub struct RawProverResult {
    /// Exit code, or `None` when the process was killed by a signal
    /// (including the runner's own timeout kill).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    pub duration: Duration,
}

impl RawProverResult {
    /// Combined capture for the per-test transcript artifact.
    pub fn transcript(&self) -> String {
        if self.stderr.trim().is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n--- stderr ---\n{}", self.stdout, self.stderr)
        }
    }

    /// Compact diagnostic excerpt for crash reports: the last few
    /// non-empty stderr lines, falling back to stdout.
    pub fn diagnostic_snippet(&self) -> String {
        const MAX_LINES: usize = 6;
        let tail = |text: &str| -> String {
            let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
            let skip = lines.len().saturating_sub(MAX_LINES);
            lines[skip..].join("\n")
        };
        let mut snippet = tail(&self.stderr);
        if snippet.is_empty() {
            snippet = tail(&self.stdout);
        }
        if snippet.is_empty() {
            snippet = "(no output)".into();
        }
        match self.exit_code {
            Some(code) => format!("exit code {code}: {snippet}"),
            None => format!("terminated by signal: {snippet}"),
        }
    }
}

/// A completed, interpreted prover run.
#[derive(Debug, Clone)]
pub struct ProverRun {
    pub verdict: Verdict,
    /// Raw captured output, persisted per test for post-hoc inspection.
    pub transcript: String,
    pub duration: Duration,
}
