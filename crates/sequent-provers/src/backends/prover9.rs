//! Adapter for Prover 9, a resolution prover with Prolog-style
//! variable conventions.
//!
//! Prover 9 reads its whole input on standard input and reports the
//! search outcome as banner lines: `THEOREM PROVED` on success,
//! `SEARCH FAILED` when the search space is exhausted without a proof.
//! When the theory uses answer literals, the proof echoes them back as
//! `$answer(<label>)` terms; the first such label is carried on the
//! verdict for result attribution.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use super::{BackendKind, ProverBackend};
use crate::runner::{self, LaunchError};
use crate::verdict::{ProverRun, RawProverResult, Verdict};

pub struct Prover9Backend {
    executable: PathBuf,
}

impl Prover9Backend {
    pub fn new(executable: PathBuf) -> Self {
        Self { executable }
    }

    /// Classify a finished Prover 9 run.
    ///
    /// Pattern-driven: exit codes vary across Prover 9 builds, so the
    /// banner lines are authoritative and the exit code only shows up
    /// in crash diagnostics.
    pub fn interpret(raw: &RawProverResult) -> Verdict {
        if raw.timed_out {
            return Verdict::TimedOut;
        }
        let mut proved = false;
        let mut exhausted = false;
        let mut answer: Option<String> = None;
        for line in raw.stdout.lines() {
            let line = line.trim_start();
            if line.starts_with("THEOREM PROVED") {
                proved = true;
            } else if line.starts_with("SEARCH FAILED") {
                exhausted = true;
            }
            if answer.is_none() {
                if let Some(label) = extract_answer(line) {
                    answer = Some(label.to_string());
                }
            }
        }
        if proved {
            Verdict::Proved { answer }
        } else if exhausted {
            Verdict::NotProved { answer: None }
        } else {
            Verdict::Crashed {
                reason: raw.diagnostic_snippet(),
            }
        }
    }
}

/// Pull the label out of a `$answer(<label>)` literal, if present.
fn extract_answer(line: &str) -> Option<&str> {
    let at = line.find("$answer(")?;
    let rest = &line[at + "$answer(".len()..];
    let end = rest.find(')')?;
    let label = rest[..end].trim();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

impl ProverBackend for Prover9Backend {
    fn kind(&self) -> BackendKind {
        BackendKind::Prover9
    }

    fn invoke(&self, input: &str, timeout: Duration) -> Result<ProverRun, LaunchError> {
        debug!(executable = %self.executable.display(), "invoking prover9");
        let raw = runner::run(&self.executable, &[], input, timeout)?;
        let verdict = Self::interpret(&raw);
        Ok(ProverRun {
            verdict,
            transcript: raw.transcript(),
            duration: raw.duration,
        })
    }
}
