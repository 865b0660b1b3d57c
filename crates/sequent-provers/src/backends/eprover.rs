//! Adapter for the E theorem prover, consuming the TPTP dialect.
//!
//! E reports outcomes twice over: as banner comments (`# Proof found!`,
//! `# No proof found!`) and as a line from the standardized SZS status
//! vocabulary (`# SZS status Theorem`). Both are recognized, so other
//! SZS-speaking provers pointed at this adapter still classify
//! correctly. The conjecture name echoed in the proof object serves as
//! the answer label.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use super::{BackendKind, ProverBackend};
use crate::runner::{self, LaunchError};
use crate::verdict::{ProverRun, RawProverResult, Verdict};

/// Flags for a conformance-style run: quiet, TSTP in/out, proof object
/// on success, bounded memory.
const BASE_ARGS: &[&str] = &[
    "--auto-schedule",
    "--tstp-format",
    "-s",
    "-l",
    "1",
    "--proof-object",
    "--memory-limit=2048",
];

pub struct EproverBackend {
    executable: PathBuf,
}

impl EproverBackend {
    pub fn new(executable: PathBuf) -> Self {
        Self { executable }
    }

    /// Command-line arguments for one run. The harness timeout doubles
    /// as E's own CPU limit, so a well-behaved E stops itself and
    /// reports ResourceOut rather than being killed mid-write.
    fn args_for(timeout: Duration) -> Vec<String> {
        let mut args: Vec<String> = BASE_ARGS.iter().map(|s| s.to_string()).collect();
        args.push(format!("--cpu-limit={}", timeout.as_secs().max(1)));
        args
    }

    /// Classify a finished E run.
    pub fn interpret(raw: &RawProverResult) -> Verdict {
        if raw.timed_out {
            return Verdict::TimedOut;
        }
        let mut proved = false;
        let mut exhausted = false;
        let mut resource_out = false;
        let mut failure: Option<String> = None;
        let mut conjecture: Option<String> = None;

        for line in raw.stdout.lines().chain(raw.stderr.lines()) {
            let line = line.trim_start();
            if let Some(rest) = line.strip_prefix("# SZS status ") {
                match rest.split_whitespace().next().unwrap_or("") {
                    "Theorem" | "Unsatisfiable" | "ContradictoryAxioms" => proved = true,
                    "CounterSatisfiable" | "Satisfiable" | "GaveUp" => exhausted = true,
                    "ResourceOut" | "Timeout" => resource_out = true,
                    _ => {}
                }
            } else if line.starts_with("# Proof found!") {
                proved = true;
            } else if line.starts_with("# No proof found!") {
                exhausted = true;
            } else if let Some(rest) = line.strip_prefix("# Failure:") {
                if rest.contains("Resource limit exceeded") {
                    resource_out = true;
                } else {
                    failure = Some(rest.trim().to_string());
                }
            }
            if conjecture.is_none() {
                if let Some(name) = conjecture_name(line) {
                    conjecture = Some(name.to_string());
                }
            }
        }

        if proved {
            Verdict::Proved { answer: conjecture }
        } else if resource_out {
            Verdict::TimedOut
        } else if exhausted {
            Verdict::NotProved { answer: conjecture }
        } else if let Some(reason) = failure {
            Verdict::Crashed { reason }
        } else {
            Verdict::Crashed {
                reason: raw.diagnostic_snippet(),
            }
        }
    }
}

/// Name of a conjecture echoed in E's proof object:
/// `fof(goal_name, conjecture, ...)`.
fn conjecture_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("fof(")?;
    let comma = rest.find(',')?;
    let (name, after) = rest.split_at(comma);
    if after[1..].trim_start().starts_with("conjecture") {
        Some(name.trim())
    } else {
        None
    }
}

impl ProverBackend for EproverBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Eprover
    }

    fn invoke(&self, input: &str, timeout: Duration) -> Result<ProverRun, LaunchError> {
        debug!(executable = %self.executable.display(), "invoking eprover");
        let args = Self::args_for(timeout);
        let raw = runner::run(&self.executable, &args, input, timeout)?;
        let verdict = Self::interpret(&raw);
        Ok(ProverRun {
            verdict,
            transcript: raw.transcript(),
            duration: raw.duration,
        })
    }
}
