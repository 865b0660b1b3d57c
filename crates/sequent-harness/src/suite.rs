//! Suite orchestration: assemble, invoke, and classify each selected
//! test case, then collect verdicts into a source-ordered report.
//!
//! Test cases are independent by construction (each gets a fresh
//! obligation and its own subprocess), so the orchestrator may run them
//! on a bounded pool of worker threads. Workers pull indices from a
//! shared cursor and send tagged results back over a channel; the
//! report is rebuilt in source order whatever the completion order was.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use sequent_provers::{LaunchError, ProverBackend, Verdict};
use sequent_theory::{TestCase, TheoryDocument};

use crate::assemble::assemble;
use crate::config::HarnessConfig;
use crate::report::{matches_expectation, sha256_hex, SuiteReport, TestOutcome};

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("unknown test case `{name}`; available tests: {available}")]
    UnknownTest { name: String, available: String },

    #[error("could not create results directory `{path}`: {source}")]
    ResultsDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The prover executable could not be started at all. Fatal: no
    /// test can produce a meaningful verdict.
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

/// Run the selected test cases and collect a [`SuiteReport`].
///
/// An empty `selection` runs every test. Named selections are validated
/// before anything launches; results always come back in source order.
pub fn run_suite(
    doc: &TheoryDocument,
    source: &str,
    theory_file: &str,
    selection: &[String],
    config: &HarnessConfig,
    backend: &dyn ProverBackend,
) -> Result<SuiteReport, SuiteError> {
    let selected = resolve_selection(doc, selection)?;

    if let Some(dir) = &config.results_dir {
        fs::create_dir_all(dir).map_err(|source| SuiteError::ResultsDir {
            path: dir.display().to_string(),
            source,
        })?;
    }

    let jobs = config.jobs.max(1).min(selected.len());
    let outcomes = if jobs <= 1 {
        run_sequential(doc, &selected, config, backend)?
    } else {
        run_pooled(doc, &selected, config, backend, jobs)?
    };

    Ok(SuiteReport::new(
        theory_file.to_string(),
        doc.dialect,
        backend.kind().as_str().to_string(),
        sha256_hex(source.as_bytes()),
        outcomes,
    ))
}

/// Map selection names to test indices, restoring source order.
fn resolve_selection(doc: &TheoryDocument, selection: &[String]) -> Result<Vec<usize>, SuiteError> {
    if selection.is_empty() {
        return Ok((0..doc.test_cases.len()).collect());
    }
    let mut selected = Vec::with_capacity(selection.len());
    for name in selection {
        match doc.test_index(name) {
            Some(index) => selected.push(index),
            None => {
                return Err(SuiteError::UnknownTest {
                    name: name.clone(),
                    available: doc.test_names().collect::<Vec<_>>().join(", "),
                });
            }
        }
    }
    selected.sort_unstable();
    selected.dedup();
    Ok(selected)
}

fn run_sequential(
    doc: &TheoryDocument,
    selected: &[usize],
    config: &HarnessConfig,
    backend: &dyn ProverBackend,
) -> Result<Vec<TestOutcome>, SuiteError> {
    let mut outcomes = Vec::with_capacity(selected.len());
    for &index in selected {
        outcomes.push(run_one(doc, &doc.test_cases[index], config, backend)?);
    }
    Ok(outcomes)
}

/// Bounded worker pool. Each worker owns one live prover subprocess at
/// a time; a timeout in one test never cancels its siblings. A launch
/// failure aborts the run, though workers already past the cursor
/// finish their in-flight test first.
fn run_pooled(
    doc: &TheoryDocument,
    selected: &[usize],
    config: &HarnessConfig,
    backend: &dyn ProverBackend,
    jobs: usize,
) -> Result<Vec<TestOutcome>, SuiteError> {
    let total = selected.len();
    let cursor = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, Result<TestOutcome, LaunchError>)>();

    let mut slots: Vec<Option<Result<TestOutcome, LaunchError>>> = Vec::new();
    slots.resize_with(total, || None);

    thread::scope(|scope| {
        for _ in 0..jobs {
            let tx = tx.clone();
            let cursor = &cursor;
            scope.spawn(move || loop {
                let slot = cursor.fetch_add(1, Ordering::SeqCst);
                if slot >= total {
                    break;
                }
                let case = &doc.test_cases[selected[slot]];
                let result = run_one(doc, case, config, backend);
                if tx.send((slot, result)).is_err() {
                    break;
                }
            });
        }
        drop(tx);
        for (slot, result) in rx {
            slots[slot] = Some(result);
        }
    });

    let mut outcomes = Vec::with_capacity(total);
    for slot in slots {
        // The scope joins every worker, and workers send exactly one
        // result per claimed slot.
        let result = slot.expect("every slot has a result after the pool joins");
        outcomes.push(result?);
    }
    Ok(outcomes)
}

fn run_one(
    doc: &TheoryDocument,
    case: &TestCase,
    config: &HarnessConfig,
    backend: &dyn ProverBackend,
) -> Result<TestOutcome, LaunchError> {
    let started = Instant::now();
    info!(test = %case.name, index = case.index, "running test case");

    let invocation = match assemble(doc, case) {
        Ok(invocation) => invocation,
        Err(err) => {
            // A test whose obligation cannot be built safely is a hard
            // failure for that test only; siblings proceed.
            warn!(test = %case.name, error = %err, "obligation assembly failed");
            return Ok(TestOutcome {
                name: case.name.clone(),
                index: case.index,
                line: case.line,
                polarity: case.polarity,
                verdict: Verdict::Crashed {
                    reason: err.to_string(),
                },
                matches_expectation: false,
                duration_ms: elapsed_ms(&started),
                transcript_path: None,
            });
        }
    };

    let run = backend.invoke(&invocation.input, config.timeout)?;
    let matches = matches_expectation(&run.verdict, case.polarity);

    let transcript_path = config.results_dir.as_ref().and_then(|dir| {
        let path = dir.join(format!("{}.txt", sanitize_component(&case.name)));
        match fs::write(&path, &run.transcript) {
            Ok(()) => Some(path.display().to_string()),
            Err(err) => {
                // Transcripts are diagnostic artifacts; losing one must
                // not change the verdict.
                warn!(test = %case.name, error = %err, "could not write transcript");
                None
            }
        }
    });

    Ok(TestOutcome {
        name: case.name.clone(),
        index: case.index,
        line: case.line,
        polarity: case.polarity,
        verdict: run.verdict,
        matches_expectation: matches,
        duration_ms: elapsed_ms(&started),
        transcript_path,
    })
}

fn elapsed_ms(started: &Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// File-name-safe rendition of a test name for transcript artifacts.
fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "unnamed".into()
    } else {
        trimmed.into()
    }
}
