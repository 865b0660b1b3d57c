//! CLI argument definitions for the `sequent` binary.

use clap::Parser;
use std::path::PathBuf;

const LONG_ABOUT: &str = "\
Conformance test harness for declarative logic theories.

A theory file mixes shared axioms with named test cases marked up as
`% Test case: <name>` comments. Each case is sliced into a standalone
proof obligation, run through an external theorem prover, and judged
against its expected outcome.

Typical usage:
  sequent theories/naive_consent_theory.in
  sequent theories/naive_consent_theory.tptp suicide_is_ethical";

#[derive(Parser)]
#[command(name = "sequent")]
#[command(about = "Run a logic theory's embedded test suite through an external prover")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    /// Path to the theory file to test
    pub(crate) theory_file: PathBuf,

    /// Test cases to run (default: every case in the file)
    pub(crate) tests: Vec<String>,

    /// Theory dialect: prover9 | tptp (default: inferred from the extension)
    #[arg(long)]
    pub(crate) dialect: Option<String>,

    /// Override the prover executable for the selected dialect
    #[arg(long)]
    pub(crate) prover_path: Option<PathBuf>,

    /// Per-test wall-clock timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub(crate) timeout: u64,

    /// Number of concurrent prover processes
    #[arg(long, default_value_t = 1)]
    pub(crate) jobs: usize,

    /// Directory for per-test prover transcripts
    #[arg(long, default_value = "results")]
    pub(crate) results_dir: PathBuf,

    /// Skip writing per-test transcripts
    #[arg(long, default_value_t = false)]
    pub(crate) no_transcripts: bool,

    /// Parse the theory and list its test cases without running any prover
    #[arg(short = 'n', long, default_value_t = false)]
    pub(crate) dry_run: bool,

    /// Output format: text | json
    #[arg(long, default_value = "text")]
    pub(crate) format: String,

    /// Also write the JSON report to this path
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,

    /// Increase report and log detail (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
}
