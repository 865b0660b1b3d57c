//! Process-wide configuration, established once at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sequent_provers::backends::{backend_for, BackendKind};
use sequent_provers::ProverBackend;
use sequent_theory::Dialect;

/// Everything the orchestrator needs beyond the document itself.
///
/// Built once in `main` and passed down explicitly; adapters never read
/// ambient environment state. This keeps runs deterministic and lets
/// tests substitute scripted backends.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Prover 9 executable.
    pub prover9_path: PathBuf,
    /// E prover executable.
    pub eprover_path: PathBuf,
    /// Per-test wall-clock limit, owned by the process runner.
    pub timeout: Duration,
    /// Bounded worker count; 1 runs the suite sequentially.
    pub jobs: usize,
    /// Directory for per-test transcripts; `None` disables them.
    pub results_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            prover9_path: BackendKind::Prover9.default_executable().to_path_buf(),
            eprover_path: BackendKind::Eprover.default_executable().to_path_buf(),
            timeout: Duration::from_secs(60),
            jobs: 1,
            results_dir: Some(PathBuf::from("results")),
        }
    }
}

impl HarnessConfig {
    pub fn executable_for(&self, kind: BackendKind) -> &Path {
        match kind {
            BackendKind::Prover9 => &self.prover9_path,
            BackendKind::Eprover => &self.eprover_path,
        }
    }

    /// Build the adapter that natively consumes `dialect`.
    pub fn backend(&self, dialect: Dialect) -> Box<dyn ProverBackend> {
        let kind = BackendKind::for_dialect(dialect);
        backend_for(kind, self.executable_for(kind).to_path_buf())
    }
}
