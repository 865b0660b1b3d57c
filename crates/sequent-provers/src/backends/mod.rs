//! Backend adapters: one self-contained integration per prover.
//!
//! Different provers disagree on what a successful proof looks like on
//! the wire: Prover 9 prints banner lines, E speaks the SZS status
//! vocabulary. Each adapter owns its prover's command line and output
//! grammar so the suite orchestrator never branches on prover identity;
//! adding a prover means adding one new variant here.

pub mod eprover;
pub mod prover9;

pub use eprover::EproverBackend;
pub use prover9::Prover9Backend;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sequent_theory::Dialect;

use crate::runner::LaunchError;
use crate::verdict::ProverRun;

pub const BACKEND_PROVER9: &str = "prover9";
pub const BACKEND_EPROVER: &str = "eprover";

/// Stable identifier for a supported prover integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Prover9,
    Eprover,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Prover9 => BACKEND_PROVER9,
            BackendKind::Eprover => BACKEND_EPROVER,
        }
    }

    /// The backend that natively consumes a given theory dialect.
    pub fn for_dialect(dialect: Dialect) -> BackendKind {
        match dialect {
            Dialect::Prover9 => BackendKind::Prover9,
            Dialect::Tptp => BackendKind::Eprover,
        }
    }

    /// Well-known install location, overridable via configuration.
    pub fn default_executable(&self) -> &'static Path {
        match self {
            BackendKind::Prover9 => Path::new("/usr/bin/prover9"),
            BackendKind::Eprover => Path::new("/home/E/PROVER/eprover"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown prover backend '{0}'; expected one of: prover9, eprover")]
pub struct UnknownBackend(String);

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            BACKEND_PROVER9 => Ok(BackendKind::Prover9),
            BACKEND_EPROVER => Ok(BackendKind::Eprover),
            other => Err(UnknownBackend(other.into())),
        }
    }
}

/// One prover integration: how to invoke the executable and how to read
/// its output into a [`crate::Verdict`].
pub trait ProverBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Run one assembled obligation through the prover.
    ///
    /// Errors only when the process cannot be launched at all; every
    /// prover-side outcome, including crashes, comes back as a verdict.
    fn invoke(&self, input: &str, timeout: Duration) -> Result<ProverRun, LaunchError>;
}

/// Construct the adapter for `kind` with the given executable path.
pub fn backend_for(kind: BackendKind, executable: PathBuf) -> Box<dyn ProverBackend> {
    match kind {
        BackendKind::Prover9 => Box::new(Prover9Backend::new(executable)),
        BackendKind::Eprover => Box::new(EproverBackend::new(executable)),
    }
}
