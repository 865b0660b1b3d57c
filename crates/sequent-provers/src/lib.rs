#![doc = include_str!("../README.md")]

//! Prover subprocess orchestration and output interpretation.
//!
//! The [`runner`] module supervises one prover process with a wall-clock
//! timeout; the [`backends`] module turns each prover's raw output into
//! a uniform [`Verdict`]. Nothing here knows about theory files or test
//! suites.

pub mod backends;
pub mod runner;
pub mod verdict;

pub use backends::{backend_for, BackendKind, ProverBackend};
pub use runner::LaunchError;
pub use verdict::{ProverRun, RawProverResult, Verdict};
