#![doc = include_str!("../README.md")]

//! Suite orchestration over external theorem provers.
//!
//! The flow for one run: parse the theory once, then for each selected
//! test case [`assemble`](assemble::assemble) an obligation, hand it to
//! the backend adapter, and classify the resulting verdict against the
//! case's expected polarity. Results are reordered into source order
//! before reporting, whatever the completion order was.

pub mod assemble;
pub mod config;
pub mod report;
pub mod suite;

pub use assemble::{assemble, AssemblyError, ProverInvocation};
pub use config::HarnessConfig;
pub use report::{SuiteReport, TestOutcome};
pub use suite::{run_suite, SuiteError};
