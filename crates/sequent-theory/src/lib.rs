#![doc = include_str!("../README.md")]

//! Parsing of theory files into a shared axiom block plus an ordered
//! sequence of named test cases.
//!
//! Formula text is carried verbatim; the only structure this crate
//! understands is the test-runner markup comments.

pub mod document;
pub mod errors;
pub mod parser;

pub use document::{Dialect, Polarity, TestCase, TheoryDocument};
pub use errors::TheoryError;
pub use parser::parse;
