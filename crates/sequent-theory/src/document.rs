//! The parsed, immutable representation of a theory file.

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A textual syntax variant accepted by some family of provers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Prover 9 input syntax with Prolog-style variables.
    Prover9,
    /// TPTP first-order form, as accepted by E and friends.
    Tptp,
}

pub const DIALECT_PROVER9: &str = "prover9";
pub const DIALECT_TPTP: &str = "tptp";

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Prover9 => DIALECT_PROVER9,
            Dialect::Tptp => DIALECT_TPTP,
        }
    }

    /// Infer the dialect from a theory file's extension.
    ///
    /// `.in` and `.p9` are Prover 9 inputs; `.tptp` and `.p` are TPTP.
    pub fn from_extension(path: &Path) -> Option<Dialect> {
        match path.extension()?.to_str()? {
            "in" | "p9" => Some(Dialect::Prover9),
            "tptp" | "p" => Some(Dialect::Tptp),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown dialect '{0}'; expected one of: prover9, tptp")]
pub struct UnknownDialect(String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            DIALECT_PROVER9 => Ok(Dialect::Prover9),
            DIALECT_TPTP => Ok(Dialect::Tptp),
            other => Err(UnknownDialect(other.into())),
        }
    }
}

/// Whether a test case expects its goal to be a consequence of the
/// shared axioms, or expects proof search to come up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Prove,
    Refute,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Prove => "prove",
            Polarity::Refute => "refute",
        }
    }
}

/// One named test case sliced out of a theory file.
///
/// The goal text is kept byte-for-byte as it appeared in the source;
/// nothing in the harness ever rewrites formula text.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Unique name within the document, used for reporting and selection.
    pub name: String,
    /// Verbatim text of the goal block, including its own scaffolding
    /// (e.g. a `formulas(goals)` block or a `fof(..., conjecture, ...)`).
    pub goal: String,
    /// Expected outcome of proof search for this goal.
    pub polarity: Polarity,
    /// 1-based discovery order within the document.
    pub index: usize,
    /// 1-based source line of the test-case marker.
    pub line: usize,
}

/// A parsed theory file: shared axiom matter plus ordered test cases.
///
/// Immutable once built. Test case order is source order, and that is
/// also the order results must be reported in.
#[derive(Debug, Clone, PartialEq)]
pub struct TheoryDocument {
    pub dialect: Dialect,
    /// Verbatim non-test matter: everything outside the test sections.
    pub shared_axioms: String,
    pub test_cases: Vec<TestCase>,
    by_name: IndexMap<String, usize>,
}

impl TheoryDocument {
    /// Invariant: `test_cases` carries no duplicate names (the parser
    /// rejects those before this constructor runs).
    pub(crate) fn new(dialect: Dialect, shared_axioms: String, test_cases: Vec<TestCase>) -> Self {
        let by_name = test_cases
            .iter()
            .enumerate()
            .map(|(i, tc)| (tc.name.clone(), i))
            .collect();
        TheoryDocument {
            dialect,
            shared_axioms,
            test_cases,
            by_name,
        }
    }

    pub fn find_test(&self, name: &str) -> Option<&TestCase> {
        self.by_name.get(name).map(|&i| &self.test_cases[i])
    }

    pub fn test_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn test_names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_round_trips_through_strings() {
        assert_eq!("prover9".parse::<Dialect>().unwrap(), Dialect::Prover9);
        assert_eq!("TPTP".parse::<Dialect>().unwrap(), Dialect::Tptp);
        assert_eq!(Dialect::Prover9.as_str(), "prover9");
        assert!(" vampire ".parse::<Dialect>().is_err());
    }

    #[test]
    fn dialect_inferred_from_extension() {
        assert_eq!(
            Dialect::from_extension(Path::new("theory.in")),
            Some(Dialect::Prover9)
        );
        assert_eq!(
            Dialect::from_extension(Path::new("a/b/theory.p9")),
            Some(Dialect::Prover9)
        );
        assert_eq!(
            Dialect::from_extension(Path::new("theory.tptp")),
            Some(Dialect::Tptp)
        );
        assert_eq!(
            Dialect::from_extension(Path::new("theory.p")),
            Some(Dialect::Tptp)
        );
        assert_eq!(Dialect::from_extension(Path::new("theory.txt")), None);
        assert_eq!(Dialect::from_extension(Path::new("no_extension")), None);
    }

    #[test]
    fn document_lookup_by_name() {
        let doc = TheoryDocument::new(
            Dialect::Prover9,
            "axioms.\n".into(),
            vec![
                TestCase {
                    name: "first".into(),
                    goal: "g1.\n".into(),
                    polarity: Polarity::Prove,
                    index: 1,
                    line: 3,
                },
                TestCase {
                    name: "second".into(),
                    goal: "g2.\n".into(),
                    polarity: Polarity::Refute,
                    index: 2,
                    line: 7,
                },
            ],
        );
        assert_eq!(doc.find_test("second").unwrap().polarity, Polarity::Refute);
        assert_eq!(doc.test_index("first"), Some(0));
        assert!(doc.find_test("third").is_none());
        let names: Vec<&str> = doc.test_names().collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
