use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while slicing a theory file.
///
/// Every variant is fatal for the whole run: a document that cannot be
/// sliced cleanly must be reported before any prover is launched.
#[derive(Debug, Error, Diagnostic)]
pub enum TheoryError {
    #[error("duplicate test case name `{name}` at line {line}")]
    #[diagnostic(
        code(sequent::theory::duplicate_test),
        help("every test case in a theory file must have a unique name")
    )]
    DuplicateTestName {
        name: String,
        line: usize,
        #[label("second definition here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("test case `{name}` at line {line} has no goal formula")]
    #[diagnostic(
        code(sequent::theory::empty_test),
        help("a test case block must contain exactly one goal formula")
    )]
    EmptyTestCase {
        name: String,
        line: usize,
        #[label("declared here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("test section starting at line {line} is never closed")]
    #[diagnostic(
        code(sequent::theory::unterminated),
        help("close the section with `% Test runner: end tests.`")
    )]
    UnterminatedTestSection {
        line: usize,
        #[label("still open at end of file")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("no test cases found in `{filename}`")]
    #[diagnostic(
        code(sequent::theory::no_tests),
        help("mark test cases with `% Test case: <name>` comments")
    )]
    NoTestCases { filename: String },
}
