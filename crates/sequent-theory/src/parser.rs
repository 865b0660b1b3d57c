//! Line-oriented scanner for test-runner markup.
//!
//! The scanner understands exactly four marker comments and keeps every
//! other byte of the file intact:
//!
//! - `% Test runner: begin tests.` starts the test section(s)
//! - `% Test case: <name>` opens a test case expecting a proof
//! - `% Negated test case: <name>` opens a case expecting no proof
//! - `% Test runner: end tests.` ends the test section(s)
//!
//! Matching is case-insensitive and tolerant of extra whitespace. Text
//! outside the test sections accumulates verbatim as shared axiom
//! matter; text inside a test case accumulates verbatim as that case's
//! goal block.

use std::collections::HashSet;

use tracing::debug;

use crate::document::{Dialect, Polarity, TestCase, TheoryDocument};
use crate::errors::TheoryError;

/// Parse raw theory source into a [`TheoryDocument`].
///
/// `filename` is only used for diagnostics. The dialect is recorded but
/// not interpreted here; both dialects share the `%` comment markup.
pub fn parse(source: &str, filename: &str, dialect: Dialect) -> Result<TheoryDocument, TheoryError> {
    let mut shared_axioms = String::new();
    let mut cases: Vec<TestCase> = Vec::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    let mut in_section = false;
    let mut section_line = 0usize;
    let mut section_span: miette::SourceSpan = (0, 0).into();
    let mut open: Option<OpenCase> = None;
    let mut case_count = 0usize;
    let mut offset = 0usize;

    for (lineno0, line) in source.lines().enumerate() {
        let line_no = lineno0 + 1;
        let span: miette::SourceSpan = (offset, line.len()).into();
        offset += line.len() + 1;

        match classify_marker(line) {
            Some(Marker::Case { name, negated }) => {
                close_open(open.take(), &mut cases, source, filename)?;
                case_count += 1;
                let name = match name {
                    Some(n) => n.to_string(),
                    None => format!("Test-{case_count}"),
                };
                if !seen_names.insert(name.clone()) {
                    return Err(TheoryError::DuplicateTestName {
                        name,
                        line: line_no,
                        span,
                        src: named_source(source, filename),
                    });
                }
                debug!(test = %name, line = line_no, index = case_count, "found test case");
                if !in_section {
                    section_line = line_no;
                    section_span = span;
                    in_section = true;
                }
                open = Some(OpenCase {
                    name,
                    polarity: if negated { Polarity::Refute } else { Polarity::Prove },
                    index: case_count,
                    line: line_no,
                    span,
                    text: String::new(),
                });
            }
            Some(Marker::BeginSection) => {
                debug!(line = line_no, "begin test section");
                if !in_section {
                    section_line = line_no;
                    section_span = span;
                    in_section = true;
                }
            }
            Some(Marker::EndSection) => {
                debug!(line = line_no, "end test section");
                close_open(open.take(), &mut cases, source, filename)?;
                in_section = false;
            }
            None => {
                if let Some(oc) = open.as_mut() {
                    oc.text.push_str(line);
                    oc.text.push('\n');
                } else if !in_section {
                    shared_axioms.push_str(line);
                    shared_axioms.push('\n');
                }
                // Inside a section but before the first case: disposable.
            }
        }
    }

    if in_section || open.is_some() {
        return Err(TheoryError::UnterminatedTestSection {
            line: section_line,
            span: section_span,
            src: named_source(source, filename),
        });
    }
    if cases.is_empty() {
        return Err(TheoryError::NoTestCases {
            filename: filename.into(),
        });
    }

    Ok(TheoryDocument::new(dialect, shared_axioms, cases))
}

struct OpenCase {
    name: String,
    polarity: Polarity,
    index: usize,
    line: usize,
    span: miette::SourceSpan,
    text: String,
}

fn close_open(
    open: Option<OpenCase>,
    cases: &mut Vec<TestCase>,
    source: &str,
    filename: &str,
) -> Result<(), TheoryError> {
    let Some(oc) = open else {
        return Ok(());
    };
    if oc.text.trim().is_empty() {
        return Err(TheoryError::EmptyTestCase {
            name: oc.name,
            line: oc.line,
            span: oc.span,
            src: named_source(source, filename),
        });
    }
    cases.push(TestCase {
        name: oc.name,
        goal: oc.text,
        polarity: oc.polarity,
        index: oc.index,
        line: oc.line,
    });
    Ok(())
}

fn named_source(source: &str, filename: &str) -> miette::NamedSource<String> {
    miette::NamedSource::new(filename, source.to_owned())
}

#[derive(Debug, PartialEq)]
enum Marker<'a> {
    BeginSection,
    EndSection,
    Case { name: Option<&'a str>, negated: bool },
}

fn classify_marker(line: &str) -> Option<Marker<'_>> {
    let rest = line.trim_start().strip_prefix('%')?;
    if let Some(name) = match_words(rest, &["negated", "test", "case"]) {
        return Some(Marker::Case {
            name: non_empty(name),
            negated: true,
        });
    }
    if let Some(name) = match_words(rest, &["test", "case"]) {
        return Some(Marker::Case {
            name: non_empty(name),
            negated: false,
        });
    }
    if let Some(tail) = match_words(rest, &["test", "runner"]) {
        if starts_with_ci(tail, "begin") {
            return Some(Marker::BeginSection);
        }
        if starts_with_ci(tail, "end") {
            return Some(Marker::EndSection);
        }
    }
    None
}

/// Match a sequence of marker words case-insensitively, each preceded by
/// optional whitespace, and return the remainder after an optional colon.
///
/// The last word must not run straight into more identifier text, so
/// commentary like `% Test cases are listed below` is not markup.
fn match_words<'a>(s: &'a str, words: &[&str]) -> Option<&'a str> {
    let mut rest = s;
    for word in words {
        rest = rest.trim_start();
        let prefix = rest.get(..word.len())?;
        if !prefix.eq_ignore_ascii_case(word) {
            return None;
        }
        rest = &rest[word.len()..];
    }
    if rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    Some(rest.trim())
}

fn starts_with_ci(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(prefix))
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_THEORY: &str = "\
% A tiny theory.
formulas(assumptions).
    p -> q.
end_of_list.

% Test runner: begin tests.

% Test case: q_follows
formulas(goals).
    p -> q.
end_of_list.

% Negated test case: q_is_refuted
formulas(goals).
    p -> -q.
end_of_list.

% Test runner: end tests.
";

    fn parse_small() -> TheoryDocument {
        parse(SMALL_THEORY, "small.in", Dialect::Prover9).expect("small theory should parse")
    }

    // ---------------------------------------------------------------
    // Marker classification
    // ---------------------------------------------------------------

    #[test]
    fn classify_begin_and_end_markers() {
        assert_eq!(
            classify_marker("% Test runner: begin tests."),
            Some(Marker::BeginSection)
        );
        assert_eq!(
            classify_marker("  %  test RUNNER begin"),
            Some(Marker::BeginSection)
        );
        assert_eq!(
            classify_marker("% Test runner: end tests."),
            Some(Marker::EndSection)
        );
    }

    #[test]
    fn classify_case_markers() {
        assert_eq!(
            classify_marker("% Test case: foo_bar"),
            Some(Marker::Case {
                name: Some("foo_bar"),
                negated: false
            })
        );
        assert_eq!(
            classify_marker("% Negated test case: foo_bar"),
            Some(Marker::Case {
                name: Some("foo_bar"),
                negated: true
            })
        );
        // Name and colon are both optional.
        assert_eq!(
            classify_marker("% Test case"),
            Some(Marker::Case {
                name: None,
                negated: false
            })
        );
    }

    #[test]
    fn commentary_is_not_markup() {
        assert_eq!(classify_marker("% Test cases are listed below."), None);
        assert_eq!(classify_marker("% Testing ground"), None);
        assert_eq!(classify_marker("formulas(goals)."), None);
        assert_eq!(classify_marker("% plain comment"), None);
    }

    // ---------------------------------------------------------------
    // Document slicing
    // ---------------------------------------------------------------

    #[test]
    fn slices_shared_axioms_and_cases() {
        let doc = parse_small();
        assert_eq!(doc.dialect, Dialect::Prover9);
        assert!(doc.shared_axioms.contains("p -> q."));
        assert!(!doc.shared_axioms.contains("goals"));
        assert_eq!(doc.test_cases.len(), 2);
        assert_eq!(doc.test_cases[0].name, "q_follows");
        assert_eq!(doc.test_cases[0].polarity, Polarity::Prove);
        assert_eq!(doc.test_cases[1].name, "q_is_refuted");
        assert_eq!(doc.test_cases[1].polarity, Polarity::Refute);
    }

    #[test]
    fn goal_text_is_verbatim() {
        let doc = parse_small();
        assert_eq!(
            doc.test_cases[0].goal,
            "formulas(goals).\n    p -> q.\nend_of_list.\n\n"
        );
    }

    #[test]
    fn shared_axioms_are_verbatim_including_blank_lines() {
        let doc = parse_small();
        assert!(doc
            .shared_axioms
            .starts_with("% A tiny theory.\nformulas(assumptions).\n"));
        // The trailing blank line before the begin marker is shared matter.
        assert!(doc.shared_axioms.ends_with("end_of_list.\n\n"));
    }

    #[test]
    fn case_indices_and_lines_follow_source_order() {
        let doc = parse_small();
        assert_eq!(doc.test_cases[0].index, 1);
        assert_eq!(doc.test_cases[0].line, 8);
        assert_eq!(doc.test_cases[1].index, 2);
        assert_eq!(doc.test_cases[1].line, 13);
    }

    #[test]
    fn unnamed_cases_get_generated_names() {
        let src = "\
axiom.
% Test case:
goal_one.
% Test case
goal_two.
% Test runner: end tests.
";
        let doc = parse(src, "t.in", Dialect::Prover9).unwrap();
        assert_eq!(doc.test_cases[0].name, "Test-1");
        assert_eq!(doc.test_cases[1].name, "Test-2");
    }

    #[test]
    fn matter_between_begin_and_first_case_is_discarded() {
        let src = "\
axiom.
% Test runner: begin tests.
this line is disposable.
% Test case: only
goal.
% Test runner: end tests.
tail matter.
";
        let doc = parse(src, "t.in", Dialect::Prover9).unwrap();
        assert_eq!(doc.shared_axioms, "axiom.\ntail matter.\n");
        assert_eq!(doc.test_cases[0].goal, "goal.\n");
    }

    #[test]
    fn multiple_test_sections_accumulate() {
        let src = "\
axiom one.
% Test case: a
goal a.
% Test runner: end tests.
axiom two.
% Test case: b
goal b.
% Test runner: end tests.
";
        let doc = parse(src, "t.in", Dialect::Prover9).unwrap();
        assert_eq!(doc.shared_axioms, "axiom one.\naxiom two.\n");
        assert_eq!(doc.test_cases.len(), 2);
        assert_eq!(doc.test_cases[1].name, "b");
        assert_eq!(doc.test_cases[1].index, 2);
    }

    // ---------------------------------------------------------------
    // Errors
    // ---------------------------------------------------------------

    #[test]
    fn duplicate_names_are_rejected() {
        let src = "\
axiom.
% Test case: twice
goal one.
% Test case: twice
goal two.
% Test runner: end tests.
";
        let err = parse(src, "t.in", Dialect::Prover9).unwrap_err();
        match err {
            TheoryError::DuplicateTestName { name, line, .. } => {
                assert_eq!(name, "twice");
                assert_eq!(line, 4);
            }
            other => panic!("expected DuplicateTestName, got: {other}"),
        }
    }

    #[test]
    fn empty_goal_is_rejected() {
        let src = "\
axiom.
% Test case: hollow

% Test runner: end tests.
";
        let err = parse(src, "t.in", Dialect::Prover9).unwrap_err();
        match err {
            TheoryError::EmptyTestCase { name, line, .. } => {
                assert_eq!(name, "hollow");
                assert_eq!(line, 2);
            }
            other => panic!("expected EmptyTestCase, got: {other}"),
        }
    }

    #[test]
    fn unterminated_section_is_rejected() {
        let src = "\
axiom.
% Test runner: begin tests.
% Test case: dangling
goal.
";
        let err = parse(src, "t.in", Dialect::Prover9).unwrap_err();
        match err {
            TheoryError::UnterminatedTestSection { line, .. } => assert_eq!(line, 2),
            other => panic!("expected UnterminatedTestSection, got: {other}"),
        }
    }

    #[test]
    fn document_without_tests_is_rejected() {
        let err = parse("just axioms.\n", "bare.in", Dialect::Prover9).unwrap_err();
        match err {
            TheoryError::NoTestCases { filename } => assert_eq!(filename, "bare.in"),
            other => panic!("expected NoTestCases, got: {other}"),
        }
    }

    // ---------------------------------------------------------------
    // Determinism
    // ---------------------------------------------------------------

    #[test]
    fn parsing_is_deterministic() {
        let a = parse(SMALL_THEORY, "small.in", Dialect::Prover9).unwrap();
        let b = parse(SMALL_THEORY, "small.in", Dialect::Prover9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bundled_theories_parse() {
        let p9 = include_str!("../../../theories/naive_consent_theory.in");
        let doc = parse(p9, "naive_consent_theory.in", Dialect::Prover9).unwrap();
        assert_eq!(doc.test_cases.len(), 6);
        assert_eq!(
            doc.test_cases[0].name,
            "asking_and_getting_consent_is_ethical"
        );
        assert_eq!(doc.test_cases[1].polarity, Polarity::Refute);

        let tptp = include_str!("../../../theories/naive_consent_theory.tptp");
        let doc = parse(tptp, "naive_consent_theory.tptp", Dialect::Tptp).unwrap();
        assert_eq!(doc.test_cases.len(), 6);
        assert_eq!(doc.test_cases[5].name, "suicide_is_unethical");
        assert_eq!(doc.test_cases[5].polarity, Polarity::Refute);
    }
}
