//! Per-test proof obligation assembly.

use thiserror::Error;

use sequent_theory::{Dialect, TestCase, TheoryDocument};

/// A single self-contained prover input, built fresh for one test.
///
/// Tests must not influence each other, so every invocation owns its
/// own copy of the axiom text and is discarded after the run; nothing
/// is cached across tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ProverInvocation {
    pub dialect: Dialect,
    pub test_name: String,
    /// Shared axioms followed by the goal block, byte-identical to the
    /// source file.
    pub input: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error(
        "goal of test case `{test}` uses the unbound variable `{variable}`; \
         refusing to quantify it implicitly"
    )]
    UnboundVariable { test: String, variable: String },
}

/// Build the obligation for one test case.
///
/// The document text already carries its dialect scaffolding (Prover 9
/// `formulas(goals)` blocks, TPTP `fof` forms), so assembly is
/// concatenation plus validation. For the TPTP dialect the goal is
/// checked for free variables: closing them silently would change the
/// meaning of the test, so they are surfaced as an error instead.
/// Prover 9's Prolog-style variables are implicitly quantified by the
/// prover itself and need no check.
pub fn assemble(doc: &TheoryDocument, case: &TestCase) -> Result<ProverInvocation, AssemblyError> {
    if doc.dialect == Dialect::Tptp {
        if let Some(variable) = first_unbound_variable(&case.goal) {
            return Err(AssemblyError::UnboundVariable {
                test: case.name.clone(),
                variable,
            });
        }
    }
    let mut input = String::with_capacity(doc.shared_axioms.len() + case.goal.len());
    input.push_str(&doc.shared_axioms);
    input.push_str(&case.goal);
    Ok(ProverInvocation {
        dialect: doc.dialect,
        test_name: case.name.clone(),
        input,
    })
}

/// First TPTP variable used outside any binder list, or `None`.
///
/// TPTP variables start with an uppercase letter or underscore; binder
/// lists are the only bracketed regions in input formulas. The check is
/// deliberately scope-insensitive: a variable bound anywhere in the
/// goal is accepted, which errs toward permitting and still catches
/// the dangerous case of a goal with no binder at all.
fn first_unbound_variable(goal: &str) -> Option<String> {
    let mut bound: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut used: Vec<String> = Vec::new();
    let mut bracket_depth = 0usize;
    let mut chars = goal.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '%' => {
                for n in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            '\'' | '"' => {
                let quote = c;
                while let Some(n) = chars.next() {
                    if n == '\\' {
                        chars.next();
                    } else if n == quote {
                        break;
                    }
                }
            }
            '[' => bracket_depth += 1,
            ']' => bracket_depth = bracket_depth.saturating_sub(1),
            c if c.is_ascii_uppercase() || c == '_' => {
                let mut name = String::from(c);
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if bracket_depth > 0 {
                    bound.insert(name);
                } else {
                    used.push(name);
                }
            }
            c if c.is_ascii_alphanumeric() => {
                // Atom or number: swallow the rest of the token so a
                // trailing uppercase run is not mistaken for a variable.
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    used.into_iter().find(|v| !bound.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequent_theory::parse;

    const P9_THEORY: &str = "\
set(prolog_style_variables).
formulas(assumptions).
    ethical(A,B,X) <-> (asked(A,B,X) & consented(B,A,X)).
end_of_list.
% Test case: consent_case
formulas(goals).
    asked(alex,bo,act) & consented(bo,alex,act) -> ethical(alex,bo,act).
end_of_list.
% Test runner: end tests.
";

    #[test]
    fn obligation_is_byte_identical_concatenation() {
        let doc = parse(P9_THEORY, "t.in", Dialect::Prover9).unwrap();
        let inv = assemble(&doc, &doc.test_cases[0]).unwrap();
        let expected = format!("{}{}", doc.shared_axioms, doc.test_cases[0].goal);
        assert_eq!(inv.input, expected);
        assert_eq!(inv.test_name, "consent_case");
        assert_eq!(inv.dialect, Dialect::Prover9);
    }

    #[test]
    fn assembly_is_deterministic() {
        let doc = parse(P9_THEORY, "t.in", Dialect::Prover9).unwrap();
        let a = assemble(&doc, &doc.test_cases[0]).unwrap();
        let b = assemble(&doc, &doc.test_cases[0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn prover9_goals_with_free_variables_are_accepted() {
        // Prolog-style variables are quantified by the prover itself.
        let src = "\
axiom.
% Test case: open_goal
formulas(goals).
    p(X) -> q(X).
end_of_list.
% Test runner: end tests.
";
        let doc = parse(src, "t.in", Dialect::Prover9).unwrap();
        assert!(assemble(&doc, &doc.test_cases[0]).is_ok());
    }

    #[test]
    fn tptp_goal_with_unbound_variable_is_rejected() {
        let src = "\
fof(ax, axiom, p).
% Test case: open_goal
fof(open_goal, conjecture, (p(X) => q(X))).
% Test runner: end tests.
";
        let doc = parse(src, "t.tptp", Dialect::Tptp).unwrap();
        let err = assemble(&doc, &doc.test_cases[0]).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::UnboundVariable {
                test: "open_goal".into(),
                variable: "X".into()
            }
        );
    }

    #[test]
    fn tptp_goal_with_quantified_variables_is_accepted() {
        let src = "\
fof(ax, axiom, p).
% Test case: closed_goal
fof(closed_goal, conjecture, ! [X,Y] : (p(X,Y) => q(Y,X))).
% Test runner: end tests.
";
        let doc = parse(src, "t.tptp", Dialect::Tptp).unwrap();
        assert!(assemble(&doc, &doc.test_cases[0]).is_ok());
    }

    #[test]
    fn ground_tptp_goal_needs_no_binder() {
        let src = "\
fof(ax, axiom, p).
% Test case: ground
fof(ground, conjecture, (asked(alex,bo,act) => ethical(alex,bo,act))).
% Test runner: end tests.
";
        let doc = parse(src, "t.tptp", Dialect::Tptp).unwrap();
        assert!(assemble(&doc, &doc.test_cases[0]).is_ok());
    }

    // ---------------------------------------------------------------
    // Free-variable scanner details
    // ---------------------------------------------------------------

    #[test]
    fn scanner_ignores_quoted_atoms_and_comments() {
        assert_eq!(first_unbound_variable("p('Not A Var', \"Nor This\")"), None);
        assert_eq!(first_unbound_variable("p(a) % X in a comment\n"), None);
        assert_eq!(first_unbound_variable("p('escaped \\' Quote')"), None);
    }

    #[test]
    fn scanner_does_not_split_atoms_with_interior_capitals() {
        assert_eq!(first_unbound_variable("p(someAtom, aXb)"), None);
    }

    #[test]
    fn scanner_reports_the_first_unbound_variable() {
        assert_eq!(
            first_unbound_variable("! [X] : p(X, Y)"),
            Some("Y".to_string())
        );
        assert_eq!(first_unbound_variable("p(_Anon)"), Some("_Anon".to_string()));
    }
}
