//! This module provides functions for analyzing automata before conversion. It detects
//! references to undeclared states or symbols, rejects state names that would make two
//! subset labels collide, and enforces the optional input caps.

use crate::types::{AutomatonError, Limits, Nfa};
use std::collections::BTreeSet;

/// Represents various errors that can be found during the analysis of an automaton.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The start state is not among the declared states.
    UndefinedStartState(String),
    /// Transitions reference states that are not declared, formatted as `src --sym--> dst`.
    UndefinedStates(Vec<String>),
    /// Transitions use symbols that are not in the alphabet.
    UndefinedSymbols(Vec<String>),
    /// Accepting states that are not declared.
    UndefinedAcceptingStates(Vec<String>),
    /// State names that are empty or contain `,`, `{`, `}` or whitespace.
    InvalidStateNames(Vec<String>),
    /// More states than allowed, with the observed count and the cap.
    TooManyStates(usize, usize),
    /// More symbols than allowed.
    TooManySymbols(usize, usize),
    /// More transitions than allowed.
    TooManyTransitions(usize, usize),
}

impl From<AnalysisError> for AutomatonError {
    /// Converts an `AnalysisError` into `MalformedAutomaton` or `LimitExceeded`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::UndefinedStartState(state) => AutomatonError::MalformedAutomaton(
                format!("Start state '{}' is not declared", state),
            ),
            AnalysisError::UndefinedStates(transitions) => AutomatonError::MalformedAutomaton(
                format!("Transitions reference undeclared states: {:?}", transitions),
            ),
            AnalysisError::UndefinedSymbols(symbols) => AutomatonError::MalformedAutomaton(
                format!("Transitions use symbols outside the alphabet: {:?}", symbols),
            ),
            AnalysisError::UndefinedAcceptingStates(states) => AutomatonError::MalformedAutomaton(
                format!("Accepting states are not declared: {:?}", states),
            ),
            AnalysisError::InvalidStateNames(states) => AutomatonError::MalformedAutomaton(
                format!("State names cannot be used in subset labels: {:?}", states),
            ),
            AnalysisError::TooManyStates(count, max) => AutomatonError::LimitExceeded(format!(
                "{} states declared, at most {} allowed",
                count, max
            )),
            AnalysisError::TooManySymbols(count, max) => AutomatonError::LimitExceeded(format!(
                "{} symbols in the alphabet, at most {} allowed",
                count, max
            )),
            AnalysisError::TooManyTransitions(count, max) => AutomatonError::LimitExceeded(
                format!("{} transitions defined, at most {} allowed", count, max),
            ),
        }
    }
}

/// Analyzes an NFA for references to undeclared states or symbols.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(AutomatonError::MalformedAutomaton)` describing the first failing check.
pub fn analyze(nfa: &Nfa) -> Result<(), AutomatonError> {
    analyze_with_limits(nfa, &Limits::default())
}

/// Analyzes an NFA and additionally enforces `limits`.
///
/// Structural checks run first, so a malformed automaton is reported as such even when it
/// also exceeds a cap.
pub fn analyze_with_limits(nfa: &Nfa, limits: &Limits) -> Result<(), AutomatonError> {
    let checks: [fn(&Nfa) -> Result<(), AnalysisError>; 5] = [
        check_state_names,
        check_start_state,
        check_transition_states,
        check_transition_symbols,
        check_accepting_states,
    ];

    checks
        .iter()
        .map(|check| check(nfa))
        .chain(std::iter::once(check_limits(nfa, limits)))
        .find_map(Result::err)
        .map_or(Ok(()), |error| Err(error.into()))
}

/// Checks that every declared state name can appear inside a subset label.
///
/// Labels join members with `,` inside braces, so a name carrying any of those characters
/// could render two different subsets identically.
fn check_state_names(nfa: &Nfa) -> Result<(), AnalysisError> {
    let invalid: Vec<String> = nfa
        .states
        .iter()
        .filter(|state| {
            state.is_empty()
                || state
                    .chars()
                    .any(|c| matches!(c, ',' | '{' | '}') || c.is_whitespace())
        })
        .cloned()
        .collect();

    if !invalid.is_empty() {
        return Err(AnalysisError::InvalidStateNames(invalid));
    }

    Ok(())
}

/// Checks that the start state is declared.
fn check_start_state(nfa: &Nfa) -> Result<(), AnalysisError> {
    if !nfa.states.contains(&nfa.start_state) {
        return Err(AnalysisError::UndefinedStartState(nfa.start_state.clone()));
    }

    Ok(())
}

/// Checks that every transition source and destination is declared.
fn check_transition_states(nfa: &Nfa) -> Result<(), AnalysisError> {
    let undefined: Vec<String> = nfa
        .triples()
        .filter(|(source, _, target)| {
            !nfa.states.contains(*source) || !nfa.states.contains(*target)
        })
        .map(|(source, symbol, target)| format!("{} --{}--> {}", source, symbol, target))
        .collect();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

/// Checks that every transition symbol belongs to the alphabet.
fn check_transition_symbols(nfa: &Nfa) -> Result<(), AnalysisError> {
    let undefined: BTreeSet<String> = nfa
        .triples()
        .map(|(_, symbol, _)| symbol)
        .filter(|symbol| !nfa.alphabet.contains(*symbol))
        .cloned()
        .collect();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedSymbols(undefined.into_iter().collect()));
    }

    Ok(())
}

/// Checks that every accepting state is declared.
fn check_accepting_states(nfa: &Nfa) -> Result<(), AnalysisError> {
    let undefined: Vec<String> = nfa
        .accepting_states
        .difference(&nfa.states)
        .cloned()
        .collect();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedAcceptingStates(undefined));
    }

    Ok(())
}

/// Checks the state, symbol and transition counts against `limits`.
fn check_limits(nfa: &Nfa, limits: &Limits) -> Result<(), AnalysisError> {
    let exceeds = |count: usize, max: Option<usize>| max.filter(|&max| count > max);

    if let Some(max) = exceeds(nfa.states.len(), limits.max_states) {
        return Err(AnalysisError::TooManyStates(nfa.states.len(), max));
    }

    if let Some(max) = exceeds(nfa.alphabet.len(), limits.max_symbols) {
        return Err(AnalysisError::TooManySymbols(nfa.alphabet.len(), max));
    }

    let transitions = nfa.transition_count();
    if let Some(max) = exceeds(transitions, limits.max_transitions) {
        return Err(AnalysisError::TooManyTransitions(transitions, max));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_nfa() -> Nfa {
        let mut nfa = Nfa::new("0");
        nfa.add_state("1");
        nfa.add_accepting_state("2");
        nfa.add_transition("0", "a", "1");
        nfa.add_transition("1", "b", "2");
        nfa
    }

    #[test]
    fn test_valid_nfa() {
        assert!(analyze(&create_test_nfa()).is_ok());
    }

    #[test]
    fn test_undefined_start_state() {
        let mut nfa = create_test_nfa();
        nfa.start_state = "9".to_string();

        assert_eq!(
            check_start_state(&nfa),
            Err(AnalysisError::UndefinedStartState("9".to_string()))
        );
    }

    #[test]
    fn test_undefined_transition_states() {
        let mut nfa = create_test_nfa();
        nfa.add_transition("2", "a", "ghost");
        nfa.add_transition("phantom", "b", "0");

        match check_transition_states(&nfa) {
            Err(AnalysisError::UndefinedStates(transitions)) => {
                assert_eq!(transitions.len(), 2);
                assert!(transitions.contains(&"2 --a--> ghost".to_string()));
                assert!(transitions.contains(&"phantom --b--> 0".to_string()));
            }
            other => panic!("Expected UndefinedStates error, got {:?}", other),
        }
    }

    #[test]
    fn test_undefined_symbols() {
        let mut nfa = create_test_nfa();
        nfa.add_transition("0", "c", "1");
        nfa.alphabet.remove("c");

        assert_eq!(
            check_transition_symbols(&nfa),
            Err(AnalysisError::UndefinedSymbols(vec!["c".to_string()]))
        );
    }

    #[test]
    fn test_undefined_accepting_states() {
        let mut nfa = create_test_nfa();
        nfa.accepting_states.insert("7".to_string());

        assert_eq!(
            check_accepting_states(&nfa),
            Err(AnalysisError::UndefinedAcceptingStates(vec![
                "7".to_string()
            ]))
        );
    }

    #[test]
    fn test_invalid_state_names() {
        let mut nfa = create_test_nfa();
        nfa.add_state("a,b");
        nfa.add_state("{x}");
        nfa.add_state("two words");
        nfa.add_state("");

        match check_state_names(&nfa) {
            Err(AnalysisError::InvalidStateNames(states)) => {
                assert_eq!(states.len(), 4);
                assert!(states.contains(&"a,b".to_string()));
                assert!(states.contains(&"{x}".to_string()));
                assert!(states.contains(&"two words".to_string()));
                assert!(states.contains(&String::new()));
            }
            other => panic!("Expected InvalidStateNames error, got {:?}", other),
        }

        assert!(matches!(
            analyze(&nfa),
            Err(AutomatonError::MalformedAutomaton(_))
        ));
    }

    #[test]
    fn test_plain_state_names_pass() {
        let mut nfa = create_test_nfa();
        nfa.add_state("q_10");
        nfa.add_state("Start");

        assert_eq!(check_state_names(&nfa), Ok(()));
    }

    #[test]
    fn test_analysis_error_conversion() {
        let error: AutomatonError = AnalysisError::UndefinedStartState("q9".to_string()).into();
        match error {
            AutomatonError::MalformedAutomaton(msg) => {
                assert!(msg.contains("Start state 'q9' is not declared"));
            }
            _ => panic!("Expected MalformedAutomaton"),
        }

        let error: AutomatonError = AnalysisError::TooManyStates(5, 4).into();
        assert!(matches!(error, AutomatonError::LimitExceeded(_)));
        assert!(error.to_string().contains("5 states declared, at most 4 allowed"));
    }

    #[test]
    fn test_unlimited_by_default() {
        let mut nfa = create_test_nfa();
        for i in 3..20 {
            nfa.add_state(i.to_string());
            nfa.add_transition("0", format!("s{}", i), i.to_string());
        }

        assert!(analyze(&nfa).is_ok());
    }

    #[test]
    fn test_classic_state_limit() {
        let mut nfa = create_test_nfa();
        nfa.add_state("3");
        assert!(analyze_with_limits(&nfa, &Limits::CLASSIC).is_ok());

        nfa.add_state("4");
        let result = analyze_with_limits(&nfa, &Limits::CLASSIC);
        assert!(matches!(result, Err(AutomatonError::LimitExceeded(_))));
    }

    #[test]
    fn test_classic_symbol_limit() {
        let mut nfa = create_test_nfa();
        nfa.add_transition("0", "c", "0");
        assert!(analyze_with_limits(&nfa, &Limits::CLASSIC).is_ok());

        nfa.add_transition("0", "d", "0");
        assert_eq!(
            check_limits(&nfa, &Limits::CLASSIC),
            Err(AnalysisError::TooManySymbols(4, 3))
        );
    }

    #[test]
    fn test_transition_limit_counts_each_destination() {
        let mut nfa = create_test_nfa();
        nfa.add_transition("0", "a", "0");
        nfa.add_transition("0", "a", "2");

        let limits = Limits {
            max_transitions: Some(3),
            ..Limits::default()
        };

        assert_eq!(
            check_limits(&nfa, &limits),
            Err(AnalysisError::TooManyTransitions(4, 3))
        );
    }

    #[test]
    fn test_structural_errors_win_over_limits() {
        let mut nfa = create_test_nfa();
        nfa.start_state = "missing".to_string();
        for i in 3..10 {
            nfa.add_state(i.to_string());
        }

        let result = analyze_with_limits(&nfa, &Limits::CLASSIC);
        assert!(matches!(result, Err(AutomatonError::MalformedAutomaton(_))));
    }
}
