//! This module defines the core data structures and types used throughout the converter,
//! including the NFA and DFA representations, state subsets, validation limits, and error types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The name given to automata that do not declare one.
pub const DEFAULT_NAME: &str = "Untitled";
/// The maximum allowed size for an automaton definition in bytes.
pub const MAX_DEFINITION_SIZE: usize = 65536; // 64KB

/// Represents a Nondeterministic Finite Automaton.
///
/// The transition relation maps a source state and a symbol to any number of destination
/// states. The automaton is built once from input and is read-only during conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Nfa {
    /// A human-readable name, used for catalog lookups and diagnostics.
    #[serde(default = "default_name")]
    pub name: String,
    /// Every declared state.
    pub states: BTreeSet<String>,
    /// The input symbols of the automaton.
    #[serde(default)]
    pub alphabet: BTreeSet<String>,
    /// The single start state.
    pub start_state: String,
    /// States in which a run accepts.
    #[serde(default)]
    pub accepting_states: BTreeSet<String>,
    /// Source state -> symbol -> destination states.
    #[serde(default)]
    pub transitions: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl Nfa {
    /// Creates an NFA with the given start state and no transitions.
    ///
    /// The start state is declared as a state of the automaton.
    pub fn new(start_state: impl Into<String>) -> Self {
        let start_state = start_state.into();

        Self {
            name: default_name(),
            states: BTreeSet::from([start_state.clone()]),
            start_state,
            ..Default::default()
        }
    }

    /// Declares a state.
    pub fn add_state(&mut self, state: impl Into<String>) {
        self.states.insert(state.into());
    }

    /// Declares a state and marks it as accepting.
    pub fn add_accepting_state(&mut self, state: impl Into<String>) {
        let state = state.into();
        self.states.insert(state.clone());
        self.accepting_states.insert(state);
    }

    /// Adds `source --symbol--> target` to the transition relation.
    ///
    /// The symbol joins the alphabet. States are not declared implicitly, so a transition
    /// to an unknown state is reported by the analyzer.
    pub fn add_transition(
        &mut self,
        source: impl Into<String>,
        symbol: impl Into<String>,
        target: impl Into<String>,
    ) {
        let symbol = symbol.into();
        self.alphabet.insert(symbol.clone());
        self.transitions
            .entry(source.into())
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(target.into());
    }

    /// Returns the destinations of `state` on `symbol`, empty when there are none.
    pub fn targets<'a>(&'a self, state: &str, symbol: &str) -> impl Iterator<Item = &'a String> {
        self.transitions
            .get(state)
            .and_then(|by_symbol| by_symbol.get(symbol))
            .into_iter()
            .flatten()
    }

    /// Iterates over every `(source, symbol, target)` triple of the transition relation.
    pub fn triples(&self) -> impl Iterator<Item = (&String, &String, &String)> {
        self.transitions.iter().flat_map(|(source, by_symbol)| {
            by_symbol.iter().flat_map(move |(symbol, targets)| {
                targets.iter().map(move |target| (source, symbol, target))
            })
        })
    }

    /// Returns the number of `(source, symbol, target)` triples.
    pub fn transition_count(&self) -> usize {
        self.triples().count()
    }

    /// Checks whether `state` is accepting.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting_states.contains(state)
    }
}

/// A set of NFA states, the identity of a DFA state.
///
/// Two subsets are equal iff they contain the same members, whatever the order in which
/// they were built. Members are kept sorted, which makes the rendering canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateSet(BTreeSet<String>);

impl StateSet {
    /// Creates the singleton subset `{state}`.
    pub fn singleton(state: impl Into<String>) -> Self {
        Self(BTreeSet::from([state.into()]))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, state: &str) -> bool {
        self.0.contains(state)
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Checks whether any member belongs to `states`.
    pub fn intersects(&self, states: &BTreeSet<String>) -> bool {
        !self.0.is_disjoint(states)
    }

    /// Renders the subset as `{a,b,c}` with members sorted lexicographically.
    pub fn label(&self) -> String {
        format!(
            "{{{}}}",
            self.0.iter().map(String::as_str).collect::<Vec<_>>().join(",")
        )
    }
}

impl FromIterator<String> for StateSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for StateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Index of a state inside a [`Dfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

/// Represents a Deterministic Finite Automaton produced by subset construction.
///
/// States are interned once in an arena and referred to by [`StateId`]. The transition
/// function is partial: a missing entry means there is no move for that symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) name: String,
    pub(crate) alphabet: BTreeSet<String>,
    pub(crate) states: Vec<StateSet>,
    pub(crate) index: BTreeMap<StateSet, StateId>,
    pub(crate) start: StateId,
    pub(crate) accepting: BTreeSet<StateId>,
    pub(crate) transitions: BTreeMap<StateId, BTreeMap<String, StateId>>,
}

impl Dfa {
    /// Creates a DFA holding only its start subset.
    pub(crate) fn with_start(name: String, alphabet: BTreeSet<String>, start: StateSet) -> Self {
        let mut dfa = Self {
            name,
            alphabet,
            states: Vec::new(),
            index: BTreeMap::new(),
            start: StateId(0),
            accepting: BTreeSet::new(),
            transitions: BTreeMap::new(),
        };
        dfa.start = dfa.intern(start).0;
        dfa
    }

    /// Interns `subset`, returning its id and whether it was newly added.
    pub(crate) fn intern(&mut self, subset: StateSet) -> (StateId, bool) {
        if let Some(&id) = self.index.get(&subset) {
            return (id, false);
        }

        let id = StateId(self.states.len());
        self.states.push(subset.clone());
        self.index.insert(subset, id);
        (id, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alphabet, copied unchanged from the source NFA.
    pub fn alphabet(&self) -> &BTreeSet<String> {
        &self.alphabet
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    /// Returns the number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Iterates over states in discovery order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &StateSet)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, subset)| (StateId(i), subset))
    }

    /// Returns the subset behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this DFA.
    pub fn subset(&self, id: StateId) -> &StateSet {
        &self.states[id.0]
    }

    /// Looks up the state whose identity is `subset`.
    pub fn find(&self, subset: &StateSet) -> Option<StateId> {
        self.index.get(subset).copied()
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting.contains(&id)
    }

    /// Iterates over accepting states in ascending id order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter().copied()
    }

    /// Returns the destination of `id` on `symbol`, if a move exists.
    pub fn next(&self, id: StateId, symbol: &str) -> Option<StateId> {
        self.transitions
            .get(&id)
            .and_then(|by_symbol| by_symbol.get(symbol))
            .copied()
    }

    /// Iterates over every `(source, symbol, target)` entry of the transition function.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, &String, StateId)> {
        self.transitions.iter().flat_map(|(&source, by_symbol)| {
            by_symbol
                .iter()
                .map(move |(symbol, &target)| (source, symbol, target))
        })
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(BTreeMap::len).sum()
    }

    /// Renders the state `id` canonically.
    pub fn label(&self, id: StateId) -> String {
        self.subset(id).label()
    }
}

/// Optional caps enforced at the input boundary.
///
/// These are policy for the collaborator that accepts automata, not properties of the
/// conversion itself. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_states: Option<usize>,
    pub max_symbols: Option<usize>,
    pub max_transitions: Option<usize>,
}

impl Limits {
    /// The caps used by the classroom converter: 4 states, 3 symbols, 8 transitions.
    pub const CLASSIC: Limits = Limits {
        max_states: Some(4),
        max_symbols: Some(3),
        max_transitions: Some(8),
    };
}

/// Represents various errors that can occur while building, validating, or exporting automata.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// A state or symbol is referenced but not declared.
    #[error("Malformed automaton: {0}")]
    MalformedAutomaton(String),
    /// A boundary cap (see [`Limits`]) was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// Indicates an error during the parsing of an automaton definition.
    #[error("Automaton parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a structural problem in an automaton definition, such as a missing section.
    #[error("Automaton validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates a JSON encoding or decoding failure.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AutomatonError {
    fn from(error: serde_json::Error) -> Self {
        AutomatonError::SerializationError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_sorted() {
        let forward: StateSet = ["q0", "q1", "q2"].into_iter().collect();
        let backward: StateSet = ["q2", "q1", "q0"].into_iter().collect();

        assert_eq!(forward, backward);
        assert_eq!(forward.label(), "{q0,q1,q2}");
        assert_eq!(forward.label(), backward.label());
    }

    #[test]
    fn test_singleton_label() {
        assert_eq!(StateSet::singleton("0").label(), "{0}");
        assert_eq!(StateSet::singleton("0").to_string(), "{0}");
    }

    #[test]
    fn test_intersects() {
        let subset: StateSet = ["1", "2"].into_iter().collect();
        let accepting = BTreeSet::from(["1".to_string()]);
        let other = BTreeSet::from(["0".to_string()]);

        assert!(subset.intersects(&accepting));
        assert!(!subset.intersects(&other));
        assert!(!StateSet::default().intersects(&accepting));
    }

    #[test]
    fn test_nfa_builder() {
        let mut nfa = Nfa::new("0");
        nfa.add_accepting_state("1");
        nfa.add_transition("0", "a", "1");
        nfa.add_transition("0", "a", "0");

        assert_eq!(nfa.states.len(), 2);
        assert_eq!(nfa.alphabet, BTreeSet::from(["a".to_string()]));
        assert_eq!(nfa.targets("0", "a").count(), 2);
        assert_eq!(nfa.targets("1", "a").count(), 0);
        assert_eq!(nfa.transition_count(), 2);
        assert!(nfa.is_accepting("1"));
        assert!(!nfa.is_accepting("0"));
    }

    #[test]
    fn test_intern_deduplicates() {
        let mut dfa = Dfa::with_start(
            DEFAULT_NAME.to_string(),
            BTreeSet::new(),
            StateSet::singleton("0"),
        );

        let (id, added) = dfa.intern(["1", "2"].into_iter().collect());
        assert!(added);
        let (again, added) = dfa.intern(["2", "1"].into_iter().collect());
        assert!(!added);
        assert_eq!(id, again);
        assert_eq!(dfa.state_count(), 2);
        assert_eq!(dfa.start(), StateId(0));
    }

    #[test]
    fn test_nfa_json_defaults() {
        let nfa: Nfa =
            serde_json::from_str(r#"{"states": ["0"], "start_state": "0"}"#).unwrap();

        assert_eq!(nfa.name, DEFAULT_NAME);
        assert!(nfa.alphabet.is_empty());
        assert!(nfa.transitions.is_empty());
    }

    #[test]
    fn test_error_display() {
        let error = AutomatonError::MalformedAutomaton("start state 'x' is not declared".into());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Malformed automaton"));
        assert!(error_msg.contains("'x'"));
    }
}
