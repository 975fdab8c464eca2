//! This module defines runners that feed words to automata one symbol at a time. The
//! `NfaRunner` tracks every state a nondeterministic run may be in, while the `DfaRunner`
//! follows the single path of a converted automaton.

use crate::types::{Dfa, Nfa, StateId, StateSet};

/// Represents the outcome of feeding one symbol to a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The symbol was consumed and the run can continue.
    Continue,
    /// No transition exists for the symbol from the current state(s). The run rejects
    /// whatever follows.
    Stuck,
}

/// Simulates an NFA by tracking the set of states it may be in.
pub struct NfaRunner<'a> {
    nfa: &'a Nfa,
    current: StateSet,
    step_count: usize,
}

impl<'a> NfaRunner<'a> {
    /// Creates a runner positioned at the start state.
    pub fn new(nfa: &'a Nfa) -> Self {
        Self {
            nfa,
            current: StateSet::singleton(nfa.start_state.clone()),
            step_count: 0,
        }
    }

    /// Moves every current state along `symbol`.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if at least one state has a move.
    /// * `Step::Stuck` if no run survives the symbol.
    pub fn step(&mut self, symbol: &str) -> Step {
        if self.current.is_empty() {
            return Step::Stuck;
        }

        self.current = self
            .current
            .iter()
            .flat_map(|state| self.nfa.targets(state, symbol))
            .cloned()
            .collect();
        self.step_count += 1;

        if self.current.is_empty() {
            Step::Stuck
        } else {
            Step::Continue
        }
    }

    /// Returns the states the automaton may currently be in.
    pub fn current(&self) -> &StateSet {
        &self.current
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Checks whether some run currently sits in an accepting state.
    pub fn is_accepting(&self) -> bool {
        self.current.intersects(&self.nfa.accepting_states)
    }

    /// Returns the runner to the start state.
    pub fn reset(&mut self) {
        self.current = StateSet::singleton(self.nfa.start_state.clone());
        self.step_count = 0;
    }

    /// Runs `word` from the start state and reports acceptance.
    pub fn accepts<S: AsRef<str>>(&mut self, word: &[S]) -> bool {
        self.reset();
        run(word, |symbol| self.step(symbol)) && self.is_accepting()
    }
}

/// Simulates a DFA along its unique path.
pub struct DfaRunner<'a> {
    dfa: &'a Dfa,
    current: Option<StateId>,
    step_count: usize,
}

impl<'a> DfaRunner<'a> {
    /// Creates a runner positioned at the start state.
    pub fn new(dfa: &'a Dfa) -> Self {
        Self {
            dfa,
            current: Some(dfa.start()),
            step_count: 0,
        }
    }

    /// Follows the transition for `symbol`.
    ///
    /// A missing transition rejects the word: the runner is stuck and stays stuck until reset.
    pub fn step(&mut self, symbol: &str) -> Step {
        let Some(state) = self.current else {
            return Step::Stuck;
        };

        self.current = self.dfa.next(state, symbol);
        self.step_count += 1;

        match self.current {
            Some(_) => Step::Continue,
            None => Step::Stuck,
        }
    }

    /// Returns the current state, or `None` once the run is stuck.
    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_accepting(&self) -> bool {
        self.current.is_some_and(|state| self.dfa.is_accepting(state))
    }

    pub fn reset(&mut self) {
        self.current = Some(self.dfa.start());
        self.step_count = 0;
    }

    /// Runs `word` from the start state and reports acceptance.
    pub fn accepts<S: AsRef<str>>(&mut self, word: &[S]) -> bool {
        self.reset();
        run(word, |symbol| self.step(symbol)) && self.is_accepting()
    }
}

/// Feeds `word` to `step`, returning `false` as soon as the run is stuck.
fn run<S: AsRef<str>>(word: &[S], mut step: impl FnMut(&str) -> Step) -> bool {
    word.iter()
        .all(|symbol| step(symbol.as_ref()) == Step::Continue)
}

/// Splits a word into symbols.
///
/// Words containing commas or whitespace are split on them, which allows multi-character
/// symbols. Otherwise every character is one symbol, so `"aab"` is `["a", "a", "b"]`.
pub fn split_word(input: &str) -> Vec<String> {
    if input.contains(|c: char| c == ',' || c.is_whitespace()) {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|symbol| !symbol.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        input.chars().map(|c| c.to_string()).collect()
    }
}
