//! This module implements subset construction, turning an [`Nfa`] into an equivalent [`Dfa`]
//! whose states are the sets of NFA states reachable together from the start state.

use crate::analyzer::analyze;
use crate::types::{AutomatonError, Dfa, Nfa, StateSet};
use log::{debug, info};
use std::collections::VecDeque;

/// Converts an NFA into an equivalent DFA.
///
/// Subsets are discovered breadth-first from `{start_state}`. For every subset and every
/// symbol the union of the members' destinations becomes the next subset; an empty union
/// records no transition rather than a dead state. A subset is interned and queued only
/// the first time it is seen, so each one is expanded exactly once and the loop ends after
/// at most `2^|states|` expansions.
///
/// The NFA is assumed to be well formed (see [`analyze`]). Undeclared states reached through
/// transitions are carried along as ordinary subset members.
///
/// # Arguments
///
/// * `nfa` - The automaton to determinize.
///
/// # Returns
///
/// * `Dfa` - A new automaton; the input is left untouched.
pub fn convert(nfa: &Nfa) -> Dfa {
    let mut dfa = Dfa::with_start(
        nfa.name.clone(),
        nfa.alphabet.clone(),
        StateSet::singleton(nfa.start_state.clone()),
    );

    let mut queue = VecDeque::from([dfa.start()]);

    while let Some(current) = queue.pop_front() {
        for symbol in &nfa.alphabet {
            let next: StateSet = dfa
                .subset(current)
                .iter()
                .flat_map(|state| nfa.targets(state, symbol))
                .cloned()
                .collect();

            if next.is_empty() {
                continue;
            }

            let (target, added) = dfa.intern(next);
            if added {
                debug!("Discovered subset {}", dfa.label(target));
                queue.push_back(target);
            }

            debug!(
                "Transition {} --{}--> {}",
                dfa.label(current),
                symbol,
                dfa.label(target)
            );
            dfa.transitions
                .entry(current)
                .or_default()
                .insert(symbol.clone(), target);
        }
    }

    dfa.accepting = dfa
        .states()
        .filter(|(_, subset)| subset.intersects(&nfa.accepting_states))
        .map(|(id, _)| id)
        .collect();

    info!(
        "Converted '{}': {} NFA states -> {} DFA states, {} transitions",
        nfa.name,
        nfa.states.len(),
        dfa.state_count(),
        dfa.transition_count()
    );

    dfa
}

/// Validates `nfa` and converts it.
///
/// # Returns
///
/// * `Ok(Dfa)` if the automaton is well formed.
/// * `Err(AutomatonError::MalformedAutomaton)` if a state or symbol is referenced but not declared.
pub fn try_convert(nfa: &Nfa) -> Result<Dfa, AutomatonError> {
    analyze(nfa)?;

    Ok(convert(nfa))
}
