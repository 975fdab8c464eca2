//! This module provides the parser for automaton definitions, utilizing the `pest` crate.
//! It defines the grammar for `.nfa` files and functions to parse the input into an `Nfa`.

use crate::{
    analyzer::analyze,
    types::{AutomatonError, Nfa, DEFAULT_NAME, MAX_DEFINITION_SIZE},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Derives a `PestParser` for the automaton grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct AutomatonParser;

/// Parses the given input string into an `Nfa`.
///
/// This is the main entry point for parsing automaton definitions. The parsed automaton
/// is validated before being returned, so the result is always safe to convert.
///
/// # Arguments
///
/// * `input` - A string slice containing the automaton definition.
///
/// # Returns
///
/// * `Ok(Nfa)` if the input is successfully parsed and validated.
/// * `Err(AutomatonError::ParseError)` if there are any syntax errors.
/// * `Err(AutomatonError::ValidationError)` if a required section is missing.
/// * `Err(AutomatonError::MalformedAutomaton)` if the automaton references undeclared states
///   or symbols.
pub fn parse(input: &str) -> Result<Nfa, AutomatonError> {
    if input.len() > MAX_DEFINITION_SIZE {
        return Err(AutomatonError::ValidationError(format!(
            "Definition is {} bytes, at most {} allowed",
            input.len(),
            MAX_DEFINITION_SIZE
        )));
    }

    let root = AutomatonParser::parse(Rule::automaton, input.trim())
        .map_err(|e| AutomatonError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| AutomatonError::ValidationError("Empty definition".to_string()))?;

    let nfa = parse_automaton(root)?;

    analyze(&nfa)?;

    Ok(nfa)
}

/// Parses the top-level sections of a definition from a `Pair<Rule::automaton>`.
fn parse_automaton(pair: Pair<Rule>) -> Result<Nfa, AutomatonError> {
    let mut name: Option<String> = None;
    let mut states: Option<BTreeSet<String>> = None;
    let mut alphabet: Option<BTreeSet<String>> = None;
    let mut start_state: Option<String> = None;
    let mut accepting_states: Option<BTreeSet<String>> = None;
    let mut transitions: Option<Vec<(String, String, Vec<String>)>> = None;
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(parse_text(p)),
            Rule::states => states = Some(parse_idents(p).into_iter().collect()),
            Rule::alphabet => alphabet = Some(parse_idents(p).into_iter().collect()),
            Rule::start => start_state = Some(parse_first_ident(p)?),
            Rule::accepting => accepting_states = Some(parse_idents(p).into_iter().collect()),
            Rule::transitions => transitions = Some(parse_transitions(p)?),
            _ => {} // EOI
        }
    }

    let states = check_required_rule(states, "states")?;
    let start_state = check_required_rule(start_state, "start")?;
    let transitions = transitions.unwrap_or_default();

    // Without an explicit alphabet, every symbol used by a transition is part of it.
    let alphabet = alphabet.unwrap_or_else(|| {
        transitions
            .iter()
            .map(|(_, symbol, _)| symbol.clone())
            .collect()
    });

    let mut relation: BTreeMap<String, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
    for (source, symbol, targets) in transitions {
        relation
            .entry(source)
            .or_default()
            .entry(symbol)
            .or_default()
            .extend(targets);
    }

    Ok(Nfa {
        name: name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        states,
        alphabet,
        start_state,
        accepting_states: accepting_states.unwrap_or_default(),
        transitions: relation,
    })
}

/// Parses the `transitions:` section into `(source, symbol, targets)` lines.
fn parse_transitions(
    pair: Pair<Rule>,
) -> Result<Vec<(String, String, Vec<String>)>, AutomatonError> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::transition)
        .map(parse_transition)
        .collect()
}

/// Parses a single `source -symbol-> target, ...` line from a `Pair<Rule::transition>`.
fn parse_transition(pair: Pair<Rule>) -> Result<(String, String, Vec<String>), AutomatonError> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();

    // Rule: transition > ident ident idents
    let (Some(source), Some(symbol), Some(targets)) = (pairs.next(), pairs.next(), pairs.next())
    else {
        return Err(parse_error("Incomplete transition", span));
    };

    Ok((
        source.as_str().to_string(),
        symbol.as_str().to_string(),
        collect_idents(targets),
    ))
}

/// Parses the compact `<source><symbol><target>` form, e.g. `0a1` or `0a12`.
///
/// The first character names the source state, the second the symbol, and the rest the
/// target state. Whitespace around the entry is ignored.
///
/// # Returns
///
/// * `Ok((source, symbol, target))` for a well-formed entry.
/// * `Err(AutomatonError::ValidationError)` if the entry is shorter than three characters.
pub fn parse_shorthand_transition(
    input: &str,
) -> Result<(String, String, String), AutomatonError> {
    let input = input.trim();
    let mut chars = input.char_indices();

    match (chars.next(), chars.next(), chars.next()) {
        (Some((_, source)), Some((_, symbol)), Some((rest, _))) => Ok((
            source.to_string(),
            symbol.to_string(),
            input[rest..].to_string(),
        )),
        _ => Err(AutomatonError::ValidationError(format!(
            "Invalid transition '{}', expected a form like 0a1",
            input
        ))),
    }
}

/// Creates an `AutomatonError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> AutomatonError {
    AutomatonError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Collects every identifier of a section, in declaration order.
fn parse_idents(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::idents)
        .flat_map(collect_idents)
        .collect()
}

/// Collects the identifiers of a `Pair<Rule::idents>`.
fn collect_idents(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::ident)
        .map(|p| p.as_str().to_string())
        .collect()
}

/// Extracts the single identifier of a section such as `start:`.
fn parse_first_ident(pair: Pair<Rule>) -> Result<String, AutomatonError> {
    let span = pair.as_span();
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::ident)
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| parse_error("Expected a state name", span))
}

/// Extracts the trimmed free text of a section such as `name:`.
fn parse_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Checks if a given section has already been declared.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), AutomatonError> {
    if rule == Rule::EOI {
        return Ok(());
    }

    if !seen.insert(rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks if a required section is present, returning an `Err` if it's missing.
fn check_required_rule<T>(value: Option<T>, name: &str) -> Result<T, AutomatonError> {
    value.ok_or_else(|| AutomatonError::ValidationError(format!("Missing '{name}' section")))
}
