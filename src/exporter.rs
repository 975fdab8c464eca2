//! This module renders automata as Graphviz `digraph` descriptions and as JSON tables.

use crate::types::{AutomatonError, Dfa, Nfa};
use serde::{Deserialize, Serialize};

/// Renders a DFA as a Graphviz `digraph`.
///
/// The start state is marked by an edge from an invisible anonymous node. Accepting states
/// are drawn as double circles. Every state label is the canonical subset rendering, so the
/// same subset always yields the same node.
///
/// # Example
///
/// ```text
/// digraph DFA {
///   rankdir=LR;
///   "" [shape=none];
///   "" -> "{0}";
///
///   "{0}" [shape=circle];
///   "{1}" [shape=doublecircle];
///
///   "{0}" -> "{1}" [label="a"];
/// }
/// ```
pub fn export(dfa: &Dfa) -> String {
    let nodes = dfa
        .states()
        .map(|(id, subset)| (subset.label(), dfa.is_accepting(id)));
    let edges = dfa
        .transitions()
        .map(|(from, symbol, to)| (dfa.label(from), symbol.clone(), dfa.label(to)));

    render("DFA", &dfa.label(dfa.start()), nodes, edges)
}

/// Renders an NFA as a Graphviz `digraph`, one edge per destination.
pub fn export_nfa(nfa: &Nfa) -> String {
    let nodes = nfa
        .states
        .iter()
        .map(|state| (state.clone(), nfa.is_accepting(state)));
    let edges = nfa
        .triples()
        .map(|(from, symbol, to)| (from.clone(), symbol.clone(), to.clone()));

    render("NFA", &nfa.start_state, nodes, edges)
}

fn render(
    graph: &str,
    start: &str,
    nodes: impl Iterator<Item = (String, bool)>,
    edges: impl Iterator<Item = (String, String, String)>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("digraph {} {{\n", graph));
    out.push_str("  rankdir=LR;\n");
    out.push_str("  \"\" [shape=none];\n");
    out.push_str(&format!("  \"\" -> \"{}\";\n", escape(start)));
    out.push('\n');

    for (label, accepting) in nodes {
        let shape = if accepting { "doublecircle" } else { "circle" };
        out.push_str(&format!("  \"{}\" [shape={}];\n", escape(&label), shape));
    }

    out.push('\n');

    for (from, symbol, to) in edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
            escape(&from),
            escape(&to),
            escape(&symbol)
        ));
    }

    out.push_str("}\n");
    out
}

/// Escapes a label for use inside a double-quoted DOT identifier.
fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A serializable view of a DFA, keyed by canonical labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaTable {
    pub name: String,
    pub alphabet: Vec<String>,
    pub start: String,
    pub states: Vec<StateRecord>,
    pub transitions: Vec<TransitionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub label: String,
    /// The NFA states making up this DFA state, sorted.
    pub members: Vec<String>,
    pub start: bool,
    pub accepting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: String,
    pub symbol: String,
    pub to: String,
}

impl From<&Dfa> for DfaTable {
    fn from(dfa: &Dfa) -> Self {
        DfaTable {
            name: dfa.name().to_string(),
            alphabet: dfa.alphabet().iter().cloned().collect(),
            start: dfa.label(dfa.start()),
            states: dfa
                .states()
                .map(|(id, subset)| StateRecord {
                    label: subset.label(),
                    members: subset.iter().cloned().collect(),
                    start: id == dfa.start(),
                    accepting: dfa.is_accepting(id),
                })
                .collect(),
            transitions: dfa
                .transitions()
                .map(|(from, symbol, to)| TransitionRecord {
                    from: dfa.label(from),
                    symbol: symbol.clone(),
                    to: dfa.label(to),
                })
                .collect(),
        }
    }
}

/// Serializes a DFA as pretty-printed JSON through [`DfaTable`].
pub fn export_json(dfa: &Dfa) -> Result<String, AutomatonError> {
    Ok(serde_json::to_string_pretty(&DfaTable::from(dfa))?)
}
