//! This crate converts Nondeterministic Finite Automata into equivalent Deterministic Finite
//! Automata by subset construction, and renders the result as a Graphviz graph.
//! It includes modules for parsing automaton definitions, validating them, running words
//! through either automaton, and a catalog of embedded demo automata.

pub mod analyzer;
pub mod catalog;
pub mod construction;
pub mod exporter;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the validation entry points from the analyzer module.
pub use analyzer::{analyze, analyze_with_limits, AnalysisError};
/// Re-exports the embedded demo catalog.
pub use catalog::{AutomatonCatalog, CatalogEntry, CATALOG};
/// Re-exports the subset construction entry points.
pub use construction::{convert, try_convert};
/// Re-exports the Graphviz and JSON renderers.
pub use exporter::{export, export_json, export_nfa, DfaTable};
/// Re-exports the `AutomatonLoader` struct from the loader module.
pub use loader::AutomatonLoader;
/// Re-exports the word runners from the machine module.
pub use machine::{split_word, DfaRunner, NfaRunner, Step};
/// Re-exports the parsing functions from the parser module.
pub use parser::{parse, parse_shorthand_transition};
/// Re-exports the automaton types from the types module.
pub use types::{AutomatonError, Dfa, Limits, Nfa, StateId, StateSet, MAX_DEFINITION_SIZE};
