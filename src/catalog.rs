use crate::types::{AutomatonError, Nfa};
use log::warn;
use std::sync::RwLock;

// Embedded demo automata
const DEMO_TEXTS: [&str; 5] = [
    include_str!("../demos/single-transition.nfa"),
    include_str!("../demos/three-cycle.nfa"),
    include_str!("../demos/branching.nfa"),
    include_str!("../demos/single-state.nfa"),
    include_str!("../demos/ends-with-ab.nfa"),
];

lazy_static::lazy_static! {
    pub static ref CATALOG: RwLock<Vec<Nfa>> = RwLock::new(Vec::new());
}

pub struct AutomatonCatalog;

impl AutomatonCatalog {
    /// Parse the embedded demos into the catalog
    pub fn load() -> Result<(), AutomatonError> {
        let mut automata = Vec::new();

        for (index, text) in DEMO_TEXTS.iter().enumerate() {
            match crate::parser::parse(text) {
                Ok(nfa) => automata.push(nfa),
                Err(e) => warn!("Skipping demo automaton #{}: {}", index, e),
            }
        }

        let mut guard = CATALOG.write().map_err(|_| {
            AutomatonError::FileError("Failed to acquire write lock".to_string())
        })?;
        *guard = automata;

        Ok(())
    }

    /// Load the catalog on first use
    fn ensure_loaded() {
        let empty = CATALOG.read().map(|automata| automata.is_empty()).unwrap_or(true);
        if empty {
            let _ = Self::load();
        }
    }

    /// Get the number of available automata
    pub fn count() -> usize {
        Self::ensure_loaded();

        CATALOG.read().map(|automata| automata.len()).unwrap_or(0)
    }

    /// Get an automaton by its index
    pub fn get_by_index(index: usize) -> Result<Nfa, AutomatonError> {
        Self::ensure_loaded();

        CATALOG
            .read()
            .map_err(|_| AutomatonError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                AutomatonError::ValidationError(format!("Automaton index {} out of range", index))
            })
    }

    /// Get an automaton by its name, ignoring case
    pub fn get_by_name(name: &str) -> Result<Nfa, AutomatonError> {
        Self::ensure_loaded();

        CATALOG
            .read()
            .map_err(|_| AutomatonError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|nfa| nfa.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                AutomatonError::ValidationError(format!("Automaton '{}' not found", name))
            })
    }

    /// List all automaton names
    pub fn list_names() -> Vec<String> {
        Self::ensure_loaded();

        CATALOG
            .read()
            .map(|automata| automata.iter().map(|nfa| nfa.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Get summary information about an automaton by its index
    pub fn get_info(index: usize) -> Result<CatalogEntry, AutomatonError> {
        let nfa = Self::get_by_index(index)?;

        Ok(CatalogEntry {
            index,
            state_count: nfa.states.len(),
            symbol_count: nfa.alphabet.len(),
            transition_count: nfa.transition_count(),
            name: nfa.name,
        })
    }

    /// Get the original text of an automaton by its index
    pub fn get_text_by_index(index: usize) -> Result<&'static str, AutomatonError> {
        DEMO_TEXTS.get(index).copied().ok_or_else(|| {
            AutomatonError::ValidationError(format!(
                "Automaton text index {} out of range",
                index
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub index: usize,
    pub name: String,
    pub state_count: usize,
    pub symbol_count: usize,
    pub transition_count: usize,
}
