//! This module provides the `AutomatonLoader` struct, responsible for loading automata from
//! files and strings, and for writing conversion artifacts back to disk.

use crate::exporter::export;
use crate::parser::parse;
use crate::types::{AutomatonError, Dfa, Nfa};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of automaton definitions in the text format.
pub const NFA_EXTENSION: &str = "nfa";

/// `AutomatonLoader` is a utility struct for loading automata.
/// Text definitions (`.nfa`) go through the parser; `.json` files are deserialized with serde.
/// Either way, the result is validated before it is returned.
pub struct AutomatonLoader;

impl AutomatonLoader {
    /// Loads a single NFA from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A `.nfa` or `.json` file.
    ///
    /// # Returns
    ///
    /// * `Ok(Nfa)` if the file is successfully read, parsed, and validated.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * Any parsing or validation error otherwise.
    pub fn load_nfa(path: &Path) -> Result<Nfa, AutomatonError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            return Self::load_nfa_from_json(&content);
        }

        parse(&content)
    }

    /// Loads a single NFA from text in the `.nfa` format.
    pub fn load_nfa_from_string(content: &str) -> Result<Nfa, AutomatonError> {
        parse(content)
    }

    /// Loads a single NFA from its JSON serialization and validates it.
    pub fn load_nfa_from_json(content: &str) -> Result<Nfa, AutomatonError> {
        let nfa: Nfa = serde_json::from_str(content)?;
        crate::analyzer::analyze(&nfa)?;

        Ok(nfa)
    }

    /// Loads all automaton definitions (`.nfa` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, Nfa), AutomatonError>>` - One element per candidate file, either
    ///   the loaded automaton with its path or the error that prevented loading it.
    pub fn load_nfas(directory: &Path) -> Vec<Result<(PathBuf, Nfa), AutomatonError>> {
        if !directory.exists() {
            return vec![Err(AutomatonError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(AutomatonError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != NFA_EXTENSION) {
                    return None;
                }

                match Self::load_nfa(&path) {
                    Ok(nfa) => Some(Ok((path, nfa))),
                    Err(e) => Some(Err(AutomatonError::FileError(format!(
                        "Failed to load automaton from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }

    /// Writes the Graphviz rendering of `dfa` to `path`.
    pub fn write_dot_file(dfa: &Dfa, path: &Path) -> Result<(), AutomatonError> {
        Self::write_artifact(&export(dfa), path)
    }

    /// Writes `content` to `path`, replacing any existing file.
    pub fn write_artifact(content: &str, path: &Path) -> Result<(), AutomatonError> {
        fs::write(path, content).map_err(|e| {
            AutomatonError::FileError(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        info!("Wrote {} bytes to {}", content.len(), path.display());

        Ok(())
    }
}
