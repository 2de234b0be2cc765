//! Homonym disambiguation.
//!
//! A name shared by several taxa is never resolved by picking one: the
//! candidates are handed to a [`Disambiguator`], and whatever it returns is
//! checked against the candidate set before anything reaches the traversal
//! queries (see [`Taxonomy::disambiguate`](super::Taxonomy::disambiguate)).
//!
//! Adapters provided here:
//! - [`PromptDisambiguator`]: asks on the terminal
//! - [`SelectionFile`]: pre-supplied `name = [taxIDs]` TOML mapping for batch runs
//! - [`RejectAmbiguous`]: fails with [`TaxforestError::AmbiguousName`]

use super::types::TaxonId;
use crate::{Result, TaxforestError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One taxon sharing the ambiguous name, with context for a human to choose
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub id: TaxonId,
    pub division: Option<String>,
    pub parent_name: Option<String>,
}

/// An ambiguous name and its candidates, in name-record order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub name: String,
    pub candidates: Vec<Candidate>,
}

impl Ambiguity {
    pub fn candidate_ids(&self) -> Vec<TaxonId> {
        self.candidates.iter().map(|c| c.id).collect()
    }

    pub fn contains(&self, id: TaxonId) -> bool {
        self.candidates.iter().any(|c| c.id == id)
    }
}

/// Chooses which of the candidates a query meant
pub trait Disambiguator {
    /// Return the chosen taxIDs; an empty list means no choice was made
    fn choose(&mut self, ambiguity: &Ambiguity) -> Result<Vec<TaxonId>>;
}

impl<F> Disambiguator for F
where
    F: FnMut(&Ambiguity) -> Result<Vec<TaxonId>>,
{
    fn choose(&mut self, ambiguity: &Ambiguity) -> Result<Vec<TaxonId>> {
        self(ambiguity)
    }
}

/// Check a choice against the candidates: non-empty, members only, first
/// occurrence order kept
pub fn validate_selection(ambiguity: &Ambiguity, chosen: Vec<TaxonId>) -> Result<Vec<TaxonId>> {
    if chosen.is_empty() {
        return Err(TaxforestError::NoSelectionMade(ambiguity.name.clone()));
    }

    let mut selection: Vec<TaxonId> = Vec::with_capacity(chosen.len());
    for id in chosen {
        if !ambiguity.contains(id) {
            return Err(TaxforestError::InvalidSelection {
                name: ambiguity.name.clone(),
                id,
            });
        }
        if !selection.contains(&id) {
            selection.push(id);
        }
    }
    Ok(selection)
}

/// Parse whitespace-separated taxIDs as typed at a prompt for `name`
pub fn parse_selection(name: &str, input: &str) -> Result<Vec<TaxonId>> {
    input
        .split_whitespace()
        .map(|token| token.parse::<TaxonId>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| TaxforestError::InvalidSelectionInput {
            name: name.to_string(),
            input: input.trim().to_string(),
        })
}

/// Keep asking until a line parses as taxIDs; other errors end the prompt
fn read_until_parsed<F>(ambiguity: &Ambiguity, mut read_line: F) -> Result<Vec<TaxonId>>
where
    F: FnMut() -> Result<String>,
{
    use colored::*;

    loop {
        let input = read_line()?;
        match parse_selection(&ambiguity.name, &input) {
            Err(e @ TaxforestError::InvalidSelectionInput { .. }) => {
                eprintln!("{} {}", "●".yellow(), e);
            }
            parsed => return parsed,
        }
    }
}

/// Interactive terminal prompt
#[derive(Debug, Default)]
pub struct PromptDisambiguator;

impl PromptDisambiguator {
    pub fn new() -> Self {
        Self
    }
}

impl Disambiguator for PromptDisambiguator {
    fn choose(&mut self, ambiguity: &Ambiguity) -> Result<Vec<TaxonId>> {
        use colored::*;
        use dialoguer::{theme::ColorfulTheme, Input};

        eprintln!(
            "{} Multiple taxIDs found for {}:",
            "●".yellow(),
            ambiguity.name.bold()
        );
        for candidate in &ambiguity.candidates {
            eprintln!(
                "  {} {:>10}  division: {:<16} parent: {}",
                "├─".dimmed(),
                candidate.id.to_string().cyan(),
                candidate.division.as_deref().unwrap_or("-"),
                candidate.parent_name.as_deref().unwrap_or("-"),
            );
        }

        let theme = ColorfulTheme::default();
        read_until_parsed(ambiguity, || {
            Input::<String>::with_theme(&theme)
                .with_prompt("Enter your chosen taxID(s), separated by spaces")
                .allow_empty(true)
                .interact_text()
                .map_err(|e| TaxforestError::Io(std::io::Error::other(e.to_string())))
        })
    }
}

/// Pre-supplied choices, one entry per ambiguous name
///
/// ```toml
/// "Homo sapiens" = [9606]
/// "Bacillus" = [1386, 55087]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionFile {
    selections: HashMap<String, Vec<TaxonId>>,
}

impl SelectionFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(mut self, name: &str, ids: Vec<TaxonId>) -> Self {
        self.selections.insert(name.to_string(), ids);
        self
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| TaxforestError::Config(format!("Failed to parse selections: {}", e)))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

impl Disambiguator for SelectionFile {
    fn choose(&mut self, ambiguity: &Ambiguity) -> Result<Vec<TaxonId>> {
        Ok(self
            .selections
            .get(&ambiguity.name)
            .cloned()
            .unwrap_or_default())
    }
}

/// Refuses every ambiguous name
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAmbiguous;

impl Disambiguator for RejectAmbiguous {
    fn choose(&mut self, ambiguity: &Ambiguity) -> Result<Vec<TaxonId>> {
        Err(TaxforestError::AmbiguousName {
            name: ambiguity.name.clone(),
            candidates: ambiguity.candidate_ids(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn homo_sapiens() -> Ambiguity {
        Ambiguity {
            name: "Homo sapiens".to_string(),
            candidates: [9606, 9601]
                .iter()
                .map(|&id| Candidate {
                    id: TaxonId(id),
                    division: None,
                    parent_name: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_selection() {
        let ambiguity = homo_sapiens();
        assert_eq!(
            validate_selection(&ambiguity, vec![TaxonId(9601), TaxonId(9601)]).unwrap(),
            vec![TaxonId(9601)]
        );
        assert!(matches!(
            validate_selection(&ambiguity, vec![]),
            Err(TaxforestError::NoSelectionMade(_))
        ));
        assert!(matches!(
            validate_selection(&ambiguity, vec![TaxonId(9606), TaxonId(1)]),
            Err(TaxforestError::InvalidSelection { id: TaxonId(1), .. })
        ));
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            parse_selection("Homo sapiens", " 9606  9601 ").unwrap(),
            vec![TaxonId(9606), TaxonId(9601)]
        );
        assert!(parse_selection("Homo sapiens", "").unwrap().is_empty());

        match parse_selection("Homo sapiens", "9606 9601x") {
            Err(TaxforestError::InvalidSelectionInput { name, input }) => {
                assert_eq!(name, "Homo sapiens");
                assert_eq!(input, "9606 9601x");
            }
            other => panic!("expected InvalidSelectionInput, got {:?}", other),
        }
    }

    #[test]
    fn test_typo_at_prompt_asks_again() {
        let mut lines = vec!["9601x", "human", "9601"].into_iter();
        let mut calls = 0;
        let chosen = read_until_parsed(&homo_sapiens(), || {
            calls += 1;
            Ok(lines.next().unwrap().to_string())
        })
        .unwrap();

        assert_eq!(chosen, vec![TaxonId(9601)]);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_prompt_failure_is_not_retried() {
        let result = read_until_parsed(&homo_sapiens(), || {
            Err(TaxforestError::Io(std::io::Error::other("closed")))
        });
        assert!(matches!(result, Err(TaxforestError::Io(_))));
    }

    #[test]
    fn test_selection_file() {
        let mut selections = SelectionFile::from_toml_str("\"Homo sapiens\" = [9606]\n").unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(
            selections.choose(&homo_sapiens()).unwrap(),
            vec![TaxonId(9606)]
        );

        let mut empty = SelectionFile::new();
        assert!(empty.choose(&homo_sapiens()).unwrap().is_empty());
    }

    #[test]
    fn test_reject_ambiguous() {
        let result = RejectAmbiguous.choose(&homo_sapiens());
        assert!(matches!(result, Err(TaxforestError::AmbiguousName { .. })));
    }
}
