//! NCBI taxonomy forest built from `nodes.dmp` / `names.dmp`.
//!
//! The library reads the two taxdump tables once, builds an arena-backed
//! forest plus a bidirectional scientific-name index, and answers
//! descendant, lineage and common-ancestor queries over the read-only result.
//! Ambiguous names (homonyms) are never resolved silently: they are handed to a
//! [`Disambiguator`](bio::taxonomy::Disambiguator) supplied by the caller.

pub mod bio;
pub mod cli;
pub mod core;
pub mod utils;

pub use crate::bio::taxonomy::{
    Disambiguator, Forest, NameIndex, Resolution, TaxonId, TaxonNode, Taxonomy,
};
pub use crate::core::config::Config;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxforestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Taxon name not found: {0}")]
    NameNotFound(String),

    #[error("Ambiguous taxon name '{name}': candidates {}", join_ids(.candidates))]
    AmbiguousName {
        name: String,
        candidates: Vec<TaxonId>,
    },

    #[error("No taxID selected for '{0}'")]
    NoSelectionMade(String),

    #[error("TaxID {id} is not a candidate for '{name}'")]
    InvalidSelection { name: String, id: TaxonId },

    #[error("TaxID {id} listed under parent {first} and parent {second}")]
    ConflictingParent {
        id: TaxonId,
        first: TaxonId,
        second: TaxonId,
    },

    #[error("TaxID {id} listed with division '{first}' and division '{second}'")]
    ConflictingDivision {
        id: TaxonId,
        first: String,
        second: String,
    },

    #[error("Selection for '{name}' is not a list of taxIDs: '{input}'")]
    InvalidSelectionInput { name: String, input: String },

    #[error("TaxID not found in taxonomy: {0}")]
    IdentifierNotFound(TaxonId),

    #[error("No common ancestor for the given taxa")]
    NoCommonAncestor,

    #[error("Empty taxon query")]
    EmptyQuery,

    #[error("Cyclic parent links reached from taxID {0}")]
    CycleDetected(TaxonId),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

fn join_ids(ids: &[TaxonId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, TaxforestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let malformed = TaxforestError::MalformedRecord {
            line: 12,
            reason: "expected at least 3 fields, got 2".to_string(),
        };
        assert_eq!(
            malformed.to_string(),
            "Malformed record at line 12: expected at least 3 fields, got 2"
        );

        let ambiguous = TaxforestError::AmbiguousName {
            name: "Homo sapiens".to_string(),
            candidates: vec![TaxonId(9606), TaxonId(9601)],
        };
        assert_eq!(
            ambiguous.to_string(),
            "Ambiguous taxon name 'Homo sapiens': candidates 9606, 9601"
        );

        let invalid = TaxforestError::InvalidSelection {
            name: "Homo sapiens".to_string(),
            id: TaxonId(1),
        };
        assert_eq!(
            invalid.to_string(),
            "TaxID 1 is not a candidate for 'Homo sapiens'"
        );

        let division = TaxforestError::ConflictingDivision {
            id: TaxonId(2),
            first: "BCT".to_string(),
            second: "VRL".to_string(),
        };
        assert_eq!(
            division.to_string(),
            "TaxID 2 listed with division 'BCT' and division 'VRL'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "nodes.dmp");
        let err: TaxforestError = io_err.into();
        assert!(matches!(err, TaxforestError::Io(_)));
    }
}
