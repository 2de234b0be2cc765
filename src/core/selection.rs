//! Batch selection: turn a list of taxon queries into the sorted set of all
//! their descendants.
//!
//! Query files hold one entry per line. An entry is a taxID (`9606`), a
//! scientific name (`Homo sapiens`), or a classifier label carrying its ID
//! (`Streptococcus agalactiae (taxid 2754)`).

use crate::bio::taxonomy::{Disambiguator, TaxonId, Taxonomy};
use crate::{Result, TaxforestError};
use serde::Serialize;
use std::fmt;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Query {
    Id(TaxonId),
    Name(String),
}

impl Query {
    /// Interpret one query line
    pub fn parse(entry: &str, numeric_as_id: bool) -> Option<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }
        if numeric_as_id && entry.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = entry.parse() {
                return Some(Query::Id(id));
            }
        }
        if let Some(id) = extract_labelled_taxid(entry) {
            return Some(Query::Id(id));
        }
        Some(Query::Name(entry.to_string()))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Id(id) => write!(f, "{}", id),
            Query::Name(name) => write!(f, "{}", name),
        }
    }
}

/// `Streptococcus agalactiae (taxid 2754)` -> 2754
fn extract_labelled_taxid(entry: &str) -> Option<TaxonId> {
    let open = entry.rfind('(')?;
    let close = entry[open..].find(')')? + open;
    let inner = entry[open + 1..close].trim();
    let id = inner.strip_prefix("taxid")?.trim();
    id.parse().ok()
}

/// Queries in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    queries: Vec<Query>,
}

impl QuerySet {
    pub fn new(queries: Vec<Query>) -> Self {
        Self { queries }
    }

    pub fn parse<R: BufRead>(reader: R, numeric_as_id: bool) -> Result<Self> {
        let mut queries = Vec::new();
        for line in reader.lines() {
            if let Some(query) = Query::parse(&line?, numeric_as_id) {
                queries.push(query);
            }
        }
        Ok(Self { queries })
    }

    pub fn from_file<P: AsRef<Path>>(path: P, numeric_as_id: bool) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                TaxforestError::NotFound(path.as_ref().display().to_string())
            }
            _ => TaxforestError::Io(e),
        })?;
        Self::parse(std::io::BufReader::new(file), numeric_as_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Query> {
        self.queries.iter()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionOptions {
    /// Keep only taxa of this division code
    pub division: Option<String>,
    /// Keep only taxa without children
    pub terminal_only: bool,
    /// Record names missing from the index instead of failing the batch
    pub skip_unresolved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedQuery {
    pub query: Query,
    pub ids: Vec<TaxonId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedQuery {
    pub query: Query,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionReport {
    /// Sorted, duplicate-free descendant taxIDs after filtering
    pub taxa: Vec<TaxonId>,
    pub resolved: Vec<ResolvedQuery>,
    pub skipped: Vec<SkippedQuery>,
}

/// Resolve one query to taxIDs, going through `chooser` for homonyms
pub fn resolve_query(
    taxonomy: &Taxonomy,
    query: &Query,
    chooser: &mut dyn Disambiguator,
) -> Result<Vec<TaxonId>> {
    match query {
        Query::Id(id) => {
            taxonomy.get(*id)?;
            Ok(vec![*id])
        }
        Query::Name(name) => taxonomy.disambiguate(name, chooser),
    }
}

/// Resolve every query and collect the union of their descendant closures.
///
/// A homonym left without a usable choice skips that entry only. A name missing
/// from the index aborts the batch unless `skip_unresolved` is set; either
/// way it is reported, never dropped silently.
pub fn select_descendants(
    taxonomy: &Taxonomy,
    queries: &QuerySet,
    chooser: &mut dyn Disambiguator,
    options: &SelectionOptions,
) -> Result<SelectionReport> {
    let mut report = SelectionReport::default();
    let mut roots: Vec<TaxonId> = Vec::new();

    for query in queries.iter() {
        match resolve_query(taxonomy, query, chooser) {
            Ok(ids) => {
                debug!("Resolved '{}' to {:?}", query, ids);
                roots.extend_from_slice(&ids);
                report.resolved.push(ResolvedQuery {
                    query: query.clone(),
                    ids,
                });
            }
            Err(
                e @ (TaxforestError::NoSelectionMade(_)
                | TaxforestError::InvalidSelection { .. }
                | TaxforestError::InvalidSelectionInput { .. }),
            ) => {
                warn!("Skipping '{}': {}", query, e);
                report.skipped.push(SkippedQuery {
                    query: query.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e @ TaxforestError::NameNotFound(_)) if options.skip_unresolved => {
                warn!("Skipping '{}': {}", query, e);
                report.skipped.push(SkippedQuery {
                    query: query.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    let forest = taxonomy.forest();
    let mut taxa = forest.descendants_of_many(&roots)?;
    if let Some(division) = &options.division {
        taxa = forest.filter_by_division(&taxa, division)?;
    }
    if options.terminal_only {
        taxa = forest.filter_terminal(&taxa)?;
    }
    report.taxa = taxa;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_query_parsing() {
        assert_eq!(Query::parse("9606", true), Some(Query::Id(TaxonId(9606))));
        assert_eq!(
            Query::parse("9606", false),
            Some(Query::Name("9606".to_string()))
        );
        assert_eq!(
            Query::parse("  Homo sapiens \r", true),
            Some(Query::Name("Homo sapiens".to_string()))
        );
        assert_eq!(
            Query::parse("Streptococcus agalactiae (taxid 2754)", true),
            Some(Query::Id(TaxonId(2754)))
        );
        assert_eq!(
            Query::parse("Bacillus (genus)", true),
            Some(Query::Name("Bacillus (genus)".to_string()))
        );
        assert_eq!(Query::parse("   ", true), None);
    }

    #[test]
    fn test_query_set_skips_blank_lines() {
        let set = QuerySet::parse(Cursor::new("Homo sapiens\n\n562\n"), true).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().cloned().collect::<Vec<_>>(),
            vec![
                Query::Name("Homo sapiens".to_string()),
                Query::Id(TaxonId(562))
            ]
        );
    }
}
