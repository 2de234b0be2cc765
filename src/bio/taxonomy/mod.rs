//! Taxonomy data model and queries

pub mod disambiguation;
pub mod forest;
pub mod names;
pub mod records;
pub mod traversal;
pub mod types;

pub use disambiguation::{
    parse_selection, validate_selection, Ambiguity, Candidate, Disambiguator,
    PromptDisambiguator, RejectAmbiguous, SelectionFile,
};
pub use forest::{Forest, ForestStats, TaxonNode};
pub use names::{NameEntry, NameIndex, Resolution};
pub use records::{
    extract_taxdump, open_dump, DumpReader, NameRecord, TaxdumpFiles, TaxonRecord,
};
pub use types::TaxonId;

use crate::core::config::TaxonomyConfig;
use crate::Result;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

/// Name index and forest loaded from one taxdump, read-only after loading
#[derive(Debug, Clone)]
pub struct Taxonomy {
    names: NameIndex,
    forest: Forest,
    unknown_name: String,
}

impl Taxonomy {
    /// Load from `nodes.dmp` / `names.dmp` (plain or `.gz`)
    pub fn load<P: AsRef<Path>>(nodes: P, names: P, config: &TaxonomyConfig) -> Result<Self> {
        Self::from_readers(open_dump(nodes)?, open_dump(names)?, config)
    }

    pub fn load_files(files: &TaxdumpFiles, config: &TaxonomyConfig) -> Result<Self> {
        Self::load(&files.nodes, &files.names, config)
    }

    /// Build from two readers. The name table is indexed completely before
    /// the node table is read, since nodes take their names from the index.
    pub fn from_readers<N: BufRead, M: BufRead>(
        nodes: N,
        names: M,
        config: &TaxonomyConfig,
    ) -> Result<Self> {
        let names = NameIndex::build_with_class(
            records::NameReader::new(names),
            &config.scientific_name_class,
        )?;
        info!(
            "Indexed {} names ({} homonyms)",
            names.len(),
            names.homonyms().count()
        );

        let forest = Forest::build(records::NodeReader::new(nodes), &names)?
            .with_root(TaxonId(config.root_id));
        let stats = forest.stats();
        info!(
            "Built taxonomy forest: {} nodes, {} terminal, {} undefined parents",
            stats.nodes, stats.terminals, stats.placeholders
        );

        Ok(Self::from_parts(names, forest, config))
    }

    pub fn from_parts(names: NameIndex, forest: Forest, config: &TaxonomyConfig) -> Self {
        Self {
            names,
            forest,
            unknown_name: config.unknown_name.clone(),
        }
    }

    pub fn names(&self) -> &NameIndex {
        &self.names
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn get(&self, id: TaxonId) -> Result<&TaxonNode> {
        self.forest.get(id)
    }

    /// Display name of a node; the configured fallback ("unknown") when the
    /// taxon has no scientific name
    pub fn name_of(&self, id: TaxonId) -> &str {
        self.forest
            .try_get(id)
            .and_then(|node| node.name(&self.names))
            .or_else(|| self.names.name_of(id))
            .unwrap_or(self.unknown_name.as_str())
    }

    pub fn resolve(&self, name: &str) -> Result<Resolution> {
        self.names.resolve(name)
    }

    /// Describe each candidate of an ambiguous name
    pub fn ambiguity(&self, name: &str, candidates: &[TaxonId]) -> Ambiguity {
        Ambiguity {
            name: name.to_string(),
            candidates: candidates
                .iter()
                .map(|&id| {
                    let node = self.forest.try_get(id);
                    Candidate {
                        id,
                        division: node
                            .and_then(|n| self.forest.division_of(n))
                            .map(str::to_owned),
                        parent_name: node
                            .and_then(|n| n.parent_id())
                            .map(|parent| self.name_of(parent).to_owned()),
                    }
                })
                .collect(),
        }
    }

    /// Resolve `name` to one or more taxIDs, asking `chooser` when the name is
    /// a homonym. The returned IDs are always members of the candidate set.
    pub fn disambiguate(
        &self,
        name: &str,
        chooser: &mut dyn Disambiguator,
    ) -> Result<Vec<TaxonId>> {
        match self.resolve(name)? {
            Resolution::Unique(id) => Ok(vec![id]),
            Resolution::Ambiguous { name, candidates } => {
                let ambiguity = self.ambiguity(&name, &candidates);
                let chosen = chooser.choose(&ambiguity)?;
                disambiguation::validate_selection(&ambiguity, chosen)
            }
        }
    }

    /// Genealogy as (taxID, name) pairs, root first
    pub fn lineage_names(&self, id: TaxonId) -> Result<Vec<(TaxonId, &str)>> {
        let mut lineage: Vec<(TaxonId, &str)> = self
            .forest
            .genealogy(id)?
            .into_iter()
            .map(|ancestor| (ancestor, self.name_of(ancestor)))
            .collect();
        lineage.reverse();
        Ok(lineage)
    }
}
