//! Bidirectional scientific-name index with homonym groups

use super::records::{NameRecord, SCIENTIFIC_NAME};
use super::types::{NameId, TaxonId};
use crate::{Result, TaxforestError};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Reverse-map entry: one taxon, or every taxon sharing the name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameEntry {
    Unique(TaxonId),
    Homonym(Vec<TaxonId>),
}

impl NameEntry {
    /// Add `id`, promoting to a homonym group on the first distinct collision
    fn insert(&mut self, id: TaxonId) {
        match self {
            NameEntry::Unique(existing) if *existing == id => {}
            NameEntry::Unique(existing) => {
                *self = NameEntry::Homonym(vec![*existing, id]);
            }
            NameEntry::Homonym(ids) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
    }

    pub fn ids(&self) -> &[TaxonId] {
        match self {
            NameEntry::Unique(id) => std::slice::from_ref(id),
            NameEntry::Homonym(ids) => ids,
        }
    }
}

/// Outcome of looking a name up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unique(TaxonId),
    /// Candidates in the order their name records were read
    Ambiguous {
        name: String,
        candidates: Vec<TaxonId>,
    },
}

impl Resolution {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Resolution::Ambiguous { .. })
    }
}

/// Scientific name <-> taxID mapping
///
/// Each name string is stored once, in the reverse map; the forward map and
/// the forest refer to it by [`NameId`].
#[derive(Debug, Default, Clone)]
pub struct NameIndex {
    by_name: IndexMap<String, NameEntry>,
    by_id: HashMap<TaxonId, NameId>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every `scientific name` record, discarding other name classes
    pub fn build<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<NameRecord>>,
    {
        Self::build_with_class(records, SCIENTIFIC_NAME)
    }

    /// Index every record of `name_class`
    pub fn build_with_class<I>(records: I, name_class: &str) -> Result<Self>
    where
        I: IntoIterator<Item = Result<NameRecord>>,
    {
        let mut index = Self::new();
        for record in records {
            let record = record?;
            if record.has_class(name_class) {
                index.insert(record.id, record.name);
            }
        }
        Ok(index)
    }

    /// Record `name` as the canonical name of `id`
    pub fn insert(&mut self, id: TaxonId, name: String) {
        let entry = self.by_name.entry(name);
        let slot = NameId(entry.index() as u32);
        entry
            .and_modify(|existing| existing.insert(id))
            .or_insert(NameEntry::Unique(id));
        self.by_id.insert(id, slot);
    }

    pub fn resolve(&self, name: &str) -> Result<Resolution> {
        match self.by_name.get(name) {
            Some(NameEntry::Unique(id)) => Ok(Resolution::Unique(*id)),
            Some(NameEntry::Homonym(ids)) => Ok(Resolution::Ambiguous {
                name: name.to_string(),
                candidates: ids.clone(),
            }),
            None => Err(TaxforestError::NameNotFound(name.to_string())),
        }
    }

    /// Resolve a name that must not be a homonym
    pub fn resolve_unique(&self, name: &str) -> Result<TaxonId> {
        match self.resolve(name)? {
            Resolution::Unique(id) => Ok(id),
            Resolution::Ambiguous { name, candidates } => {
                Err(TaxforestError::AmbiguousName { name, candidates })
            }
        }
    }

    pub fn name_of(&self, id: TaxonId) -> Option<&str> {
        self.name_id(id).and_then(|slot| self.name_by_slot(slot))
    }

    pub(crate) fn name_id(&self, id: TaxonId) -> Option<NameId> {
        self.by_id.get(&id).copied()
    }

    pub(crate) fn name_by_slot(&self, slot: NameId) -> Option<&str> {
        self.by_name
            .get_index(slot.0 as usize)
            .map(|(name, _)| name.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of taxa with a name
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Number of distinct name strings
    pub fn distinct_names(&self) -> usize {
        self.by_name.len()
    }

    /// All names shared by two or more taxa, in first-seen order
    pub fn homonyms(&self) -> impl Iterator<Item = (&str, &[TaxonId])> {
        self.by_name.iter().filter_map(|(name, entry)| match entry {
            NameEntry::Homonym(ids) => Some((name.as_str(), ids.as_slice())),
            NameEntry::Unique(_) => None,
        })
    }
}
