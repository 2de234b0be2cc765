//! Arena-backed taxonomy forest.
//!
//! Nodes are owned by a single `Vec` and refer to each other by [`NodeIdx`];
//! a `HashMap<TaxonId, NodeIdx>` is the only identifier lookup. A record may
//! name a parent that has not been read yet: the parent is inserted as a
//! placeholder first and filled in when its own record arrives, so the final
//! structure does not depend on line order.

use super::names::NameIndex;
use super::records::TaxonRecord;
use super::types::{DivisionId, NameId, NodeIdx, TaxonId};
use crate::{Result, TaxforestError};
use indexmap::IndexSet;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TaxonNode {
    id: TaxonId,
    parent_id: TaxonId,
    parent: Option<NodeIdx>,
    children: Vec<NodeIdx>,
    division: Option<DivisionId>,
    name: Option<NameId>,
    terminal: bool,
    defined: bool,
}

impl TaxonNode {
    fn placeholder(id: TaxonId, name: Option<NameId>) -> Self {
        Self {
            id,
            parent_id: TaxonId::UNASSIGNED,
            parent: None,
            children: Vec::new(),
            division: None,
            name,
            terminal: true,
            defined: false,
        }
    }

    pub fn id(&self) -> TaxonId {
        self.id
    }

    /// Parent as written in the dump: the node itself for a root,
    /// [`TaxonId::UNASSIGNED`] for a placeholder
    pub fn raw_parent_id(&self) -> TaxonId {
        self.parent_id
    }

    /// Parent usable for traversal; `None` for roots and placeholders
    pub fn parent_id(&self) -> Option<TaxonId> {
        if self.parent.is_some() {
            Some(self.parent_id)
        } else {
            None
        }
    }

    pub(crate) fn parent_idx(&self) -> Option<NodeIdx> {
        self.parent
    }

    pub(crate) fn child_slots(&self) -> &[NodeIdx] {
        &self.children
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// True while only referenced as a parent, never defined by its own record
    pub fn is_placeholder(&self) -> bool {
        !self.defined
    }

    pub fn is_root(&self) -> bool {
        self.defined && self.parent_id == self.id
    }

    pub fn name<'a>(&self, names: &'a NameIndex) -> Option<&'a str> {
        self.name.and_then(|slot| names.name_by_slot(slot))
    }

    pub(crate) fn division_slot(&self) -> Option<DivisionId> {
        self.division
    }
}

/// Counts gathered once the forest is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ForestStats {
    pub nodes: usize,
    pub placeholders: usize,
    pub roots: usize,
    pub terminals: usize,
    pub divisions: usize,
}

#[derive(Debug, Clone)]
pub struct Forest {
    nodes: Vec<TaxonNode>,
    index: HashMap<TaxonId, NodeIdx>,
    divisions: IndexSet<String>,
    root_id: TaxonId,
}

impl Default for Forest {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            divisions: IndexSet::new(),
            root_id: TaxonId::ROOT,
        }
    }
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from node records in a single pass, naming nodes from `names`
    pub fn build<I>(records: I, names: &NameIndex) -> Result<Self>
    where
        I: IntoIterator<Item = Result<TaxonRecord>>,
    {
        let mut forest = Self::new();
        for record in records {
            forest.insert(&record?, names)?;
        }
        Ok(forest)
    }

    /// Identifier at which genealogies stop (defaults to `1`)
    pub fn with_root(mut self, root_id: TaxonId) -> Self {
        self.root_id = root_id;
        self
    }

    pub fn root_id(&self) -> TaxonId {
        self.root_id
    }

    /// Insert-if-absent; returns the slot of `id`
    fn upsert(&mut self, id: TaxonId, names: &NameIndex) -> NodeIdx {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = NodeIdx(self.nodes.len() as u32);
        self.nodes.push(TaxonNode::placeholder(id, names.name_id(id)));
        self.index.insert(id, idx);
        idx
    }

    fn intern_division(&mut self, division: &str) -> DivisionId {
        match self.divisions.get_index_of(division) {
            Some(i) => DivisionId(i as u32),
            None => DivisionId(self.divisions.insert_full(division.to_string()).0 as u32),
        }
    }

    /// Apply one node record: define the node, then link it under its parent
    pub fn insert(&mut self, record: &TaxonRecord, names: &NameIndex) -> Result<()> {
        let idx = self.upsert(record.id, names);

        let node = &self.nodes[idx.index()];
        if node.defined {
            if node.parent_id != record.parent_id {
                return Err(TaxforestError::ConflictingParent {
                    id: record.id,
                    first: node.parent_id,
                    second: record.parent_id,
                });
            }
            return match self.division_of(node) {
                Some(first) if first != record.division => {
                    Err(TaxforestError::ConflictingDivision {
                        id: record.id,
                        first: first.to_string(),
                        second: record.division.clone(),
                    })
                }
                _ => Ok(()),
            };
        }

        let division = self.intern_division(&record.division);
        let node = &mut self.nodes[idx.index()];
        node.parent_id = record.parent_id;
        node.division = Some(division);
        node.defined = true;

        if record.is_root() {
            return Ok(());
        }

        let parent = self.upsert(record.parent_id, names);
        self.nodes[idx.index()].parent = Some(parent);
        let parent_node = &mut self.nodes[parent.index()];
        parent_node.children.push(idx);
        parent_node.terminal = false;
        Ok(())
    }

    pub fn get(&self, id: TaxonId) -> Result<&TaxonNode> {
        self.try_get(id).ok_or(TaxforestError::IdentifierNotFound(id))
    }

    pub fn try_get(&self, id: TaxonId) -> Option<&TaxonNode> {
        self.index.get(&id).map(|idx| &self.nodes[idx.index()])
    }

    pub fn contains(&self, id: TaxonId) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn slot(&self, id: TaxonId) -> Result<NodeIdx> {
        self.index.get(&id).copied().ok_or(TaxforestError::IdentifierNotFound(id))
    }

    pub(crate) fn node(&self, idx: NodeIdx) -> &TaxonNode {
        &self.nodes[idx.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in arena order (first reference order, not identifier order)
    pub fn iter(&self) -> impl Iterator<Item = &TaxonNode> {
        self.nodes.iter()
    }

    pub fn parent_of(&self, node: &TaxonNode) -> Option<&TaxonNode> {
        node.parent.map(|idx| self.node(idx))
    }

    pub fn children_of<'a>(&'a self, node: &'a TaxonNode) -> impl Iterator<Item = &'a TaxonNode> {
        node.children.iter().map(move |idx| self.node(*idx))
    }

    /// Child identifiers of `id`, in the order their records were read
    pub fn child_ids(&self, id: TaxonId) -> Result<Vec<TaxonId>> {
        let node = self.get(id)?;
        Ok(self.children_of(node).map(TaxonNode::id).collect())
    }

    pub fn division_of(&self, node: &TaxonNode) -> Option<&str> {
        node.division
            .and_then(|d| self.divisions.get_index(d.0 as usize))
            .map(String::as_str)
    }

    pub(crate) fn division_slot(&self, division: &str) -> Option<DivisionId> {
        self.divisions
            .get_index_of(division)
            .map(|i| DivisionId(i as u32))
    }

    /// Every distinct division code, in first-seen order
    pub fn divisions(&self) -> impl Iterator<Item = &str> {
        self.divisions.iter().map(String::as_str)
    }

    pub fn stats(&self) -> ForestStats {
        ForestStats {
            nodes: self.nodes.len(),
            placeholders: self.nodes.iter().filter(|n| !n.defined).count(),
            roots: self.nodes.iter().filter(|n| n.is_root()).count(),
            terminals: self.nodes.iter().filter(|n| n.terminal).count(),
            divisions: self.divisions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(records: &[(u32, u32, &str)]) -> Forest {
        Forest::build(
            records
                .iter()
                .map(|(id, parent, div)| Ok(TaxonRecord::new(*id, *parent, div))),
            &NameIndex::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_forward_reference_creates_placeholder() {
        let forest = build(&[(100, 50, "species")]);

        let parent = forest.get(TaxonId(50)).unwrap();
        assert!(parent.is_placeholder());
        assert!(!parent.is_terminal());
        assert_eq!(parent.raw_parent_id(), TaxonId::UNASSIGNED);
        assert_eq!(forest.child_ids(TaxonId(50)).unwrap(), vec![TaxonId(100)]);

        let child = forest.get(TaxonId(100)).unwrap();
        assert!(child.is_terminal());
        assert_eq!(child.parent_id(), Some(TaxonId(50)));
    }

    #[test]
    fn test_placeholder_is_backfilled() {
        let forest = build(&[(100, 50, "species"), (50, 1, "genus"), (1, 1, "no rank")]);

        let genus = forest.get(TaxonId(50)).unwrap();
        assert!(!genus.is_placeholder());
        assert_eq!(forest.division_of(genus), Some("genus"));
        assert_eq!(genus.parent_id(), Some(TaxonId(1)));
        assert_eq!(forest.stats().placeholders, 0);
    }

    #[test]
    fn test_self_parent_root_is_not_its_own_child() {
        let forest = build(&[(1, 1, "root_division")]);

        let root = forest.get(TaxonId(1)).unwrap();
        assert!(root.is_root());
        assert_eq!(root.parent_id(), None);
        assert_eq!(root.num_children(), 0);
        assert!(root.is_terminal());
    }

    #[test]
    fn test_repeated_record_is_idempotent() {
        let forest = build(&[(1, 1, "r"), (2, 1, "a"), (2, 1, "a")]);
        assert_eq!(forest.child_ids(TaxonId(1)).unwrap(), vec![TaxonId(2)]);
    }

    #[test]
    fn test_conflicting_parent_is_rejected() {
        let result = Forest::build(
            vec![
                Ok(TaxonRecord::new(2, 1, "a")),
                Ok(TaxonRecord::new(2, 3, "a")),
            ],
            &NameIndex::new(),
        );
        assert!(matches!(
            result,
            Err(TaxforestError::ConflictingParent { .. })
        ));
    }

    #[test]
    fn test_conflicting_division_is_rejected() {
        for (first, second) in [("BCT", "VRL"), ("VRL", "BCT")] {
            let result = Forest::build(
                vec![
                    Ok(TaxonRecord::new(1, 1, "r")),
                    Ok(TaxonRecord::new(2, 1, first)),
                    Ok(TaxonRecord::new(2, 1, second)),
                ],
                &NameIndex::new(),
            );
            match result {
                Err(TaxforestError::ConflictingDivision { id, first: a, second: b }) => {
                    assert_eq!(id, TaxonId(2));
                    assert_eq!((a.as_str(), b.as_str()), (first, second));
                }
                other => panic!("expected ConflictingDivision, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_divisions_are_interned() {
        let forest = build(&[(1, 1, "no rank"), (2, 1, "species"), (3, 1, "species")]);
        assert_eq!(forest.divisions().collect::<Vec<_>>(), vec!["no rank", "species"]);
        assert_eq!(forest.stats().divisions, 2);
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let forest = build(&[(1, 1, "r")]);
        assert!(matches!(
            forest.get(TaxonId(7)),
            Err(TaxforestError::IdentifierNotFound(TaxonId(7)))
        ));
    }
}
