//! Read-only queries over a built [`Forest`]

use super::forest::Forest;
use super::types::{NodeIdx, TaxonId};
use crate::{Result, TaxforestError};
use bit_vec::BitVec;
use rayon::prelude::*;
use std::collections::HashSet;

impl Forest {
    /// `id` and every node below it, numerically sorted
    pub fn descendants(&self, id: TaxonId) -> Result<Vec<TaxonId>> {
        let start = self.slot(id)?;
        let mut closure = self.closure(start);
        closure.sort_unstable();
        Ok(closure)
    }

    /// Union of the descendant closures of `ids`, numerically sorted and
    /// free of duplicates. Closures are expanded in parallel.
    pub fn descendants_of_many(&self, ids: &[TaxonId]) -> Result<Vec<TaxonId>> {
        let slots = ids
            .iter()
            .map(|id| self.slot(*id))
            .collect::<Result<Vec<_>>>()?;

        let mut all: Vec<TaxonId> = slots
            .par_iter()
            .flat_map_iter(|&slot| self.closure(slot))
            .collect();
        all.par_sort_unstable();
        all.dedup();
        Ok(all)
    }

    /// Work-list expansion; the visited set keeps a corrupt (cyclic) dump
    /// from looping or yielding duplicates
    fn closure(&self, start: NodeIdx) -> Vec<TaxonId> {
        let mut visited = BitVec::from_elem(self.len(), false);
        let mut out = Vec::new();
        let mut stack = vec![start];

        while let Some(idx) = stack.pop() {
            if visited.get(idx.index()).unwrap_or(true) {
                continue;
            }
            visited.set(idx.index(), true);

            let node = self.node(idx);
            out.push(node.id());
            stack.extend(node.child_slots().iter().rev().copied());
        }
        out
    }

    /// Keep the identifiers whose division code equals `division` exactly
    pub fn filter_by_division(&self, ids: &[TaxonId], division: &str) -> Result<Vec<TaxonId>> {
        let target = self.division_slot(division);
        let mut kept = Vec::new();
        for &id in ids {
            let node = self.get(id)?;
            if target.is_some() && node.division_slot() == target {
                kept.push(id);
            }
        }
        Ok(kept)
    }

    /// Keep the identifiers of nodes without children
    pub fn filter_terminal(&self, ids: &[TaxonId]) -> Result<Vec<TaxonId>> {
        let mut kept = Vec::new();
        for &id in ids {
            if self.get(id)?.is_terminal() {
                kept.push(id);
            }
        }
        Ok(kept)
    }

    /// Path from `id` up to the root, leaf first
    ///
    /// Stops after the designated root, or at a node with no usable parent
    /// (another self-parented root, or a placeholder never defined).
    pub fn genealogy(&self, id: TaxonId) -> Result<Vec<TaxonId>> {
        let mut current = self.slot(id)?;
        let mut lineage = Vec::new();

        loop {
            let node = self.node(current);
            lineage.push(node.id());

            if node.id() == self.root_id() {
                break;
            }
            match node.parent_idx() {
                Some(parent) => current = parent,
                None => break,
            }
            if lineage.len() > self.len() {
                return Err(TaxforestError::CycleDetected(id));
            }
        }

        Ok(lineage)
    }

    /// Number of parent links between `id` and the top of its genealogy
    pub fn depth(&self, id: TaxonId) -> Result<usize> {
        Ok(self.genealogy(id)?.len() - 1)
    }

    /// Deepest node present in the genealogy of every identifier
    pub fn lowest_common_ancestor(&self, ids: &[TaxonId]) -> Result<TaxonId> {
        let (first, rest) = ids.split_first().ok_or(TaxforestError::EmptyQuery)?;

        let mut common = self.genealogy(*first)?;
        for id in rest {
            let other: HashSet<TaxonId> = self.genealogy(*id)?.into_iter().collect();
            common.retain(|ancestor| other.contains(ancestor));
        }

        common
            .first()
            .copied()
            .ok_or(TaxforestError::NoCommonAncestor)
    }
}
