//! Identifier and handle types shared by the taxonomy modules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// NCBI taxonomy identifier - newtype pattern for type safety
///
/// Dump identifiers are parsed once into this numeric form, so ordering is
/// numeric (`9 < 10`) and `Display` gives back the dump's string form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaxonId(pub u32);

impl TaxonId {
    /// Parent sentinel for nodes whose own record has not been read
    pub const UNASSIGNED: Self = Self(0);
    pub const ROOT: Self = Self(1);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_unassigned(&self) -> bool {
        *self == Self::UNASSIGNED
    }
}

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaxonId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

impl From<u32> for TaxonId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<TaxonId> for u32 {
    fn from(taxon: TaxonId) -> Self {
        taxon.0
    }
}

/// Arena slot of a node inside a [`Forest`](super::Forest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub(crate) u32);

impl NodeIdx {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Slot of a scientific name inside a [`NameIndex`](super::NameIndex)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameId(pub(crate) u32);

/// Slot of an interned division code inside a [`Forest`](super::Forest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DivisionId(pub(crate) u32);
