//! Per-run fixture registry

use std::collections::BTreeMap;

use crate::common::{Error, Result};

use super::ResourceKind;

/// Resolved fixture ids per resource kind
///
/// Each kind is recorded exactly once per run, possibly with an empty set.
/// Ids are opaque; index 0 is the fixture dependent operations use.
#[derive(Debug, Default, Clone)]
pub struct FixtureRegistry {
    entries: BTreeMap<ResourceKind, Vec<String>>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the resolved set for a kind
    pub fn record(&mut self, kind: ResourceKind, ids: Vec<String>) -> Result<()> {
        if self.entries.contains_key(&kind) {
            return Err(Error::AlreadyRecorded(kind));
        }
        self.entries.insert(kind, ids);
        Ok(())
    }

    /// Whether resolution has already run for a kind
    pub fn is_resolved(&self, kind: ResourceKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Resolved ids for a kind; empty if unresolved or nothing was found
    pub fn ids(&self, kind: ResourceKind) -> &[String] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The fixture of a kind
    pub fn first(&self, kind: ResourceKind) -> Option<&str> {
        self.ids(kind).first().map(String::as_str)
    }

    /// First id of every listed kind, or the first kind that has none
    pub fn require(&self, kinds: &[ResourceKind]) -> std::result::Result<Vec<&str>, ResourceKind> {
        kinds
            .iter()
            .map(|kind| self.first(*kind).ok_or(*kind))
            .collect()
    }

    /// Recorded kinds with their ids
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &[String])> {
        self.entries.iter().map(|(kind, ids)| (*kind, ids.as_slice()))
    }
}
