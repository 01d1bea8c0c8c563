//! Minimal membership diff between a relation's current and desired entries.

use crate::relation::MembershipEntry;
use resdk_types::ResourceId;

/// Entries to add and remove so that the current membership becomes the
/// desired one.
///
/// Matching is by full entry (entity and position), one occurrence at a
/// time, so duplicates are accounted for. Moving an entity to another
/// position therefore shows up as a delete plus an add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationDiff {
    pub to_add: Vec<MembershipEntry>,
    pub to_delete: Vec<MembershipEntry>,
}

impl RelationDiff {
    pub fn compute(current: &[MembershipEntry], desired: &[MembershipEntry]) -> Self {
        let mut to_delete = current.to_vec();
        let mut to_add = Vec::new();

        for entry in desired {
            match to_delete.iter().position(|existing| existing == entry) {
                Some(index) => {
                    to_delete.remove(index);
                }
                None => to_add.push(entry.clone()),
            }
        }

        Self { to_add, to_delete }
    }

    /// Returns true if current and desired membership already match.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_delete.is_empty()
    }

    /// Entity ids to remove, each once, in deletion order. Removal is keyed
    /// by entity only.
    pub fn removed_entities(&self) -> Vec<ResourceId> {
        let mut ids: Vec<ResourceId> = Vec::with_capacity(self.to_delete.len());
        for entry in &self.to_delete {
            if !ids.contains(&entry.entity) {
                ids.push(entry.entity);
            }
        }
        ids
    }
}
