//! Relations: typed groupings of samples with optional positions.

use crate::error::{ModelError, ModelResult};
use crate::resource::{Resource, ResourceState};
use chrono::{DateTime, Utc};
use resdk_types::ResourceId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Label of a background compare relation.
pub const BACKGROUND_LABEL: &str = "background";
/// Position of the measured sample in a background relation.
pub const SAMPLE_POSITION: &str = "sample";
/// Position of the background sample in a background relation.
pub const BACKGROUND_POSITION: &str = "background";

/// Kind of a relation.
///
/// A background relation is not a kind of its own: it is a `Compare`
/// relation labeled [`BACKGROUND_LABEL`] (see [`Relation::is_background`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    #[default]
    Group,
    Compare,
    Series,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Group => "group",
            RelationKind::Compare => "compare",
            RelationKind::Series => "series",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(entity, position)` pair of a relation.
///
/// Two entries are equal only if both entity and position match; a missing
/// position is a value of its own, not a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MembershipEntry {
    #[serde(deserialize_with = "crate::serde_id::deserialize")]
    pub entity: ResourceId,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<String>,
}

/// Server entries may carry `""` for no position.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|p| !p.is_empty()))
}

impl MembershipEntry {
    /// Creates an entry; an empty position counts as no position.
    pub fn new(entity: ResourceId, position: Option<&str>) -> Self {
        Self {
            entity,
            position: position.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    /// Entry without a position.
    pub fn unpositioned(entity: ResourceId) -> Self {
        Self::new(entity, None)
    }
}

/// Pairs entities with positions element-wise.
///
/// `positions` is either empty (no entity has a position) or exactly as long
/// as `entities`; any other length is rejected.
pub fn pair_entries(
    entities: &[ResourceId],
    positions: &[&str],
) -> ModelResult<Vec<MembershipEntry>> {
    if !positions.is_empty() && positions.len() != entities.len() {
        return Err(ModelError::InvalidArgument(format!(
            "samples and positions must have the same length ({} samples, {} positions)",
            entities.len(),
            positions.len()
        )));
    }

    Ok(entities
        .iter()
        .enumerate()
        .map(|(i, &entity)| MembershipEntry::new(entity, positions.get(i).copied()))
        .collect())
}

/// A relation as stored on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    #[serde(default, deserialize_with = "crate::serde_id::option")]
    pub collection: Option<ResourceId>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    /// Membership in server order.
    #[serde(default)]
    pub entities: Vec<MembershipEntry>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub state: ResourceState,
}

impl Relation {
    /// Returns true for a two-sample compare relation labeled as background
    /// with the sample/background positions.
    pub fn is_background(&self) -> bool {
        self.background_pair().is_some()
    }

    /// Returns `(sample, background)` ids of a background relation.
    pub fn background_pair(&self) -> Option<(ResourceId, ResourceId)> {
        if self.kind != RelationKind::Compare
            || self.label.as_deref() != Some(BACKGROUND_LABEL)
            || self.entities.len() != 2
        {
            return None;
        }
        let find = |position: &str| {
            self.entities
                .iter()
                .find(|e| e.position.as_deref() == Some(position))
                .map(|e| e.entity)
        };
        Some((find(SAMPLE_POSITION)?, find(BACKGROUND_POSITION)?))
    }

    /// Entity ids in membership order.
    pub fn entity_ids(&self) -> Vec<ResourceId> {
        self.entities.iter().map(|e| e.entity).collect()
    }

    /// Appends entries after a successful add call.
    pub fn apply_added(&mut self, added: &[MembershipEntry]) {
        self.entities.extend_from_slice(added);
    }

    /// Drops every entry of the given entities after a successful remove call.
    pub fn apply_removed(&mut self, removed: &[ResourceId]) {
        self.entities.retain(|e| !removed.contains(&e.entity));
    }
}

impl Resource for Relation {
    const ENDPOINT: &'static str = "relation";
    const READ_ONLY_FIELDS: &'static [&'static str] =
        &["id", "created", "modified", "contributor"];
    const UPDATE_PROTECTED_FIELDS: &'static [&'static str] = &["type", "collection"];
    // `entities` is managed through the add/remove member calls.
    const WRITABLE_FIELDS: &'static [&'static str] = &["slug", "category", "label"];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn state(&self) -> &ResourceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ResourceState {
        &mut self.state
    }
}

/// Creation payload of a relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRelation {
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub collection: ResourceId,
    pub entities: Vec<MembershipEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl NewRelation {
    /// Builds the payload; an empty label is dropped.
    pub fn new(
        kind: RelationKind,
        collection: ResourceId,
        entities: Vec<MembershipEntry>,
        label: Option<&str>,
    ) -> Self {
        Self {
            kind,
            collection,
            entities,
            label: label.filter(|l| !l.is_empty()).map(str::to_string),
        }
    }

    /// Payload of a background relation between `sample` and `background`.
    pub fn background(collection: ResourceId, sample: ResourceId, background: ResourceId) -> Self {
        Self::new(
            RelationKind::Compare,
            collection,
            vec![
                MembershipEntry::new(sample, Some(SAMPLE_POSITION)),
                MembershipEntry::new(background, Some(BACKGROUND_POSITION)),
            ],
            Some(BACKGROUND_LABEL),
        )
    }
}
