//! Samples and collections, and the sample id conversion used by relations.

use crate::error::{ModelError, ModelResult};
use crate::resource::{Resource, ResourceState};
use chrono::{DateTime, Utc};
use resdk_types::ResourceId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A biological sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "crate::serde_id::option")]
    pub collection: Option<ResourceId>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    /// Fields the typed schema does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub state: ResourceState,
}

impl Sample {
    /// Creates an unsaved sample with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Resource for Sample {
    const ENDPOINT: &'static str = "sample";
    const READ_ONLY_FIELDS: &'static [&'static str] =
        &["id", "created", "modified", "contributor"];
    const WRITABLE_FIELDS: &'static [&'static str] =
        &["name", "slug", "description", "tags", "collection"];

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

/// A collection groups samples and owns their relations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub state: ResourceState,
}

impl Collection {
    /// Creates an unsaved collection with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Resource for Collection {
    const ENDPOINT: &'static str = "collection";
    const READ_ONLY_FIELDS: &'static [&'static str] =
        &["id", "created", "modified", "contributor"];
    const WRITABLE_FIELDS: &'static [&'static str] = &["name", "slug", "description", "tags"];

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

/// Anything that can stand in for a sample in a relation: a raw id or a
/// sample object.
pub trait AsSampleId {
    fn sample_id(&self) -> ModelResult<ResourceId>;
}

impl AsSampleId for ResourceId {
    fn sample_id(&self) -> ModelResult<ResourceId> {
        Ok(*self)
    }
}

impl AsSampleId for u64 {
    fn sample_id(&self) -> ModelResult<ResourceId> {
        Ok(ResourceId::new(*self))
    }
}

impl AsSampleId for Sample {
    fn sample_id(&self) -> ModelResult<ResourceId> {
        self.id.ok_or_else(|| {
            ModelError::InvalidArgument(format!(
                "sample {:?} has no id; save it before adding it to a relation",
                self.name.as_deref().unwrap_or("<unnamed>")
            ))
        })
    }
}

impl<T: AsSampleId + ?Sized> AsSampleId for &T {
    fn sample_id(&self) -> ModelResult<ResourceId> {
        (**self).sample_id()
    }
}

/// Returns the id of a sample given either form.
pub fn get_sample_id(sample: &impl AsSampleId) -> ModelResult<ResourceId> {
    sample.sample_id()
}
