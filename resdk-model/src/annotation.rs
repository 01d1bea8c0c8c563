//! Annotation resources: groups, fields and per-sample values.

use crate::resource::{Resource, ResourceState};
use crate::sample::AsSampleId;
use crate::error::ModelResult;
use resdk_types::ResourceId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Named group of annotation fields. Server managed, read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationGroup {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub state: ResourceState,
}

impl Resource for AnnotationGroup {
    // No endpoint exists yet; groups arrive embedded in their fields.
    const ENDPOINT: &'static str = "annotation_group";
    const READ_ONLY_FIELDS: &'static [&'static str] =
        &["id", "name", "sort_order", "label"];
    const WRITABLE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn state(&self) -> &ResourceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ResourceState {
        &mut self.state
    }
}

/// Value type of an annotation field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    #[default]
    String,
    Integer,
    Decimal,
    Date,
    #[serde(other)]
    Unknown,
}

/// Definition of one annotation, e.g. `general.species`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationField {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group: AnnotationGroup,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default, rename = "type")]
    pub field_type: AnnotationType,
    #[serde(default)]
    pub validator_regex: Option<String>,
    #[serde(default)]
    pub vocabulary: Option<Map<String, Value>>,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub state: ResourceState,
}

impl AnnotationField {
    /// Full `group.name` path of the field.
    pub fn path(&self) -> String {
        format!("{}.{}", self.group.name, self.name)
    }
}

impl fmt::Display for AnnotationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group.name, self.name)
    }
}

impl Resource for AnnotationField {
    const ENDPOINT: &'static str = "annotation_field";
    const READ_ONLY_FIELDS: &'static [&'static str] = &[
        "id",
        "description",
        "group",
        "label",
        "name",
        "sort_order",
        "type",
        "validator_regex",
        "vocabulary",
        "required",
    ];
    const WRITABLE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn state(&self) -> &ResourceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ResourceState {
        &mut self.state
    }
}

/// Value of an annotation field on one sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationValue {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default, deserialize_with = "crate::serde_id::option")]
    pub field: Option<ResourceId>,
    /// The annotated sample.
    #[serde(default, deserialize_with = "crate::serde_id::option")]
    pub entity: Option<ResourceId>,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub label: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub state: ResourceState,
}

impl AnnotationValue {
    /// Creates an unsaved value of `field` on `sample`.
    pub fn new(sample: impl AsSampleId, field: ResourceId, value: Value) -> ModelResult<Self> {
        Ok(Self {
            field: Some(field),
            entity: Some(sample.sample_id()?),
            value,
            ..Default::default()
        })
    }
}

impl Resource for AnnotationValue {
    const ENDPOINT: &'static str = "annotation_value";
    const READ_ONLY_FIELDS: &'static [&'static str] = &["id", "label"];
    const UPDATE_PROTECTED_FIELDS: &'static [&'static str] = &["entity", "field"];
    const WRITABLE_FIELDS: &'static [&'static str] = &["value"];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn state(&self) -> &ResourceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ResourceState {
        &mut self.state
    }
}
