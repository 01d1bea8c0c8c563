//! Deserializers for related-resource references.
//!
//! The server sends a related resource either as its bare id or as an
//! embedded object carrying an `id` key. Both forms collapse to a
//! [`ResourceId`]; serialization always writes the bare id.

use resdk_types::ResourceId;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdOrObject {
    Id(ResourceId),
    Object { id: ResourceId },
}

impl From<IdOrObject> for ResourceId {
    fn from(raw: IdOrObject) -> Self {
        match raw {
            IdOrObject::Id(id) | IdOrObject::Object { id } => id,
        }
    }
}

/// Deserializes a required reference.
pub fn deserialize<'de, D>(deserializer: D) -> Result<ResourceId, D::Error>
where
    D: Deserializer<'de>,
{
    IdOrObject::deserialize(deserializer).map(ResourceId::from)
}

/// Deserializes an optional reference; `null` maps to `None`.
pub fn option<'de, D>(deserializer: D) -> Result<Option<ResourceId>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IdOrObject>::deserialize(deserializer).map(|raw| raw.map(ResourceId::from))
}
