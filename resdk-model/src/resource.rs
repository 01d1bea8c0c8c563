//! Base resource behaviour: payload materialization and field tracking.

use crate::error::{ModelError, ModelResult};
use resdk_types::ResourceId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Field values as last seen on the server.
///
/// Held by every resource (skipped during (de)serialization) so local edits
/// can be compared against the server state before saving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceState {
    original: Option<Map<String, Value>>,
}

impl ResourceState {
    /// Returns the recorded server value of `field`, if a snapshot exists.
    pub fn original(&self, field: &str) -> Option<&Value> {
        self.original.as_ref().and_then(|fields| fields.get(field))
    }

    /// Returns true once the resource has been materialized from a server payload.
    pub fn has_snapshot(&self) -> bool {
        self.original.is_some()
    }
}

/// A remote entity held locally as a typed schema plus unknown extra fields.
///
/// Implementors declare which fields the server owns (`READ_ONLY_FIELDS`),
/// which can only be set at creation (`UPDATE_PROTECTED_FIELDS`) and which the
/// client may change (`WRITABLE_FIELDS`). Field names are the JSON keys.
pub trait Resource: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + Sized {
    /// API endpoint name, e.g. `"sample"`.
    const ENDPOINT: &'static str;
    const READ_ONLY_FIELDS: &'static [&'static str];
    const UPDATE_PROTECTED_FIELDS: &'static [&'static str] = &[];
    const WRITABLE_FIELDS: &'static [&'static str];

    fn id(&self) -> Option<ResourceId>;

    fn slug(&self) -> Option<&str> {
        None
    }

    fn state(&self) -> &ResourceState;

    fn state_mut(&mut self) -> &mut ResourceState;

    /// Builds a resource from a raw server payload and records it as the
    /// clean server state.
    fn from_payload(payload: Value) -> ModelResult<Self> {
        let mut resource: Self = serde_json::from_value(payload)?;
        resource.mark_clean()?;
        Ok(resource)
    }

    /// Serializes the current field values.
    fn fields(&self) -> ModelResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            _ => Err(ModelError::NotAnObject(Self::ENDPOINT)),
        }
    }

    /// Records the current field values as the server state.
    fn mark_clean(&mut self) -> ModelResult<()> {
        let fields = self.fields()?;
        self.state_mut().original = Some(fields);
        Ok(())
    }

    fn is_saved(&self) -> bool {
        self.id().is_some()
    }

    /// Returns the id or fails for a resource that was never saved.
    fn require_id(&self) -> ModelResult<ResourceId> {
        self.id().ok_or(ModelError::Unsaved {
            endpoint: Self::ENDPOINT,
        })
    }

    /// Fails if a read-only field (or, once saved, an update-protected
    /// field) differs from the recorded server value.
    fn check_unchanged(&self) -> ModelResult<()> {
        let Some(original) = self.state().original.as_ref() else {
            return Ok(());
        };
        let current = self.fields()?;

        if let Some(field) = first_changed(Self::READ_ONLY_FIELDS, original, &current) {
            return Err(ModelError::ReadOnlyField(field.to_string()));
        }
        if self.is_saved() {
            if let Some(field) = first_changed(Self::UPDATE_PROTECTED_FIELDS, original, &current)
            {
                return Err(ModelError::UpdateProtectedField(field.to_string()));
            }
        }
        Ok(())
    }

    /// Writable fields whose value differs from the server state.
    ///
    /// Without a snapshot every writable field is considered changed.
    fn update_payload(&self) -> ModelResult<Map<String, Value>> {
        let current = self.fields()?;
        let original = self.state().original.as_ref();

        let mut payload = Map::new();
        for &field in Self::WRITABLE_FIELDS {
            let value = current.get(field).cloned().unwrap_or(Value::Null);
            let unchanged = original
                .map(|fields| same_value(fields.get(field), Some(&value)))
                .unwrap_or(false);
            if !unchanged {
                payload.insert(field.to_string(), value);
            }
        }
        Ok(payload)
    }

    /// Writable and update-protected fields that hold a value.
    fn create_payload(&self) -> ModelResult<Map<String, Value>> {
        let current = self.fields()?;
        let payload = Self::WRITABLE_FIELDS
            .iter()
            .chain(Self::UPDATE_PROTECTED_FIELDS)
            .filter_map(|&field| match current.get(field) {
                None | Some(Value::Null) => None,
                Some(value) => Some((field.to_string(), value.clone())),
            })
            .collect();
        Ok(payload)
    }
}

/// A missing key and an explicit `null` are the same value.
fn same_value(a: Option<&Value>, b: Option<&Value>) -> bool {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    a == b
}

fn first_changed<'a>(
    fields: &[&'a str],
    original: &Map<String, Value>,
    current: &Map<String, Value>,
) -> Option<&'a str> {
    fields
        .iter()
        .copied()
        .find(|&field| !same_value(original.get(field), current.get(field)))
}
