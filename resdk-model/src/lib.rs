//! Resource model for the Resolwe client layer.
//!
//! Defines the local representation of remote resources and the pure parts
//! of relation reconciliation:
//! - [`Resource`]: typed schema + snapshot based field tracking shared by every resource
//! - [`Sample`], [`Collection`], [`Relation`] and the annotation resources
//! - [`MembershipEntry`]: one `(entity, position)` pair inside a relation
//! - [`RelationDiff`]: minimal add/remove sets between current and desired membership
//!
//! Nothing in this crate performs I/O. Fetching, saving and applying a diff
//! live in `resdk-client`.

mod annotation;
mod diff;
mod error;
mod relation;
mod resource;
mod sample;

pub mod serde_id;

pub use annotation::{AnnotationField, AnnotationGroup, AnnotationType, AnnotationValue};
pub use diff::RelationDiff;
pub use error::{ModelError, ModelResult};
pub use relation::{
    pair_entries, MembershipEntry, NewRelation, Relation, RelationKind, BACKGROUND_LABEL,
    BACKGROUND_POSITION, SAMPLE_POSITION,
};
pub use resource::{Resource, ResourceState};
pub use sample::{get_sample_id, AsSampleId, Collection, Sample};

pub use resdk_types::{Identifier, ResourceId};
