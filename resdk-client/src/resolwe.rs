//! The client entry point.

use crate::config::ResolweConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpTransport;
use crate::query::ResolweQuery;
use crate::relations::CollectionRelations;
use crate::transport::Transport;
use resdk_model::{
    AnnotationField, AnnotationValue, Collection, MembershipEntry, ModelError, NewRelation,
    Relation, Resource, Sample,
};
use resdk_types::ResourceId;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument, Span};

/// Connection to a Resolwe server.
///
/// Cheap to clone; clones share the transport. All operations log inside the
/// client's span, which can be replaced with [`Resolwe::with_span`].
#[derive(Clone)]
pub struct Resolwe {
    transport: Arc<dyn Transport>,
    span: Span,
}

impl Resolwe {
    /// Connects over HTTP using the given configuration.
    pub fn new(config: ResolweConfig) -> ClientResult<Self> {
        let span = info_span!("resolwe", url = %config.url);
        let transport = HttpTransport::new(config)?;
        Ok(Self {
            transport: Arc::new(transport),
            span,
        })
    }

    /// Connects using `RESOLWE_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ResolweConfig::from_env()?)
    }

    /// Uses an existing transport (e.g. a mock in tests).
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            span: info_span!("resolwe"),
        }
    }

    /// Replaces the span every operation is logged in.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Query handle for any resource type.
    pub fn query<R: Resource>(&self) -> ResolweQuery<R> {
        ResolweQuery::new(Arc::clone(&self.transport), self.span.clone())
    }

    pub fn sample(&self) -> ResolweQuery<Sample> {
        self.query()
    }

    pub fn collection(&self) -> ResolweQuery<Collection> {
        self.query()
    }

    pub fn relation(&self) -> ResolweQuery<Relation> {
        self.query()
    }

    pub fn annotation_field(&self) -> ResolweQuery<AnnotationField> {
        self.query()
    }

    pub fn annotation_value(&self) -> ResolweQuery<AnnotationValue> {
        self.query()
    }

    /// Creates or updates a resource; last write wins.
    ///
    /// An unsaved resource is created from its set writable and
    /// update-protected fields. A saved one is validated against its read-only
    /// fields and patched with the writable fields that changed; with no
    /// changes nothing is sent. The server response replaces the local object.
    pub async fn save<R: Resource>(&self, resource: &mut R) -> ClientResult<()> {
        async {
            let stored = match resource.id() {
                None => {
                    let payload = Value::Object(resource.create_payload()?);
                    info!(endpoint = R::ENDPOINT, "Creating resource");
                    self.transport.create(R::ENDPOINT, &payload).await?
                }
                Some(id) => {
                    resource.check_unchanged()?;
                    let payload = resource.update_payload()?;
                    if payload.is_empty() {
                        debug!(endpoint = R::ENDPOINT, %id, "No changes to save");
                        return Ok(());
                    }
                    debug!(
                        endpoint = R::ENDPOINT,
                        %id,
                        fields = ?payload.keys().collect::<Vec<_>>(),
                        "Saving resource"
                    );
                    self.transport
                        .save(R::ENDPOINT, id, &Value::Object(payload))
                        .await?
                }
            };
            *resource = R::from_payload(stored)?;
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }

    /// Relation shortcuts scoped to a saved collection.
    pub fn relations(&self, collection: &Collection) -> ClientResult<CollectionRelations<'_>> {
        Ok(CollectionRelations::new(self, saved_id(collection)?))
    }

    /// Creates a relation from a prepared payload.
    pub async fn create_relation(&self, relation: &NewRelation) -> ClientResult<Relation> {
        async {
            info!(
                kind = %relation.kind,
                collection = %relation.collection,
                entities = relation.entities.len(),
                "Creating relation"
            );
            let payload = serde_json::to_value(relation)?;
            let stored = self.transport.create(Relation::ENDPOINT, &payload).await?;
            Ok(Relation::from_payload(stored)?)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Adds members to a relation in one call and records them locally.
    pub async fn relation_add_members(
        &self,
        relation: &mut Relation,
        members: &[MembershipEntry],
    ) -> ClientResult<()> {
        let relation_id = saved_id(relation)?;
        async {
            debug!(relation = %relation_id, count = members.len(), "Adding relation members");
            self.transport.add_members(relation_id, members).await?;
            relation.apply_added(members);
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }

    /// Removes entities from a relation in one call and drops them locally.
    pub async fn relation_remove_members(
        &self,
        relation: &mut Relation,
        entity_ids: &[ResourceId],
    ) -> ClientResult<()> {
        let relation_id = saved_id(relation)?;
        async {
            debug!(relation = %relation_id, count = entity_ids.len(), "Removing relation members");
            self.transport.remove_members(relation_id, entity_ids).await?;
            relation.apply_removed(entity_ids);
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }

    /// The field an annotation value belongs to.
    pub async fn annotation_value_field(
        &self,
        value: &AnnotationValue,
    ) -> ClientResult<AnnotationField> {
        let field = value.field.ok_or_else(|| {
            ClientError::InvalidArgument("annotation field must be set before it can be used".into())
        })?;
        self.annotation_field().get_by_id(field).await
    }

    /// The sample an annotation value is attached to.
    pub async fn annotation_value_sample(&self, value: &AnnotationValue) -> ClientResult<Sample> {
        let entity = value.entity.ok_or_else(|| {
            ClientError::InvalidArgument("annotation value is not attached to a sample".into())
        })?;
        self.sample().get_by_id(entity).await
    }

    /// Annotation values of a sample.
    pub async fn sample_annotations(&self, sample: &Sample) -> ClientResult<Vec<AnnotationValue>> {
        let id = saved_id(sample)?;
        self.annotation_value().filter([("entity", id)]).await
    }

    /// Samples in a collection.
    pub async fn collection_samples(&self, collection: &Collection) -> ClientResult<Vec<Sample>> {
        let id = saved_id(collection)?;
        self.sample().filter([("collection", id)]).await
    }

    /// Relations owned by a collection.
    pub async fn collection_relations(
        &self,
        collection: &Collection,
    ) -> ClientResult<Vec<Relation>> {
        let id = saved_id(collection)?;
        self.relation().filter([("collection", id)]).await
    }
}

/// Id of a resource that must already exist on the server.
pub(crate) fn saved_id<R: Resource>(resource: &R) -> ClientResult<ResourceId> {
    resource.require_id().map_err(|e| match e {
        ModelError::Unsaved { .. } => ClientError::InvalidArgument(e.to_string()),
        other => other.into(),
    })
}
