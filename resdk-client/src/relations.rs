//! Relation shortcuts and membership reconciliation.

use crate::error::ClientResult;
use crate::resolwe::{saved_id, Resolwe};
use resdk_model::{
    pair_entries, AsSampleId, ModelResult, NewRelation, Relation, RelationDiff, RelationKind,
};
use resdk_types::ResourceId;
use tracing::{debug, info, Instrument};

fn sample_ids<S: AsSampleId>(samples: &[S]) -> ModelResult<Vec<ResourceId>> {
    samples.iter().map(|sample| sample.sample_id()).collect()
}

impl Resolwe {
    /// Brings a relation's membership and label in line with the desired
    /// state using the fewest calls.
    ///
    /// Entries are matched on `(entity, position)`; `positions` is either
    /// empty or as long as `samples`. Additions go out in one call, then
    /// removals (by entity) in one call, then the label is saved if it
    /// differs. A failing step aborts the rest; completed steps are not
    /// rolled back, and reconciling again from a fresh fetch is safe.
    ///
    /// Returns the diff that was applied.
    pub async fn reconcile_relation<S: AsSampleId>(
        &self,
        relation: &mut Relation,
        samples: &[S],
        positions: &[&str],
        label: Option<&str>,
    ) -> ClientResult<RelationDiff> {
        let relation_id = saved_id(relation)?;
        let desired = pair_entries(&sample_ids(samples)?, positions)?;
        let diff = RelationDiff::compute(&relation.entities, &desired);

        async {
            debug!(
                relation = %relation_id,
                add = diff.to_add.len(),
                delete = diff.to_delete.len(),
                "Reconciling relation"
            );

            if !diff.to_add.is_empty() {
                self.relation_add_members(relation, &diff.to_add).await?;
            }
            if !diff.to_delete.is_empty() {
                self.relation_remove_members(relation, &diff.removed_entities())
                    .await?;
            }

            let label = label.map(str::to_string);
            if relation.label != label {
                info!(relation = %relation_id, ?label, "Updating relation label");
                let previous = std::mem::replace(&mut relation.label, label);
                if let Err(e) = self.save(relation).await {
                    // Keep the local label in step with the server.
                    relation.label = previous;
                    return Err(e);
                }
            }

            Ok(diff)
        }
        .instrument(self.span().clone())
        .await
    }
}

/// Relation shortcuts for one collection.
///
/// Obtained from [`Resolwe::relations`].
pub struct CollectionRelations<'a> {
    resolwe: &'a Resolwe,
    collection: ResourceId,
}

impl<'a> CollectionRelations<'a> {
    pub(crate) fn new(resolwe: &'a Resolwe, collection: ResourceId) -> Self {
        Self {
            resolwe,
            collection,
        }
    }

    pub fn collection_id(&self) -> ResourceId {
        self.collection
    }

    async fn create<S: AsSampleId>(
        &self,
        kind: RelationKind,
        samples: &[S],
        positions: &[&str],
        label: Option<&str>,
    ) -> ClientResult<Relation> {
        let entries = pair_entries(&sample_ids(samples)?, positions)?;
        let relation = NewRelation::new(kind, self.collection, entries, label);
        self.resolwe.create_relation(&relation).await
    }

    /// Creates a group relation, e.g. replicates.
    ///
    /// `positions` (e.g. `first`, `second`) is empty or as long as `samples`.
    pub async fn create_group_relation<S: AsSampleId>(
        &self,
        samples: &[S],
        positions: &[&str],
        label: Option<&str>,
    ) -> ClientResult<Relation> {
        self.create(RelationKind::Group, samples, positions, label)
            .await
    }

    /// Creates a compare relation, e.g. case/control.
    pub async fn create_compare_relation<S: AsSampleId>(
        &self,
        samples: &[S],
        positions: &[&str],
        label: Option<&str>,
    ) -> ClientResult<Relation> {
        self.create(RelationKind::Compare, samples, positions, label)
            .await
    }

    /// Creates a series relation, e.g. a time series with positions `1`, `2`, ...
    pub async fn create_series_relation<S: AsSampleId>(
        &self,
        samples: &[S],
        positions: &[&str],
        label: Option<&str>,
    ) -> ClientResult<Relation> {
        self.create(RelationKind::Series, samples, positions, label)
            .await
    }

    /// Pairs a sample with its background: a compare relation labeled
    /// `background` whose entries sit at the `sample` and `background`
    /// positions.
    pub async fn create_background_relation(
        &self,
        sample: impl AsSampleId,
        background: impl AsSampleId,
    ) -> ClientResult<Relation> {
        let relation =
            NewRelation::background(self.collection, sample.sample_id()?, background.sample_id()?);
        self.resolwe.create_relation(&relation).await
    }

    /// Fetches a relation by id and reconciles it with the desired state.
    pub async fn update_relation<S: AsSampleId>(
        &self,
        relation_id: ResourceId,
        samples: &[S],
        positions: &[&str],
        label: Option<&str>,
    ) -> ClientResult<RelationDiff> {
        // Input is rejected before the relation is fetched.
        pair_entries(&sample_ids(samples)?, positions)?;
        let mut relation = self.resolwe.relation().get_by_id(relation_id).await?;
        self.resolwe
            .reconcile_relation(&mut relation, samples, positions, label)
            .await
    }
}
