//! Identifier resolution and filtered listing for one resource type.

use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;
use resdk_model::Resource;
use resdk_types::{Identifier, ResourceId};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn, Instrument, Span};

/// Query handle for resources of type `R`.
///
/// Obtained from [`crate::Resolwe`], e.g. `resolwe.sample()`. Results are
/// never cached: every call issues its own request.
pub struct ResolweQuery<R: Resource> {
    transport: Arc<dyn Transport>,
    span: Span,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResolweQuery<R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            span: self.span.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResolweQuery<R> {
    pub(crate) fn new(transport: Arc<dyn Transport>, span: Span) -> Self {
        Self {
            transport,
            span,
            _resource: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        R::ENDPOINT
    }

    /// Resolves an id or slug to exactly one resource.
    ///
    /// Numeric identifiers (and all-digit strings) are fetched by id, anything
    /// else is looked up by slug. A resource that does not exist and one the
    /// caller may not see both fail with [`ClientError::NotFound`].
    pub async fn get(&self, identifier: impl Into<Identifier>) -> ClientResult<R> {
        let identifier = identifier.into();
        identifier.validate()?;

        match identifier {
            Identifier::Id(id) => self.get_by_id(id).await,
            Identifier::Slug(slug) => self.get_by_slug(&slug).await,
        }
    }

    /// Fetches a resource by numeric id.
    pub async fn get_by_id(&self, id: ResourceId) -> ClientResult<R> {
        async {
            debug!(endpoint = R::ENDPOINT, %id, "Resolving by id");
            let payload = match self.transport.fetch_one(R::ENDPOINT, id).await {
                Ok(payload) => payload,
                Err(e) if e.is_not_found() => {
                    return Err(ClientError::NotFound(format!(
                        "Id: {id} does not exist or you don't have access permission."
                    )));
                }
                Err(e) => return Err(e),
            };
            Ok(R::from_payload(payload)?)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Fetches a resource by slug.
    pub async fn get_by_slug(&self, slug: &str) -> ClientResult<R> {
        async {
            debug!(endpoint = R::ENDPOINT, slug, "Resolving by slug");
            let query = [("slug".to_string(), slug.to_string())];
            let matches = self.transport.fetch_list(R::ENDPOINT, &query).await?;

            if matches.len() > 1 {
                warn!(
                    endpoint = R::ENDPOINT,
                    slug,
                    count = matches.len(),
                    "Slug matched more than one resource, using the first"
                );
            }
            let payload = matches.into_iter().next().ok_or_else(|| {
                ClientError::NotFound(format!(
                    "Slug: {slug} does not exist or you don't have access permission."
                ))
            })?;
            Ok(R::from_payload(payload)?)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Lists resources matching the given field predicates, in server order.
    ///
    /// Predicates are forwarded verbatim as query parameters. An empty result
    /// is not an error.
    pub async fn filter<I, K, V>(&self, predicates: I) -> ClientResult<Vec<R>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let query: Vec<(String, String)> = predicates
            .into_iter()
            .map(|(key, value)| (key.into(), value.to_string()))
            .collect();

        async {
            debug!(endpoint = R::ENDPOINT, ?query, "Filtering");
            let records = self.transport.fetch_list(R::ENDPOINT, &query).await?;
            debug!(endpoint = R::ENDPOINT, count = records.len(), "Filter returned");
            records
                .into_iter()
                .map(|payload| R::from_payload(payload).map_err(ClientError::from))
                .collect()
        }
        .instrument(self.span.clone())
        .await
    }

    /// Lists every resource visible to the caller.
    pub async fn all(&self) -> ClientResult<Vec<R>> {
        self.filter(std::iter::empty::<(String, String)>()).await
    }
}
