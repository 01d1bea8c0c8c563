//! Client layer for the Resolwe scientific data REST service.
//!
//! Resolves ids and slugs into typed resources, lists resources by field
//! predicates, saves local edits and reconciles relation membership against
//! the server with a minimal set of calls.
//!
//! # Components
//!
//! - **Transport**: [`Transport`] abstracts the network; [`HttpTransport`]
//!   speaks JSON over reqwest, [`transport::mock::MockTransport`] keeps
//!   records in memory
//! - **Query**: [`ResolweQuery::get`] resolves one identifier,
//!   [`ResolweQuery::filter`] lists matches
//! - **Relations**: [`CollectionRelations`] creates group, compare, series and
//!   background relations; [`Resolwe::reconcile_relation`] applies a
//!   [`RelationDiff`](resdk_model::RelationDiff)
//!
//! # Example
//!
//! ```no_run
//! use resdk_client::{Resolwe, ResolweConfig};
//!
//! # async fn run() -> resdk_client::ClientResult<()> {
//! let resolwe = Resolwe::new(ResolweConfig::new("https://app.genialis.com"))?;
//! let collection = resolwe.collection().get("my-study").await?;
//! let samples = resolwe.collection_samples(&collection).await?;
//!
//! let relations = resolwe.relations(&collection)?;
//! relations
//!     .create_group_relation(&samples, &[], Some("replicates"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod http;
mod query;
mod relations;
mod resolwe;
pub mod transport;

pub use config::{ResolweConfig, ENV_API_TOKEN, ENV_HOST_URL, ENV_TIMEOUT_SECS};
pub use error::{ClientError, ClientResult};
pub use http::HttpTransport;
pub use query::ResolweQuery;
pub use relations::CollectionRelations;
pub use resolwe::Resolwe;
pub use transport::{QueryParams, Transport};

pub use resdk_model as model;
pub use resdk_types::{Identifier, ResourceId};
