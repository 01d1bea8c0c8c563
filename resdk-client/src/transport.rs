//! Transport abstraction.
//!
//! The client core never talks HTTP directly. Every network operation goes
//! through [`Transport`], so resolution, filtering and reconciliation can run
//! against the reqwest backed [`crate::HttpTransport`] or the in-memory
//! [`mock::MockTransport`].

use crate::error::ClientResult;
use async_trait::async_trait;
use resdk_model::MembershipEntry;
use resdk_types::ResourceId;
use serde_json::Value;

/// Query parameters forwarded verbatim to a list endpoint.
pub type QueryParams = [(String, String)];

/// Logical operations against the remote service.
///
/// A missing (or invisible) resource is reported as an error for which
/// [`crate::ClientError::is_not_found`] returns true.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches a single record by id.
    async fn fetch_one(&self, endpoint: &str, id: ResourceId) -> ClientResult<Value>;

    /// Fetches every record matching the query, across all pages, in
    /// server order.
    async fn fetch_list(&self, endpoint: &str, query: &QueryParams) -> ClientResult<Vec<Value>>;

    /// Creates a record and returns the stored payload.
    async fn create(&self, endpoint: &str, payload: &Value) -> ClientResult<Value>;

    /// Partially updates a record and returns the stored payload.
    async fn save(&self, endpoint: &str, id: ResourceId, payload: &Value) -> ClientResult<Value>;

    /// Adds members to a relation in one call.
    async fn add_members(
        &self,
        relation_id: ResourceId,
        members: &[MembershipEntry],
    ) -> ClientResult<()>;

    /// Removes every membership of the given entities from a relation in one call.
    async fn remove_members(
        &self,
        relation_id: ResourceId,
        entity_ids: &[ResourceId],
    ) -> ClientResult<()>;
}

/// In-memory transport for tests.
pub mod mock {
    use super::*;
    use crate::error::ClientError;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Mutex, MutexGuard};

    /// Endpoint holding relation records.
    const RELATION_ENDPOINT: &str = "relation";

    /// A recorded transport call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        FetchOne {
            endpoint: String,
            id: ResourceId,
        },
        FetchList {
            endpoint: String,
            query: Vec<(String, String)>,
        },
        Create {
            endpoint: String,
            payload: Value,
        },
        Save {
            endpoint: String,
            id: ResourceId,
            payload: Value,
        },
        AddMembers {
            relation_id: ResourceId,
            members: Vec<MembershipEntry>,
        },
        RemoveMembers {
            relation_id: ResourceId,
            entity_ids: Vec<ResourceId>,
        },
    }

    /// Kind of a transport call, used to inject failures.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum CallKind {
        FetchOne,
        FetchList,
        Create,
        Save,
        AddMembers,
        RemoveMembers,
    }

    impl Call {
        pub fn kind(&self) -> CallKind {
            match self {
                Call::FetchOne { .. } => CallKind::FetchOne,
                Call::FetchList { .. } => CallKind::FetchList,
                Call::Create { .. } => CallKind::Create,
                Call::Save { .. } => CallKind::Save,
                Call::AddMembers { .. } => CallKind::AddMembers,
                Call::RemoveMembers { .. } => CallKind::RemoveMembers,
            }
        }
    }

    #[derive(Debug, Default)]
    struct MockState {
        records: BTreeMap<String, Vec<Value>>,
        calls: Vec<Call>,
        failures: HashMap<CallKind, (u16, String)>,
        next_id: u64,
    }

    impl MockState {
        fn find_mut(&mut self, endpoint: &str, id: ResourceId) -> Option<&mut Value> {
            self.records
                .get_mut(endpoint)?
                .iter_mut()
                .find(|record| record_id(record) == Some(id))
        }

        /// Records the call, then fails it if a failure is configured.
        fn begin(&mut self, call: Call) -> ClientResult<()> {
            let kind = call.kind();
            self.calls.push(call);
            match self.failures.get(&kind) {
                Some((status, message)) => Err(ClientError::Remote {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    /// A transport backed by an in-memory record store.
    ///
    /// Records are plain JSON objects grouped by endpoint. Every call is
    /// recorded (including failed ones) so tests can assert exactly which
    /// requests were issued and in what order.
    #[derive(Debug)]
    pub struct MockTransport {
        state: Mutex<MockState>,
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockTransport {
        /// Creates an empty store. Created records get ids from 1000 upward.
        pub fn new() -> Self {
            Self {
                state: Mutex::new(MockState {
                    next_id: 1000,
                    ..Default::default()
                }),
            }
        }

        fn lock(&self) -> MutexGuard<'_, MockState> {
            self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        /// Adds a record to an endpoint.
        pub fn insert(&self, endpoint: &str, record: Value) {
            self.lock()
                .records
                .entry(endpoint.to_string())
                .or_default()
                .push(record);
        }

        /// Builder form of [`MockTransport::insert`].
        pub fn with_record(self, endpoint: &str, record: Value) -> Self {
            self.insert(endpoint, record);
            self
        }

        /// Returns the stored record, if any.
        pub fn record(&self, endpoint: &str, id: ResourceId) -> Option<Value> {
            self.lock().find_mut(endpoint, id).map(|record| record.clone())
        }

        /// Makes every call of `kind` fail with the given status.
        pub fn fail_on(&self, kind: CallKind, status: u16, message: impl Into<String>) {
            self.lock().failures.insert(kind, (status, message.into()));
        }

        /// Removes all injected failures.
        pub fn clear_failures(&self) {
            self.lock().failures.clear();
        }

        /// All calls so far, in order.
        pub fn calls(&self) -> Vec<Call> {
            self.lock().calls.clone()
        }

        /// Calls of one kind, in order.
        pub fn calls_of(&self, kind: CallKind) -> Vec<Call> {
            self.lock()
                .calls
                .iter()
                .filter(|call| call.kind() == kind)
                .cloned()
                .collect()
        }

        pub fn call_count(&self) -> usize {
            self.lock().calls.len()
        }

        pub fn clear_calls(&self) {
            self.lock().calls.clear();
        }
    }

    fn not_found() -> ClientError {
        ClientError::Remote {
            status: 404,
            message: "Not found.".to_string(),
        }
    }

    fn record_id(record: &Value) -> Option<ResourceId> {
        record.get("id")?.as_u64().map(ResourceId::new)
    }

    /// String form used to match query predicates against record fields.
    fn predicate_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Object(fields) => fields.get("id").map(predicate_value).unwrap_or_default(),
            other => other.to_string(),
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn fetch_one(&self, endpoint: &str, id: ResourceId) -> ClientResult<Value> {
            let mut state = self.lock();
            state.begin(Call::FetchOne {
                endpoint: endpoint.to_string(),
                id,
            })?;
            state.find_mut(endpoint, id).cloned().ok_or_else(not_found)
        }

        async fn fetch_list(
            &self,
            endpoint: &str,
            query: &QueryParams,
        ) -> ClientResult<Vec<Value>> {
            let mut state = self.lock();
            state.begin(Call::FetchList {
                endpoint: endpoint.to_string(),
                query: query.to_vec(),
            })?;
            let records = state.records.get(endpoint).cloned().unwrap_or_default();
            Ok(records
                .into_iter()
                .filter(|record| {
                    query.iter().all(|(key, expected)| {
                        record
                            .get(key)
                            .is_some_and(|value| predicate_value(value) == *expected)
                    })
                })
                .collect())
        }

        async fn create(&self, endpoint: &str, payload: &Value) -> ClientResult<Value> {
            let mut state = self.lock();
            state.begin(Call::Create {
                endpoint: endpoint.to_string(),
                payload: payload.clone(),
            })?;
            let mut record = payload.clone();
            let Some(fields) = record.as_object_mut() else {
                return Err(ClientError::Remote {
                    status: 400,
                    message: "expected a JSON object".to_string(),
                });
            };
            if !fields.contains_key("id") {
                let id = state.next_id;
                state.next_id += 1;
                fields.insert("id".to_string(), Value::from(id));
            }
            state
                .records
                .entry(endpoint.to_string())
                .or_default()
                .push(record.clone());
            Ok(record)
        }

        async fn save(&self, endpoint: &str, id: ResourceId, payload: &Value) -> ClientResult<Value> {
            let mut state = self.lock();
            state.begin(Call::Save {
                endpoint: endpoint.to_string(),
                id,
                payload: payload.clone(),
            })?;
            let record = state.find_mut(endpoint, id).ok_or_else(not_found)?;
            if let (Some(fields), Some(changes)) = (record.as_object_mut(), payload.as_object()) {
                for (key, value) in changes {
                    fields.insert(key.clone(), value.clone());
                }
            }
            Ok(record.clone())
        }

        async fn add_members(
            &self,
            relation_id: ResourceId,
            members: &[MembershipEntry],
        ) -> ClientResult<()> {
            let mut state = self.lock();
            state.begin(Call::AddMembers {
                relation_id,
                members: members.to_vec(),
            })?;
            let record = state
                .find_mut(RELATION_ENDPOINT, relation_id)
                .ok_or_else(not_found)?;
            let mut entities = record
                .get("entities")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for member in members {
                entities.push(serde_json::to_value(member)?);
            }
            record["entities"] = Value::Array(entities);
            Ok(())
        }

        async fn remove_members(
            &self,
            relation_id: ResourceId,
            entity_ids: &[ResourceId],
        ) -> ClientResult<()> {
            let mut state = self.lock();
            state.begin(Call::RemoveMembers {
                relation_id,
                entity_ids: entity_ids.to_vec(),
            })?;
            let record = state
                .find_mut(RELATION_ENDPOINT, relation_id)
                .ok_or_else(not_found)?;
            if let Some(entities) = record.get_mut("entities").and_then(Value::as_array_mut) {
                entities.retain(|entry| {
                    let entity = entry.get("entity").map(predicate_value);
                    !entity_ids
                        .iter()
                        .any(|id| entity.as_deref() == Some(id.to_string().as_str()))
                });
            }
            Ok(())
        }
    }
}
