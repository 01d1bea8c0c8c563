//! Shared fixtures for client tests.

#![allow(dead_code)]

use resdk_client::transport::mock::MockTransport;
use resdk_client::Resolwe;
use serde_json::{json, Value};
use std::sync::Arc;

/// Routes client logs to the test harness output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("resdk_client=debug")
        .with_test_writer()
        .try_init();
}

/// A client over a fresh mock transport, plus the transport for assertions.
pub fn mock_client() -> (Resolwe, Arc<MockTransport>) {
    init_tracing();
    let transport = Arc::new(MockTransport::new());
    let resolwe = Resolwe::with_transport(transport.clone());
    (resolwe, transport)
}

pub fn sample_record(id: u64, slug: &str, collection: u64) -> Value {
    json!({
        "id": id,
        "slug": slug,
        "name": format!("Sample {id}"),
        "tags": [],
        "collection": {"id": collection, "slug": "study"},
        "contributor": {"id": 1, "username": "admin"},
        "created": "2024-03-01T10:00:00Z",
        "modified": "2024-03-01T10:00:00Z"
    })
}

pub fn collection_record(id: u64, slug: &str) -> Value {
    json!({
        "id": id,
        "slug": slug,
        "name": "Study",
        "tags": [],
        "contributor": {"id": 1, "username": "admin"}
    })
}

/// A relation record; `entities` is a list of `(entity, position)` pairs.
pub fn relation_record(
    id: u64,
    kind: &str,
    collection: u64,
    label: Option<&str>,
    entities: &[(u64, Option<&str>)],
) -> Value {
    let entities: Vec<Value> = entities
        .iter()
        .map(|(entity, position)| match position {
            Some(position) => json!({"entity": entity, "position": position}),
            None => json!({"entity": entity}),
        })
        .collect();
    json!({
        "id": id,
        "type": kind,
        "collection": {"id": collection},
        "category": "replicates",
        "label": label,
        "entities": entities
    })
}

/// Mock pre-loaded with collection 1 (`study`), samples 1..=4 and one
/// group relation (id 10) holding samples 1 and 2 without positions.
pub fn seeded_client() -> (Resolwe, Arc<MockTransport>) {
    let (resolwe, transport) = mock_client();
    transport.insert("collection", collection_record(1, "study"));
    for id in 1..=4 {
        transport.insert("sample", sample_record(id, &format!("sample-{id}"), 1));
    }
    transport.insert(
        "relation",
        relation_record(10, "group", 1, Some("replicates"), &[(1, None), (2, None)]),
    );
    (resolwe, transport)
}
