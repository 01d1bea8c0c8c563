mod common;

use pretty_assertions::assert_eq;
use resdk_client::model::MembershipEntry;
use resdk_client::{ClientError, HttpTransport, Resolwe, ResolweConfig, ResourceId, Transport};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_config(server: &MockServer) -> ResolweConfig {
    ResolweConfig::new(server.uri())
}

fn client(server: &MockServer) -> Resolwe {
    common::init_tracing();
    Resolwe::new(mock_config(server)).unwrap()
}

fn sample_json(id: u64, slug: &str) -> serde_json::Value {
    json!({"id": id, "slug": slug, "name": slug, "tags": [], "collection": 1})
}

// ── Transport construction ──────────────────────────────────────

#[test]
fn http_transport_keeps_config() {
    let cfg = ResolweConfig {
        timeout_secs: 5,
        ..ResolweConfig::new("http://localhost:1")
    };
    let transport = HttpTransport::new(cfg).unwrap();
    assert_eq!(transport.config().timeout_secs, 5);
    assert_eq!(transport.config().url, "http://localhost:1");
}

// ── Fetch ───────────────────────────────────────────────────────

#[tokio::test]
async fn get_by_id_issues_get_on_record_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sample/7"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_json(7, "liver")))
        .expect(1)
        .mount(&server)
        .await;

    let sample = client(&server).sample().get(7u64).await.unwrap();

    assert_eq!(sample.id, Some(ResourceId::new(7)));
    assert_eq!(sample.collection, Some(ResourceId::new(1)));
}

#[tokio::test]
async fn http_404_resolves_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sample/12345"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let err = client(&server).sample().get(12345u64).await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(err.to_string().contains("Id: 12345"));
}

#[tokio::test]
async fn slug_lookup_queries_list_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sample"))
        .and(query_param("slug", "liver"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([sample_json(7, "liver")])))
        .expect(1)
        .mount(&server)
        .await;

    let sample = client(&server).sample().get("liver").await.unwrap();

    assert_eq!(sample.id, Some(ResourceId::new(7)));
}

#[tokio::test]
async fn slug_lookup_with_empty_list_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client(&server).collection().get("missing").await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Slug: missing does not exist or you don't have access permission."
    );
}

// ── Lists and pagination ────────────────────────────────────────

#[tokio::test]
async fn paginated_list_follows_next() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sample"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [sample_json(3, "c")],
            "next": null
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sample"))
        .and(query_param("collection", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [sample_json(1, "a"), sample_json(2, "b")],
            "next": format!("{}/api/sample?collection=1&page=2", server.uri())
        })))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let samples = client(&server)
        .sample()
        .filter([("collection", "1")])
        .await
        .unwrap();

    let slugs: Vec<_> = samples.iter().filter_map(|s| s.slug.as_deref()).collect();
    assert_eq!(slugs, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn repeated_next_page_stops_the_loop() {
    let server = MockServer::start().await;
    let page_url = format!("{}/api/sample", server.uri());
    Mock::given(method("GET"))
        .and(path("/api/sample"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [sample_json(1, "a")],
            "next": page_url
        })))
        .expect(1)
        .mount(&server)
        .await;

    let samples = client(&server).sample().all().await.unwrap();

    assert_eq!(samples.len(), 1);
}

#[tokio::test]
async fn page_size_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sample"))
        .and(query_param("page_size", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = ResolweConfig {
        page_size: Some(25),
        ..mock_config(&server)
    };
    let samples = Resolwe::new(cfg).unwrap().sample().all().await.unwrap();

    assert!(samples.is_empty());
}

#[tokio::test]
async fn unexpected_list_shape_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sample"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "weird"})))
        .mount(&server)
        .await;

    let err = client(&server).sample().all().await.unwrap_err();

    assert!(matches!(err, ClientError::Protocol(_)));
}

// ── Authentication and errors ───────────────────────────────────

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sample/1"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_json(1, "a")))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = ResolweConfig {
        token: Some("abc123".into()),
        ..mock_config(&server)
    };
    Resolwe::new(cfg).unwrap().sample().get(1u64).await.unwrap();
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sample/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is down"))
        .mount(&server)
        .await;

    let err = client(&server).sample().get(1u64).await.unwrap_err();

    match err {
        ClientError::Remote { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database is down");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_uses_reason_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sample"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(mock_config(&server)).unwrap();
    let err = transport
        .create("sample", &json!({"name": "x"}))
        .await
        .unwrap_err();

    match err {
        ClientError::Remote { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Forbidden");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

// ── Writes ──────────────────────────────────────────────────────

#[tokio::test]
async fn save_patches_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sample/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_json(7, "liver")))
        .mount(&server)
        .await;
    let mut renamed = sample_json(7, "liver");
    renamed["name"] = json!("Liver, day 3");
    Mock::given(method("PATCH"))
        .and(path("/api/sample/7"))
        .and(body_json(json!({"name": "Liver, day 3"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(renamed))
        .expect(1)
        .mount(&server)
        .await;

    let resolwe = client(&server);
    let mut sample = resolwe.sample().get(7u64).await.unwrap();
    sample.name = Some("Liver, day 3".into());
    resolwe.save(&mut sample).await.unwrap();

    assert_eq!(sample.name.as_deref(), Some("Liver, day 3"));
}

#[tokio::test]
async fn create_posts_to_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/relation"))
        .and(body_json(json!({
            "type": "compare",
            "collection": 1,
            "entities": [
                {"entity": 4, "position": "sample"},
                {"entity": 5, "position": "background"}
            ],
            "label": "background"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 30,
            "type": "compare",
            "collection": {"id": 1},
            "label": "background",
            "entities": [
                {"entity": 4, "position": "sample"},
                {"entity": 5, "position": "background"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/collection/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "slug": "study"})))
        .mount(&server)
        .await;

    let resolwe = client(&server);
    let collection = resolwe.collection().get(1u64).await.unwrap();
    let relation = resolwe
        .relations(&collection)
        .unwrap()
        .create_background_relation(4u64, 5u64)
        .await
        .unwrap();

    assert_eq!(relation.id, Some(ResourceId::new(30)));
    assert!(relation.is_background());
}

#[tokio::test]
async fn membership_calls_use_relation_actions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/relation/10/add_entity"))
        .and(body_json(json!([{"entity": 3, "position": "case"}])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/relation/10/remove_entity"))
        .and(body_json(json!({"ids": [1, 2]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(mock_config(&server)).unwrap();
    transport
        .add_members(
            ResourceId::new(10),
            &[MembershipEntry::new(ResourceId::new(3), Some("case"))],
        )
        .await
        .unwrap();
    transport
        .remove_members(ResourceId::new(10), &[ResourceId::new(1), ResourceId::new(2)])
        .await
        .unwrap();
}

#[tokio::test]
async fn reconcile_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/relation/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10,
            "type": "group",
            "collection": 1,
            "label": "replicates",
            "entities": [{"entity": 1}, {"entity": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/relation/10/add_entity"))
        .and(body_json(json!([{"entity": 3}])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/relation/10/remove_entity"))
        .and(body_json(json!({"ids": [1]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/relation/10"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resolwe = client(&server);
    let mut relation = resolwe.relation().get(10u64).await.unwrap();
    let diff = resolwe
        .reconcile_relation(&mut relation, &[2u64, 3], &[], Some("replicates"))
        .await
        .unwrap();

    assert_eq!(diff.to_add.len(), 1);
    assert_eq!(diff.to_delete.len(), 1);
    assert_eq!(relation.entity_ids(), vec![ResourceId::new(2), ResourceId::new(3)]);
}
