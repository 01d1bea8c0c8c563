//! reqwest backed transport for the Resolwe REST API.

use crate::config::ResolweConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{QueryParams, Transport};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use resdk_model::MembershipEntry;
use resdk_types::ResourceId;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const RELATION_ENDPOINT: &str = "relation";

/// A list response: either a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload {
    Page {
        results: Vec<Value>,
        #[serde(default)]
        next: Option<String>,
    },
    Items(Vec<Value>),
}

/// HTTP transport talking JSON to a Resolwe server.
pub struct HttpTransport {
    config: ResolweConfig,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the configured timeout.
    pub fn new(config: ResolweConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ResolweConfig {
        &self.config
    }

    fn record_url(&self, endpoint: &str, id: ResourceId) -> String {
        format!("{}/{}", self.config.endpoint_url(endpoint), id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and turns any non-success status into `Remote`.
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            body
        };
        Err(ClientError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    /// Reads a JSON body; an empty body reads as `null`.
    async fn json(response: Response) -> ClientResult<Value> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_one(&self, endpoint: &str, id: ResourceId) -> ClientResult<Value> {
        let url = self.record_url(endpoint, id);
        debug!("GET {}", url);
        let response = self.send(self.request(Method::GET, &url)).await?;
        Self::json(response).await
    }

    async fn fetch_list(&self, endpoint: &str, query: &QueryParams) -> ClientResult<Vec<Value>> {
        let url = self.config.endpoint_url(endpoint);
        debug!("GET {} {:?}", url, query);

        let mut request = self.request(Method::GET, &url).query(query);
        if let Some(page_size) = self.config.page_size {
            request = request.query(&[("page_size", page_size)]);
        }

        let mut records = Vec::new();
        let mut seen_pages = vec![url];
        loop {
            let response = self.send(request).await?;
            let next = match serde_json::from_value::<ListPayload>(Self::json(response).await?) {
                Ok(ListPayload::Items(items)) => {
                    records.extend(items);
                    None
                }
                Ok(ListPayload::Page { results, next }) => {
                    records.extend(results);
                    next
                }
                Err(e) => {
                    return Err(ClientError::Protocol(format!(
                        "unexpected list response from {endpoint}: {e}"
                    )));
                }
            };

            match next {
                Some(next) if !seen_pages.contains(&next) => {
                    request = self.request(Method::GET, &next);
                    seen_pages.push(next);
                }
                Some(next) => {
                    warn!("Pagination loop detected at {}", next);
                    break;
                }
                None => break,
            }
        }

        Ok(records)
    }

    async fn create(&self, endpoint: &str, payload: &Value) -> ClientResult<Value> {
        let url = self.config.endpoint_url(endpoint);
        debug!("POST {}", url);
        let response = self
            .send(self.request(Method::POST, &url).json(payload))
            .await?;
        Self::json(response).await
    }

    async fn save(&self, endpoint: &str, id: ResourceId, payload: &Value) -> ClientResult<Value> {
        let url = self.record_url(endpoint, id);
        debug!("PATCH {}", url);
        let response = self
            .send(self.request(Method::PATCH, &url).json(payload))
            .await?;
        Self::json(response).await
    }

    async fn add_members(
        &self,
        relation_id: ResourceId,
        members: &[MembershipEntry],
    ) -> ClientResult<()> {
        let url = format!("{}/add_entity", self.record_url(RELATION_ENDPOINT, relation_id));
        debug!("POST {} ({} members)", url, members.len());
        self.send(self.request(Method::POST, &url).json(members))
            .await?;
        Ok(())
    }

    async fn remove_members(
        &self,
        relation_id: ResourceId,
        entity_ids: &[ResourceId],
    ) -> ClientResult<()> {
        let url = format!("{}/remove_entity", self.record_url(RELATION_ENDPOINT, relation_id));
        debug!("POST {} ({} entities)", url, entity_ids.len());
        let body = serde_json::json!({ "ids": entity_ids });
        self.send(self.request(Method::POST, &url).json(&body))
            .await?;
        Ok(())
    }
}
