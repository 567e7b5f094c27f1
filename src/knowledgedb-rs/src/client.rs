use crate::graph::GraphApi;
use crate::memory::MemoryApi;
use crate::vectors::VectorApi;
use crate::{ClientError, Result};
use knowledgedb_core::documents as docs;
use knowledgedb_core::models::error_message;
use knowledgedb_core::{AskOptions, Config, Method, RequestDescriptor, SearchOptions};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;

/// Header carrying the API key on every request
pub(crate) const API_KEY_HEADER: &str = "x-api-key";

/// KnowledgeDB REST API Client
///
/// Holds the endpoint and API key for one database. Every method performs
/// exactly one HTTP round trip and returns the response JSON unchanged.
///
/// The client is cheap to clone and safe to share between tasks; the
/// underlying `reqwest::Client` handles concurrent requests.
#[derive(Clone)]
pub struct Client {
    config: Config,
    client: HttpClient,
}

impl Client {
    /// Create a new client for the given database endpoint and API key
    pub fn new(endpoint: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self::from_config(Config::new(endpoint, api_key))
    }

    pub fn from_config(config: Config) -> Self {
        Self::with_http_client(config, HttpClient::new())
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS roots, timeouts)
    pub fn with_http_client(config: Config, client: HttpClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Base URL, without trailing slash
    pub fn endpoint(&self) -> &str {
        self.config.endpoint()
    }

    /// Knowledge-graph operations
    pub fn graph(&self) -> GraphApi<'_> {
        GraphApi::new(self)
    }

    /// Agent memory operations
    pub fn memory(&self) -> MemoryApi<'_> {
        MemoryApi::new(self)
    }

    /// Vector search and index operations
    pub fn vectors(&self) -> VectorApi<'_> {
        VectorApi::new(self)
    }

    /// Perform one request and return the decoded JSON response.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let mut req = RequestDescriptor::new(method, path);
        if let Some(body) = body {
            req = req.with_value(body);
        }
        self.send(req).await
    }

    /// Send a prepared request and decode the JSON response.
    ///
    /// An empty success body decodes as `null`.
    pub async fn send(&self, req: RequestDescriptor) -> Result<Value> {
        let response = self.dispatch(&req).await?;
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_slice(&bytes)?;
        Ok(value)
    }

    /// Send a prepared request and return the raw UTF-8 body.
    ///
    /// For endpoints that answer with something other than JSON.
    pub async fn send_text(&self, req: RequestDescriptor) -> Result<String> {
        let response = self.dispatch(&req).await?;
        let bytes = response.bytes().await?;

        String::from_utf8(bytes.to_vec())
            .map_err(|err| ClientError::InvalidResponse(format!("body is not UTF-8: {}", err)))
    }

    /// Build, send and check one request.
    ///
    /// Returns the response only for 2xx statuses; anything else becomes
    /// `ClientError::Server` with the message taken from the error body.
    #[tracing::instrument(skip(self, req), fields(method = %req.method, path = %req.path))]
    pub(crate) async fn dispatch(&self, req: &RequestDescriptor) -> Result<reqwest::Response> {
        let url = self.config.url(&req.path);
        let api_key = HeaderValue::from_str(self.config.api_key())
            .map_err(|_| ClientError::InvalidApiKey)?;

        let mut builder = self
            .client
            .request(http_method(req.method), &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(API_KEY_HEADER, api_key);

        if let Some(body) = &req.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        tracing::debug!("Sending request");
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(status.as_u16(), &text);
            tracing::warn!(status = status.as_u16(), %message, "Request failed");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(status = status.as_u16(), "Request succeeded");
        Ok(response)
    }

    // ---- CRUD ----

    /// Insert one document, or many when `documents` is a JSON array
    pub async fn insert(&self, collection: &str, documents: Value) -> Result<Value> {
        self.send(docs::insert(collection, documents)).await
    }

    /// Insert a single document, always sent as `{"document": ...}`
    pub async fn insert_one<T>(&self, collection: &str, document: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        self.send(docs::insert_one(collection, document)?).await
    }

    /// Insert documents, always sent as `{"documents": [...]}`
    pub async fn insert_many<T>(&self, collection: &str, documents: &[T]) -> Result<Value>
    where
        T: Serialize,
    {
        self.send(docs::insert_many(collection, documents)?).await
    }

    /// Find documents; a missing query or options is sent as `{}`
    pub async fn find(
        &self,
        collection: &str,
        query: Option<Value>,
        options: Option<Value>,
    ) -> Result<Value> {
        self.send(docs::find(collection, query, options)?).await
    }

    pub async fn update(
        &self,
        collection: &str,
        query: Value,
        update: Value,
        multi: Option<bool>,
    ) -> Result<Value> {
        self.send(docs::update(collection, query, update, multi)?)
            .await
    }

    pub async fn delete(&self, collection: &str, query: Value, multi: Option<bool>) -> Result<Value> {
        self.send(docs::delete(collection, query, multi)?).await
    }

    pub async fn count(&self, collection: &str, query: Option<Value>) -> Result<Value> {
        self.send(docs::count(collection, query)?).await
    }

    pub async fn collections(&self) -> Result<Value> {
        self.send(docs::collections()).await
    }

    /// Version history of one document
    pub async fn history(&self, collection: &str, doc_id: &str) -> Result<Value> {
        self.send(docs::history(collection, doc_id)).await
    }

    pub async fn rollback(&self, collection: &str, doc_id: &str, version: u64) -> Result<Value> {
        self.send(docs::rollback(collection, doc_id, version)?)
            .await
    }

    // ---- Search ----

    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Value> {
        self.send(docs::search(query, options)?).await
    }

    // ---- GraphRAG ----

    pub async fn ask(&self, question: &str, options: &AskOptions) -> Result<Value> {
        self.send(docs::ask(question, options)?).await
    }

    // ---- Analytics ----

    /// Run an aggregation; `config` is sent as the request body unchanged
    pub async fn analytics(&self, collection: &str, config: Value) -> Result<Value> {
        self.send(docs::analytics(collection, config)).await
    }

    // ---- Export ----

    /// Export a collection; `format` defaults to `json`
    pub async fn export_collection(&self, collection: &str, format: Option<&str>) -> Result<Value> {
        self.send(docs::export(collection, format)).await
    }

    /// Export a collection as CSV text
    pub async fn export_csv(&self, collection: &str) -> Result<String> {
        self.send_text(docs::export(collection, Some("csv"))).await
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("config", &self.config).finish()
    }
}
