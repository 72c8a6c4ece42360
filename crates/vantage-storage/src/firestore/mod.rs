//! Cloud Firestore over its REST API.
//!
//! Talks to `{base}/v1/projects/{project}/databases/{database}/documents`.
//! Against the emulator the base is `http://{FIRESTORE_EMULATOR_HOST}` and
//! the bearer token is `owner`.

pub mod value;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use vantage_gcp_auth::{AccessTokenSource, StaticTokenSource};

use crate::{check_document_id, is_valid_document_id, Document, DocumentStore, Error, Result};

/// Production Firestore endpoint.
pub const FIRESTORE_URL: &str = "https://firestore.googleapis.com";

const DEFAULT_DATABASE: &str = "(default)";

/// Page size used when listing a collection.
const PAGE_SIZE: u32 = 300;

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// One element of a `runQuery` response stream.
#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    document: Option<RawDocument>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Firestore document store for one project database.
pub struct FirestoreStore {
    project_id: String,
    database: String,
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<dyn AccessTokenSource>,
}

impl FirestoreStore {
    /// Store backed by the production endpoint.
    pub fn new(
        project_id: impl Into<String>,
        http: reqwest::Client,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            base_url: FIRESTORE_URL.to_string(),
            http,
            tokens,
        }
    }

    /// Store backed by the Firestore emulator at `host` (e.g. `localhost:8080`).
    pub fn emulator(host: &str, project_id: impl Into<String>, http: reqwest::Client) -> Self {
        Self::new(project_id, http, Arc::new(StaticTokenSource::emulator()))
            .with_base_url(format!("http://{host}"))
    }

    /// Override the endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a named database instead of `(default)`.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database
        )
    }

    /// URL of one document, with `id` encoded as a single path segment.
    fn document_url(&self, collection: &str, id: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.documents_url())
            .map_err(|e| Error::invalid(collection, id, format!("bad endpoint URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| Error::invalid(collection, id, "endpoint URL cannot take a path"))?
            .push(collection)
            .push(id);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let token = self.tokens.access_token().await?;
        Ok(request.bearer_auth(token).send().await?)
    }

    fn decode(collection: &str, raw: RawDocument) -> Result<Document> {
        let id = raw.name.rsplit('/').next().unwrap_or_default().to_string();
        let data = value::decode_fields(&raw.fields)
            .map_err(|reason| Error::invalid(collection, &id, reason))?;
        Ok(Document { id, data })
    }
}

async fn backend_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .map(|e| e.error.message)
        .unwrap_or(text);
    Error::Backend { status, message }
}

/// Firestore field paths need backquotes unless they are simple identifiers.
fn field_path(field: &str) -> String {
    let simple = field
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        field.to_string()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        if !is_valid_document_id(id) {
            log::debug!("Refusing to read {collection} with invalid id {id:?}");
            return Ok(None);
        }
        let url = self.document_url(collection, id)?;
        let response = self.send(self.http.get(url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }
        let raw: RawDocument = response.json().await?;
        Self::decode(collection, raw).map(Some)
    }

    async fn create(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()> {
        check_document_id(collection, id)?;
        let url = format!("{}/{collection}", self.documents_url());
        let request = self
            .http
            .post(&url)
            .query(&[("documentId", id)])
            .json(&json!({ "fields": value::encode_fields(&data) }));
        let response = self.send(request).await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(Error::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }
        log::debug!("Created {collection}/{id}");
        Ok(())
    }

    async fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()> {
        check_document_id(collection, id)?;
        let url = self.document_url(collection, id)?;
        let request = self
            .http
            .patch(url)
            .json(&json!({ "fields": value::encode_fields(&data) }));
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }
        log::debug!("Wrote {collection}/{id}");
        Ok(())
    }

    async fn add(&self, collection: &str, data: Map<String, Value>) -> Result<Document> {
        let url = format!("{}/{collection}", self.documents_url());
        let request = self
            .http
            .post(&url)
            .json(&json!({ "fields": value::encode_fields(&data) }));
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }
        let raw: RawDocument = response.json().await?;
        Self::decode(collection, raw)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let url = format!("{}/{collection}", self.documents_url());
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let response = self.send(request).await?;
            if !response.status().is_success() {
                return Err(backend_error(response).await);
            }

            let page: ListResponse = response.json().await?;
            for raw in page.documents {
                documents.push(Self::decode(collection, raw)?);
            }
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        expected: &Value,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let url = format!("{}:runQuery", self.documents_url());
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field_path(field) },
                        "op": "EQUAL",
                        "value": value::encode_value(expected),
                    }
                },
                "limit": limit,
            }
        });
        let response = self.send(self.http.post(&url).json(&query)).await?;
        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }

        let results: Vec<QueryResult> = response.json().await?;
        results
            .into_iter()
            .filter_map(|r| r.document)
            .map(|raw| Self::decode(collection, raw))
            .collect()
    }

    fn name(&self) -> &str {
        "firestore"
    }
}
