use api_types::document::{Document as WireDocument, DocumentWrite, ErrorResponse, ListDocumentsResponse};
use async_trait::async_trait;
use engine::{Document, DocumentId, DocumentStore, Fields, StoreError};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};

use crate::{
    RemoteError,
    codec::{decode_fields, encode_fields, field_path},
};

/// Public Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1/";

const PAGE_SIZE: &str = "300";

/// [`DocumentStore`] backed by the Firestore REST API.
///
/// Writes use `currentDocument.exists=true`, so updating or deleting a
/// document that is gone comes back as [`StoreError::NotFound`] instead of
/// silently recreating it. Updates carry an update mask of the written
/// fields; fields the ledger cannot represent stay untouched remotely.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    http: reqwest::Client,
    documents_url: Url,
    api_key: Option<String>,
    id_token: Option<String>,
}

impl FirestoreStore {
    pub fn builder() -> FirestoreStoreBuilder {
        FirestoreStoreBuilder::default()
    }

    fn collection_url(&self, collection: &str) -> Result<Url, StoreError> {
        self.resource_url(&[collection])
    }

    fn document_url(&self, collection: &str, id: &DocumentId) -> Result<Url, StoreError> {
        self.resource_url(&[collection, id.as_str()])
    }

    /// Appends each of `segments` as one percent-encoded path segment, so
    /// `#`, `?` or `%` in an identifier never leave the path.
    fn resource_url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.documents_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Network(format!("invalid base url: {}", self.documents_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            req = req.query(&[("key", key)]);
        }
        if let Some(token) = &self.id_token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: RequestBuilder, resource: &str) -> Result<Response, StoreError> {
        let res = req.send().await.map_err(transport)?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        if status == StatusCode::NOT_FOUND {
            tracing::warn!(resource, "document not found");
            return Err(StoreError::NotFound(resource.to_string()));
        }

        let message = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error.message)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::warn!(resource, %status, "store rejected request: {message}");
        Err(StoreError::Network(format!("{status}: {message}")))
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let url = self.collection_url(collection)?;
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .request(Method::GET, url.clone())
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }
            tracing::debug!(collection, page = ?page_token, "listing documents");

            let page: ListDocumentsResponse = self
                .send(req, collection)
                .await
                .map_err(collection_unavailable)?
                .json()
                .await
                .map_err(transport)?;
            documents.extend(page.documents.into_iter().map(into_document));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn create(&self, collection: &str, fields: &Fields) -> Result<DocumentId, StoreError> {
        let url = self.collection_url(collection)?;
        let body = DocumentWrite {
            fields: encode_fields(fields),
        };
        tracing::debug!(collection, "creating document");

        let created: WireDocument = self
            .send(self.request(Method::POST, url).json(&body), collection)
            .await
            .map_err(collection_unavailable)?
            .json()
            .await
            .map_err(transport)?;
        DocumentId::new(created.id()).ok_or_else(|| {
            StoreError::Network(format!("created document has no id: {}", created.name))
        })
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: &Fields,
    ) -> Result<(), StoreError> {
        let url = self.document_url(collection, id)?;
        let body = DocumentWrite {
            fields: encode_fields(fields),
        };
        tracing::debug!(collection, %id, "replacing document");

        let mut req = self
            .request(Method::PATCH, url)
            .query(&[("currentDocument.exists", "true")]);
        for name in fields.keys() {
            req = req.query(&[("updateMask.fieldPaths", field_path(name))]);
        }
        let req = req.json(&body);
        self.send(req, id.as_str()).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        let url = self.document_url(collection, id)?;
        tracing::debug!(collection, %id, "deleting document");

        let req = self
            .request(Method::DELETE, url)
            .query(&[("currentDocument.exists", "true")]);
        self.send(req, id.as_str()).await?;
        Ok(())
    }
}

fn into_document(doc: WireDocument) -> Document {
    Document {
        id: doc.id().to_string(),
        fields: decode_fields(doc.fields),
    }
}

/// Only document writes can report `NotFound`; a missing collection or
/// project is a failed call.
fn collection_unavailable(err: StoreError) -> StoreError {
    match err {
        StoreError::NotFound(collection) => {
            StoreError::Network(format!("collection \"{collection}\" unavailable"))
        }
        other => other,
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Network(err.to_string())
}

#[derive(Default, Debug)]
pub struct FirestoreStoreBuilder {
    base_url: Option<String>,
    project_id: Option<String>,
    api_key: Option<String>,
    id_token: Option<String>,
}

impl FirestoreStoreBuilder {
    /// Override the REST root (e.g. a local emulator). Defaults to
    /// [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, base_url: &str) -> FirestoreStoreBuilder {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn project_id(mut self, project_id: &str) -> FirestoreStoreBuilder {
        self.project_id = Some(project_id.to_string());
        self
    }

    pub fn api_key(mut self, api_key: Option<String>) -> FirestoreStoreBuilder {
        self.api_key = api_key;
        self
    }

    /// Firebase ID token of the signed-in user, sent as bearer token.
    pub fn id_token(mut self, id_token: Option<String>) -> FirestoreStoreBuilder {
        self.id_token = id_token;
        self
    }

    pub fn build(self) -> Result<FirestoreStore, RemoteError> {
        let project_id = self
            .project_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(RemoteError::MissingSetting("project_id"))?;

        let mut base = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base.ends_with('/') {
            base.push('/');
        }
        let documents_url = Url::parse(&base)
            .and_then(|base| {
                base.join(&format!("projects/{project_id}/databases/(default)/documents/"))
            })
            .map_err(|err| RemoteError::InvalidUrl(format!("{base}: {err}")))?;

        Ok(FirestoreStore {
            http: reqwest::Client::builder().build()?,
            documents_url,
            api_key: self.api_key,
            id_token: self.id_token,
        })
    }
}
