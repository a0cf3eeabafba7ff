//! Database handle: one method per Couchbase Lite REST endpoint.

use crate::changes::ChangesFeed;
use crate::client::{CbliteClient, RequestOptions};
use crate::error::{CbliteError, Result};
use crate::types::{ChangesResponse, DatabaseInfo, DesignDocument, OkResponse, ReplicateRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Handle to one named database behind a Couchbase Lite listener.
///
/// Immutable after construction; every operation is exactly one HTTP request
/// through [`CbliteClient`], with no retry and no timeout.
#[derive(Clone, Debug)]
pub struct Database {
    base_url: String,
    name: String,
    client: CbliteClient,
}

impl Database {
    pub fn new(base_url: &str, name: &str, client: CbliteClient) -> Result<Self> {
        url::Url::parse(base_url).map_err(|e| CbliteError::Config(e.to_string()))?;
        Ok(Database {
            base_url: base_url.trim_end_matches('/').to_string(),
            name: name.to_string(),
            client,
        })
    }

    /// The listener's base URL, without a trailing slash.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &CbliteClient {
        &self.client
    }

    fn db_url(&self) -> String {
        format!("{}/{}", self.base_url, self.name)
    }

    fn doc_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.name, path)
    }

    fn root_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Prefix with `_design/` unless the caller already supplied it.
    fn design_path(name: &str) -> String {
        if name.contains("_design/") {
            name.to_string()
        } else {
            format!("_design/{}", name)
        }
    }

    /// `PUT /{db}`
    pub async fn create_database(&self) -> Result<OkResponse> {
        self.client
            .execute_as(&self.db_url(), RequestOptions::put())
            .await
    }

    /// `GET /{db}`
    pub async fn get_database(&self) -> Result<DatabaseInfo> {
        self.client
            .execute_as(&self.db_url(), RequestOptions::get())
            .await
    }

    /// `PUT /{db}/_design/{name}`
    pub async fn create_design_document(
        &self,
        name: &str,
        document: &DesignDocument,
    ) -> Result<OkResponse> {
        let url = self.doc_url(&Self::design_path(name));
        self.client
            .execute_as(
                &url,
                RequestOptions::put()
                    .with_body(serde_json::to_value(document)?)
                    .json(),
            )
            .await
    }

    /// `GET /{db}/_design/{name}`
    pub async fn get_design_document(&self, name: &str) -> Result<DesignDocument> {
        let url = self.doc_url(&Self::design_path(name));
        self.client.execute_as(&url, RequestOptions::get()).await
    }

    /// `GET /{db}/{design}/_view/{view}?{options}`
    ///
    /// `options` are passed through verbatim, in the order given.
    pub async fn query_view<I>(&self, design: &str, view: &str, options: I) -> Result<Value>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let url = self.doc_url(&format!("{}/_view/{}", design, view));
        self.client
            .execute(&url, RequestOptions::get().with_params(options))
            .await
    }

    /// `POST /{db}` — the server assigns the document id.
    pub async fn create_document<T: Serialize>(&self, document: &T) -> Result<OkResponse> {
        self.client
            .execute_as(
                &self.db_url(),
                RequestOptions::post()
                    .with_body(serde_json::to_value(document)?)
                    .json(),
            )
            .await
    }

    /// `PUT /{db}/_local/{id}` — local documents are never replicated.
    pub async fn create_local_document<T: Serialize>(
        &self,
        id: &str,
        document: &T,
    ) -> Result<OkResponse> {
        let url = self.doc_url(&format!("_local/{}", id));
        self.client
            .execute_as(
                &url,
                RequestOptions::put().with_body(serde_json::to_value(document)?),
            )
            .await
    }

    /// `GET /{db}/_local/{id}`
    pub async fn get_local_document<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        let url = self.doc_url(&format!("_local/{}", id));
        self.client.execute_as(&url, RequestOptions::get()).await
    }

    /// `PUT /{db}/{id}?rev={rev}` — `rev` provides optimistic concurrency.
    pub async fn update_document<T: Serialize>(
        &self,
        id: &str,
        rev: &str,
        document: &T,
    ) -> Result<OkResponse> {
        self.client
            .execute_as(
                &self.doc_url(id),
                RequestOptions::put()
                    .with_param("rev", rev)
                    .with_body(serde_json::to_value(document)?)
                    .json(),
            )
            .await
    }

    /// `DELETE /{db}/{id}?rev={rev}`
    pub async fn delete_document(&self, id: &str, rev: &str) -> Result<OkResponse> {
        self.client
            .execute_as(
                &self.doc_url(id),
                RequestOptions::delete().with_param("rev", rev),
            )
            .await
    }

    /// `GET /{db}/_all_docs`
    pub async fn all_documents(&self) -> Result<Value> {
        self.client
            .execute(&self.doc_url("_all_docs"), RequestOptions::get())
            .await
    }

    /// `GET /{db}/{id}`
    pub async fn get_document<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        self.client
            .execute_as(&self.doc_url(id), RequestOptions::get())
            .await
    }

    /// `POST /_replicate` — one-shot or continuous replication between two
    /// locations. Local databases are named by their database name; remote
    /// ones by URL.
    pub async fn replicate(&self, source: &str, target: &str, continuous: bool) -> Result<Value> {
        let body = serde_json::to_value(ReplicateRequest {
            source: source.to_string(),
            target: target.to_string(),
            continuous,
        })?;
        self.client
            .execute(
                &self.root_url("_replicate"),
                RequestOptions::post().with_body(body).json(),
            )
            .await
    }

    /// Bidirectional sync: local -> target, then target -> local. The second
    /// leg is only issued once the first succeeds.
    pub async fn sync(&self, target: &str, continuous: bool) -> Result<Value> {
        self.replicate(&self.name, target, continuous).await?;
        self.replicate(target, &self.name, continuous).await
    }

    /// `GET /_active_tasks`
    pub async fn active_tasks(&self) -> Result<Value> {
        self.client
            .execute(&self.root_url("_active_tasks"), RequestOptions::get())
            .await
    }

    /// Change-feed consumer starting at the beginning of history.
    pub fn listen(&self) -> ChangesFeed {
        self.listen_since(0)
    }

    /// Change-feed consumer starting after sequence `seq`.
    pub fn listen_since(&self, seq: u64) -> ChangesFeed {
        ChangesFeed::new(self.clone(), seq)
    }

    /// One blocking `_changes` long poll.
    pub(crate) async fn poll_changes(&self, since: u64) -> Result<ChangesResponse> {
        self.client
            .execute_as(
                &self.doc_url("_changes"),
                RequestOptions::get()
                    .with_param("feed", "longpoll")
                    .with_param("since", since)
                    .with_credentials(),
            )
            .await
    }
}
