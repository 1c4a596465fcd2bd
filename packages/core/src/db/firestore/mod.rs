//! Firestore adapter
//!
//! Implements [`NodeStore`] and [`UserStore`] over the Firestore REST API.
//!
//! - Creates and patches go through `documents:commit` so preconditions and
//!   server transforms (`REQUEST_TIME`, array union/remove) ride along with
//!   the write
//! - Listing follows `nextPageToken` until the collection is exhausted
//! - A `404` on read is `Ok(None)`; deletes never check existence
//! - Profiles are plain `PATCH` writes without a mask (full overwrite)

mod codec;

use crate::config::FolioConfig;
use crate::db::error::StoreError;
use crate::db::node_store::{NodeStore, UserStore};
use crate::db::rest::RestClient;
use crate::models::{NewNode, Node, NodeUpdate, UserProfile};
use crate::storage::url::encode_component;
use anyhow::Result;
use async_trait::async_trait;
use codec::{Document, ListPage};
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

const NODES: &str = "nodes";
const USERS: &str = "users";
const PAGE_SIZE: u32 = 300;

pub struct FirestoreStore {
    rest: RestClient,
    endpoint: String,
    /// `projects/{project}/databases/{database}`
    database: String,
}

impl FirestoreStore {
    pub fn new(
        rest: RestClient,
        endpoint: impl Into<String>,
        project_id: &str,
        database_id: &str,
    ) -> Self {
        Self {
            rest,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            database: format!("projects/{}/databases/{}", project_id, database_id),
        }
    }

    pub fn from_config(config: &FolioConfig) -> Result<Self, StoreError> {
        let firebase = &config.firebase;
        if firebase.project_id.trim().is_empty() {
            return Err(StoreError::configuration("missing Firestore project id"));
        }
        Ok(Self::new(
            RestClient::from_config(config)?,
            firebase.firestore_endpoint.clone(),
            &firebase.project_id,
            &firebase.database_id,
        ))
    }

    /// Resource name, as used inside request bodies
    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/documents/{}/{}", self.database, collection, id)
    }

    /// REST URL of a document; the id is one escaped path segment
    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}/documents/{}/{}",
            self.endpoint,
            self.database,
            collection,
            encode_component(id)
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}/documents/{}", self.endpoint, self.database, collection)
    }

    fn commit_url(&self) -> String {
        format!("{}/{}/documents:commit", self.endpoint, self.database)
    }

    async fn commit(&self, write: Value) -> Result<(), StoreError> {
        let url = self.commit_url();
        let request = self
            .rest
            .request(Method::POST, &url)
            .json(&json!({ "writes": [write] }));
        self.rest.expect_success(request, &url).await
    }
}

#[async_trait]
impl NodeStore for FirestoreStore {
    async fn create_node(&self, node: NewNode) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let write = json!({
            "update": {
                "name": self.document_name(NODES, &id),
                "fields": codec::encode_new_node(&node),
            },
            "updateTransforms": [
                { "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" }
            ],
            "currentDocument": { "exists": false }
        });

        self.commit(write).await?;
        tracing::debug!("Created Firestore document {}/{}", NODES, id);
        Ok(id)
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        let url = self.collection_url(NODES);
        let mut nodes = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .rest
                .request(Method::GET, &url)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListPage = self.rest.json(request, &url).await?;
            for document in &page.documents {
                nodes.push(codec::decode_node(document)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("Listed {} Firestore documents from {}", nodes.len(), NODES);
        Ok(nodes)
    }

    async fn get_node(&self, id: &str) -> Result<Option<Node>> {
        let url = self.document_url(NODES, id);
        let document: Option<Document> = self
            .rest
            .optional_json(self.rest.request(Method::GET, &url), &url)
            .await?;

        Ok(document.as_ref().map(codec::decode_node).transpose()?)
    }

    async fn update_node(&self, id: &str, update: NodeUpdate) -> Result<()> {
        let encoded = codec::encode_update(&update);
        let mut write = json!({
            "update": {
                "name": self.document_name(NODES, id),
                "fields": encoded.fields,
            },
            "updateMask": { "fieldPaths": encoded.mask },
            "currentDocument": { "exists": true }
        });
        if !encoded.transforms.is_empty() {
            write["updateTransforms"] = Value::Array(encoded.transforms);
        }

        self.commit(write).await?;
        Ok(())
    }

    async fn delete_node(&self, id: &str) -> Result<()> {
        let url = self.document_url(NODES, id);
        self.rest
            .expect_success(self.rest.request(Method::DELETE, &url), &url)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FirestoreStore {
    async fn put_profile(&self, user_id: &str, profile: UserProfile) -> Result<()> {
        let url = self.document_url(USERS, user_id);
        let request = self
            .rest
            .request(Method::PATCH, &url)
            .json(&json!({ "fields": codec::encode_profile(&profile) }));
        self.rest.expect_success(request, &url).await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let url = self.document_url(USERS, user_id);
        let document: Option<Document> = self
            .rest
            .optional_json(self.rest.request(Method::GET, &url), &url)
            .await?;

        Ok(document.as_ref().map(codec::decode_profile).transpose()?)
    }
}
