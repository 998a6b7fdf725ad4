//! User records kept in a provider database collection.
//!
//! The collection needs a unique index on `email`; the provider then answers a
//! duplicate insert with 409, reported as [`StoreError::Conflict`].

use super::{client::expect_success, ProviderClient, ProviderError};
use crate::account::{NewUserRecord, StoreError, UserRecord, UserStore};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info_span, Instrument};
use ulid::Ulid;

#[derive(Debug, Clone)]
pub struct DocumentUserStore {
    client: ProviderClient,
    database_id: String,
    collection_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    full_name: String,
    email: String,
    #[serde(default)]
    avatar: String,
    account_id: String,
}

impl From<UserDocument> for UserRecord {
    fn from(document: UserDocument) -> Self {
        Self {
            record_id: document.id,
            full_name: document.full_name,
            email: document.email,
            avatar: document.avatar,
            account_id: document.account_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    total: u64,
    documents: Vec<UserDocument>,
}

fn parse<T: for<'de> Deserialize<'de>>(body: Value) -> Result<T, StoreError> {
    serde_json::from_value(body).map_err(|err| StoreError::InvalidRecord(err.to_string()))
}

impl DocumentUserStore {
    #[must_use]
    pub fn new(client: ProviderClient, database_id: String, collection_id: String) -> Self {
        Self {
            client,
            database_id,
            collection_id,
        }
    }

    fn documents_path(&self) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, self.collection_id
        )
    }

    async fn list(&self, queries: &[Value]) -> Result<DocumentList, StoreError> {
        let path = self.documents_path();
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|query| ("queries[]", query.to_string()))
            .collect();

        let span = info_span!(
            "provider.list_documents",
            http.method = "GET",
            url = %self.client.url(&path)
        );
        let response = self
            .client
            .request(Method::GET, &path)
            .query(&params)
            .send()
            .instrument(span)
            .await
            .map_err(ProviderError::from)?;

        parse(expect_success(response).await?)
    }
}

#[async_trait]
impl UserStore for DocumentUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let list = self
            .list(&[
                json!({"method": "equal", "attribute": "email", "values": [email]}),
                json!({"method": "limit", "values": [1]}),
            ])
            .await?;

        if list.total == 0 {
            return Ok(None);
        }

        Ok(list.documents.into_iter().next().map(UserRecord::from))
    }

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, StoreError> {
        let path = self.documents_path();
        let payload = json!({
            "documentId": Ulid::new().to_string(),
            "data": {
                "fullName": record.full_name,
                "email": record.email,
                "avatar": record.avatar,
                "accountId": record.account_id,
            }
        });

        let span = info_span!(
            "provider.create_document",
            http.method = "POST",
            url = %self.client.url(&path)
        );
        let response = self
            .client
            .request(Method::POST, &path)
            .json(&payload)
            .send()
            .instrument(span)
            .await
            .map_err(ProviderError::from)?;

        match expect_success(response).await {
            Ok(body) => Ok(parse::<UserDocument>(body)?.into()),
            Err(ProviderError::Rejected { status, .. }) if status == StatusCode::CONFLICT => {
                Err(StoreError::Conflict)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn health(&self) -> Result<(), StoreError> {
        self.list(&[json!({"method": "limit", "values": [1]})])
            .await
            .map(|_| ())
    }
}
