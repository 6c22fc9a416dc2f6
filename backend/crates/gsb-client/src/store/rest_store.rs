use crate::{ApiClient, ClientError, ClientResult, RecordStore, Session, with_retry};

use gsb_config::{Config, RetryConfig};
use gsb_core::{BUSINESSES_COLLECTION, Business, BusinessFields};

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use uuid::Uuid;

const RETURN_REPRESENTATION: &str = "return=representation";

/// Record store backed by the project's REST endpoint (`/rest/v1/<collection>`)
pub struct RestStore {
    api: RwLock<ApiClient>,
    retry: RetryConfig,
    collection: String,
}

#[derive(Serialize)]
struct NewBusiness<'a> {
    #[serde(flatten)]
    fields: &'a BusinessFields,
    owner: Uuid,
}

impl RestStore {
    pub fn new(api: ApiClient, retry: RetryConfig) -> Self {
        Self {
            api: RwLock::new(api),
            retry,
            collection: BUSINESSES_COLLECTION.to_string(),
        }
    }

    /// Build a store acting as the session's identity.
    pub fn for_session(config: &Config, session: &Session) -> ClientResult<Self> {
        let api = ApiClient::new(&config.store)?.with_access_token(&session.access_token);
        Ok(Self::new(api, config.retry.clone()))
    }

    /// Client carrying the current access token
    fn api(&self) -> ApiClient {
        self.api
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn collection_path(&self) -> String {
        format!("/rest/v1/{}", self.collection)
    }

    /// Row filter matching one record of one owner
    fn scoped_path(&self, id: Uuid, owner: Uuid) -> String {
        format!("{}?id=eq.{id}&owner=eq.{owner}", self.collection_path())
    }

    fn returning(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Prefer", RETURN_REPRESENTATION)
    }

    async fn fetch_all(&self) -> ClientResult<Vec<Business>> {
        let path = format!("{}?select=*&order=created_at.desc", self.collection_path());
        let api = self.api();
        let req = api.request(Method::GET, &path);
        api.execute(req).await
    }

    async fn patch(
        &self,
        id: Uuid,
        owner: Uuid,
        fields: &BusinessFields,
    ) -> ClientResult<Vec<Business>> {
        let api = self.api();
        let req = self
            .returning(api.request(Method::PATCH, &self.scoped_path(id, owner)))
            .json(fields);
        api.execute(req).await
    }

    async fn remove(&self, id: Uuid, owner: Uuid) -> ClientResult<Vec<Business>> {
        let api = self.api();
        let req = self.returning(api.request(Method::DELETE, &self.scoped_path(id, owner)));
        api.execute(req).await
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn list(&self) -> ClientResult<Vec<Business>> {
        let records = with_retry(&self.retry, "list businesses", || self.fetch_all()).await?;
        debug!("Fetched {} businesses", records.len());
        Ok(records)
    }

    async fn insert(&self, owner: Uuid, fields: &BusinessFields) -> ClientResult<Business> {
        let body = NewBusiness { fields, owner };
        let api = self.api();
        let req = self
            .returning(api.request(Method::POST, &self.collection_path()))
            .json(&body);

        // Not retried: a lost response would create a duplicate
        let rows: Vec<Business> = api.execute(req).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ClientError::empty_result("Insert returned no row"))
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        fields: &BusinessFields,
    ) -> ClientResult<Business> {
        let rows = with_retry(&self.retry, "update business", || {
            self.patch(id, owner, fields)
        })
        .await?;

        rows.into_iter().next().ok_or_else(|| {
            ClientError::not_found(format!(
                "Business {id} not found or not owned by the current user"
            ))
        })
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> ClientResult<()> {
        let rows = with_retry(&self.retry, "delete business", || self.remove(id, owner)).await?;

        if rows.is_empty() {
            return Err(ClientError::not_found(format!(
                "Business {id} not found or not owned by the current user"
            )));
        }
        Ok(())
    }

    fn renew_session(&self, session: &Session) {
        let mut api = self.api.write().unwrap_or_else(PoisonError::into_inner);
        *api = api.clone().with_access_token(&session.access_token);
        debug!("Record store now acting with renewed session");
    }
}
