use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::models::{Restaurant, RestaurantDraft};
use crate::session::SessionStore;

use super::{RestaurantStore, SearchFilter, StoreError};

pub struct HttpStore {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpStore {
    pub fn new(client: Client, base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// 401/403 are credential problems, 400 a duplicate-cnpj conflict.
async fn failure(response: Response) -> StoreError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return StoreError::Unauthorized;
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };

    if status == StatusCode::BAD_REQUEST {
        StoreError::Conflict(message)
    } else {
        StoreError::Unexpected(message)
    }
}

#[async_trait]
impl RestaurantStore for HttpStore {
    async fn list(&self) -> Result<Vec<Restaurant>, StoreError> {
        let response = self
            .authorize(self.client.get(self.url("/restaurants")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(response.json().await?)
    }

    async fn get(&self, id: i64) -> Result<Option<Restaurant>, StoreError> {
        let response = self
            .authorize(self.client.get(self.url(&format!("/restaurants/{id}"))))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(Some(response.json().await?))
    }

    async fn create(&self, draft: RestaurantDraft) -> Result<Restaurant, StoreError> {
        let response = self
            .authorize(self.client.post(self.url("/restaurants")))
            .json(&draft)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(response.json().await?)
    }

    async fn update(
        &self,
        id: i64,
        draft: RestaurantDraft,
    ) -> Result<Option<Restaurant>, StoreError> {
        let response = self
            .authorize(self.client.put(self.url(&format!("/restaurants/{id}"))))
            .json(&draft)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(Some(response.json().await?))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.delete(self.url(&format!("/restaurants/{id}"))))
            .send()
            .await?;
        // A 404 still means the record is gone; deletes stay idempotent
        // against servers that report one.
        if response.status() == StatusCode::NOT_FOUND || response.status().is_success() {
            return Ok(());
        }
        Err(failure(response).await)
    }

    async fn search(&self, filter: SearchFilter) -> Result<Vec<Restaurant>, StoreError> {
        let response = self
            .authorize(self.client.get(self.url("/restaurants/search")))
            .query(&filter)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(response.json().await?)
    }
}
