use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::{Restaurant, RestaurantDraft};

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

pub const DUPLICATE_CNPJ_MESSAGE: &str = "Restaurant with this CNPJ already exists";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),
    #[error("missing or invalid credentials")]
    Unauthorized,
    #[error("unexpected response: {0}")]
    Unexpected(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait RestaurantStore: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Restaurant>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Restaurant>, StoreError>;

    async fn create(&self, draft: RestaurantDraft) -> Result<Restaurant, StoreError>;

    /// Missing ids resolve to `None`, never an error.
    async fn update(&self, id: i64, draft: RestaurantDraft)
        -> Result<Option<Restaurant>, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn search(&self, filter: SearchFilter) -> Result<Vec<Restaurant>, StoreError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl SearchFilter {
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        field_matches(self.name.as_deref(), &restaurant.name)
            && field_matches(self.city.as_deref(), &restaurant.city)
            && field_matches(self.state.as_deref(), &restaurant.state)
            && field_matches(self.kind.as_deref(), &restaurant.kind)
    }
}

fn field_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim) {
        Some(term) if !term.is_empty() => normalize_text(actual).contains(&normalize_text(term)),
        _ => true,
    }
}

/// NFKD with combining marks removed, lowercased.
pub fn normalize_text(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
