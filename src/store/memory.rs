use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::sleep;

use crate::models::{Restaurant, RestaurantDraft};

use super::{RestaurantStore, SearchFilter, StoreError, DUPLICATE_CNPJ_MESSAGE};

/// In-memory restaurant collection. With a latency it stands in for the
/// remote API in demo mode; with none it backs the registry server itself.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    latency: Duration,
}

struct Inner {
    rows: Vec<Restaurant>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_rows(Vec::new(), 1, Duration::ZERO)
    }

    /// Demo-mode store seeded with the two sample venues.
    pub fn demo(latency: Duration) -> Self {
        let rows = vec![
            Restaurant {
                id: 1,
                cnpj: "12345678000100".to_string(),
                name: "Restaurante A".to_string(),
                state: "SP".to_string(),
                city: "São Paulo".to_string(),
                kind: "Comida Brasileira".to_string(),
                operating_hours: "08:00 - 18:00".to_string(),
                postal_code: "01000-000".to_string(),
                street_number: "100".to_string(),
                endereco: "Rua das Flores".to_string(),
            },
            Restaurant {
                id: 2,
                cnpj: "98765432000199".to_string(),
                name: "Restaurante B".to_string(),
                state: "RJ".to_string(),
                city: "Rio de Janeiro".to_string(),
                kind: "Comida Italiana".to_string(),
                operating_hours: "10:00 - 22:00".to_string(),
                postal_code: "20000-000".to_string(),
                street_number: "200".to_string(),
                endereco: "Av. Atlântica".to_string(),
            },
        ];
        Self::with_rows(rows, 3, latency)
    }

    fn with_rows(rows: Vec<Restaurant>, next_id: i64, latency: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner { rows, next_id }),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RestaurantStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Restaurant>, StoreError> {
        self.simulate_latency().await;
        Ok(self.inner.read().await.rows.clone())
    }

    async fn get(&self, id: i64) -> Result<Option<Restaurant>, StoreError> {
        self.simulate_latency().await;
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, draft: RestaurantDraft) -> Result<Restaurant, StoreError> {
        self.simulate_latency().await;
        let mut inner = self.inner.write().await;
        if inner.rows.iter().any(|r| r.cnpj == draft.cnpj) {
            return Err(StoreError::Conflict(DUPLICATE_CNPJ_MESSAGE.to_string()));
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let restaurant = draft.into_restaurant(id);
        inner.rows.push(restaurant.clone());
        Ok(restaurant)
    }

    async fn update(
        &self,
        id: i64,
        draft: RestaurantDraft,
    ) -> Result<Option<Restaurant>, StoreError> {
        self.simulate_latency().await;
        let mut inner = self.inner.write().await;
        // Not-found wins over a cnpj conflict, matching the HTTP 404.
        let Some(pos) = inner.rows.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        if inner.rows.iter().any(|r| r.cnpj == draft.cnpj && r.id != id) {
            return Err(StoreError::Conflict(DUPLICATE_CNPJ_MESSAGE.to_string()));
        }

        inner.rows[pos] = draft.into_restaurant(id);
        Ok(Some(inner.rows[pos].clone()))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut inner = self.inner.write().await;
        inner.rows.retain(|r| r.id != id);
        Ok(())
    }

    async fn search(&self, filter: SearchFilter) -> Result<Vec<Restaurant>, StoreError> {
        self.simulate_latency().await;
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(cnpj: &str, name: &str) -> RestaurantDraft {
        RestaurantDraft {
            cnpj: cnpj.to_string(),
            name: name.to_string(),
            state: "SP".to_string(),
            city: "São Paulo".to_string(),
            kind: "bar".to_string(),
            operating_hours: "18:00 - 02:00".to_string(),
            postal_code: "01000-000".to_string(),
            street_number: "10".to_string(),
            endereco: "Rua Augusta".to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let store = MemoryStore::new();
        let first = store.create(draft("111", "Bar A")).await.unwrap();
        let second = store.create(draft("222", "Bar B")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn ids_are_never_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.create(draft("111", "Bar A")).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create(draft("222", "Bar B")).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn update_of_missing_id_changes_nothing() {
        let store = MemoryStore::new();
        store.create(draft("111", "Bar A")).await.unwrap();

        let result = store.update(99, draft("333", "Ghost")).await.unwrap();
        assert!(result.is_none());

        let rows = store.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Bar A");
    }

    #[tokio::test]
    async fn update_replaces_record_in_place() {
        let store = MemoryStore::new();
        let created = store.create(draft("111", "Bar A")).await.unwrap();

        let updated = store
            .update(created.id, draft("111", "Bar A Renovado"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Bar A Renovado");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let keep = store.create(draft("111", "Bar A")).await.unwrap();
        let gone = store.create(draft("222", "Bar B")).await.unwrap();

        store.delete(gone.id).await.unwrap();
        store.delete(gone.id).await.unwrap();
        store.delete(999).await.unwrap();

        let rows = store.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, keep.id);
    }

    #[tokio::test]
    async fn duplicate_cnpj_is_rejected_on_create_and_update() {
        let store = MemoryStore::new();
        store.create(draft("111", "Bar A")).await.unwrap();
        let second = store.create(draft("222", "Bar B")).await.unwrap();

        let conflict = store.create(draft("111", "Clone")).await;
        assert!(matches!(conflict, Err(StoreError::Conflict(_))));

        let cross = store.update(second.id, draft("111", "Bar B")).await;
        assert!(matches!(cross, Err(StoreError::Conflict(_))));

        // Updating a record while keeping its own CNPJ is fine.
        let same = store.update(second.id, draft("222", "Bar B v2")).await.unwrap();
        assert!(same.is_some());
    }

    #[tokio::test]
    async fn missing_id_beats_cnpj_conflict_on_update() {
        let store = MemoryStore::new();
        store.create(draft("111", "Bar A")).await.unwrap();

        let result = store.update(99, draft("111", "Ghost")).await.unwrap();
        assert!(result.is_none());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn demo_store_is_seeded() {
        let store = MemoryStore::demo(Duration::ZERO);
        let rows = store.list().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Restaurante A");
        assert_eq!(rows[1].city, "Rio de Janeiro");

        let next = store.create(draft("333", "Bar C")).await.unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn search_folds_accents() {
        let store = MemoryStore::demo(Duration::ZERO);
        let filter = SearchFilter {
            city: Some("SAO".to_string()),
            ..SearchFilter::default()
        };
        let rows = store.search(filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Restaurante A");
    }
}
