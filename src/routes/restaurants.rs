use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    models::{Restaurant, RestaurantDraft},
    state::AppState,
    store::SearchFilter,
};

#[derive(Deserialize)]
pub struct RestaurantPayload {
    pub cnpj: String,
    pub name: String,
    pub state: String,
    pub city: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub operating_hours: String,
    pub postal_code: String,
    pub street_number: String,
    // Older clients omit the street name.
    #[serde(default)]
    pub endereco: String,
}

impl RestaurantPayload {
    fn into_draft(self) -> RestaurantDraft {
        RestaurantDraft {
            cnpj: self.cnpj,
            name: self.name,
            state: self.state,
            city: self.city,
            kind: self.kind,
            operating_hours: self.operating_hours,
            postal_code: self.postal_code,
            street_number: self.street_number,
            endereco: self.endereco,
        }
    }
}

pub async fn list_restaurants(State(state): State<AppState>) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = state.store.list().await?;
    Ok(Json(restaurants))
}

pub async fn search_restaurants(
    State(state): State<AppState>,
    Query(filter): Query<SearchFilter>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = state.store.search(filter).await?;
    Ok(Json(restaurants))
}

pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = state
        .store
        .get(id)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(restaurant))
}

pub async fn create_restaurant(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<RestaurantPayload>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    let created = state.store.create(payload.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_restaurant(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<RestaurantPayload>,
) -> AppResult<Json<Restaurant>> {
    let updated = state
        .store
        .update(id, payload.into_draft())
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(updated))
}

pub async fn delete_restaurant(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
