use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = state
        .users
        .authenticate(&payload.email, &payload.password)
        .map_err(|_| AppError::new(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS))?
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS))?;

    let access_token = state
        .jwt
        .generate_token(user.id, &user.email)
        .map_err(AppError::from)?;

    Ok(Json(LoginResponse { access_token }))
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<UserResponse>> {
    let record = state
        .users
        .find_by_id(user.user_id)
        .ok_or_else(AppError::not_found)?;

    Ok(Json(UserResponse {
        id: record.id,
        username: record.username.clone(),
        email: record.email.clone(),
    }))
}
