use axum::http::{HeaderValue, StatusCode};
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod auth;
pub mod notify;
pub mod restaurants;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = cors_layer(&state.config.cors_origins);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    let restaurants_routes = Router::new()
        .route(
            "/",
            get(restaurants::list_restaurants).post(restaurants::create_restaurant),
        )
        .route("/search", get(restaurants::search_restaurants))
        .route(
            "/:id",
            get(restaurants::get_restaurant)
                .put(restaurants::update_restaurant)
                .delete(restaurants::delete_restaurant),
        );

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/restaurants", restaurants_routes)
        .route("/api/health", get(health_check))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let headers: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| {
                trimmed
                    .parse::<HeaderValue>()
                    .expect("invalid CORS allowed origin")
            })
        })
        .collect();

    if headers.is_empty() {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(headers))
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    }
}

pub async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
