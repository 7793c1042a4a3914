use std::sync::Arc;

use crate::{
    auth::{directory::UserDirectory, jwt::JwtService},
    config::AppConfig,
    store::RestaurantStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RestaurantStore>,
    pub users: Arc<UserDirectory>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RestaurantStore>,
        users: Arc<UserDirectory>,
        jwt: JwtService,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            users,
            jwt,
        }
    }
}
