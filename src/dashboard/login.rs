use std::sync::Arc;

use super::gateway::AuthGateway;
use super::Redirect;
use crate::session::SessionStore;

pub const LOGIN_ERROR_MESSAGE: &str = "E-mail ou senha inválidos.";

pub struct LoginView {
    gateway: Arc<dyn AuthGateway>,
    session: Arc<dyn SessionStore>,
    error: Option<String>,
}

impl LoginView {
    pub fn new(gateway: Arc<dyn AuthGateway>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            session,
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit(&mut self, email: &str, password: &str) -> Option<Redirect> {
        self.error = None;

        match self.gateway.login(email, password).await {
            Ok(token) => {
                if let Err(err) = self.session.store_token(&token) {
                    tracing::error!("failed to persist session token: {err:#}");
                    self.error = Some(LOGIN_ERROR_MESSAGE.to_string());
                    return None;
                }
                Some(Redirect::Dashboard)
            }
            Err(err) => {
                tracing::debug!("login rejected: {err}");
                self.error = Some(LOGIN_ERROR_MESSAGE.to_string());
                None
            }
        }
    }
}
