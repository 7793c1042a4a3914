use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEMO_EMAIL: &str = "teste@admin.com";
pub const DEMO_PASSWORD: &str = "123456";
pub const MOCK_TOKEN: &str = "mocked-jwt-token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credenciais inválidas")]
    InvalidCredentials,
    #[error("login request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;
}

pub struct MockAuth {
    latency: Duration,
}

impl MockAuth {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl AuthGateway for MockAuth {
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if email == DEMO_EMAIL && password == DEMO_PASSWORD {
            Ok(MOCK_TOKEN.to_string())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginBody {
    access_token: String,
}

pub struct RemoteAuth {
    client: Client,
    base_url: String,
}

impl RemoteAuth {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AuthGateway for RemoteAuth {
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginPayload { email, password })
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(AuthError::Transport(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body: LoginBody = response.json().await?;
        Ok(body.access_token)
    }
}
