use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, ensure, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use qualaboa::auth::directory::UserDirectory;
use qualaboa::auth::jwt::JwtService;
use qualaboa::config::{AppConfig, ClientMode};
use qualaboa::mail::{EmailSender, MailTransport, OutgoingEmail};
use qualaboa::routes::{self, notify::NotifyState};
use qualaboa::state::AppState;
use qualaboa::store::{MemoryStore, RestaurantStore};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::util::ServiceExt;

#[allow(dead_code)]
pub const ADMIN_EMAIL: &str = "teste@admin.com";
#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "123456";

pub fn test_config() -> AppConfig {
    AppConfig {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        notify_host: "127.0.0.1".to_string(),
        notify_port: 0,
        jwt_secret: "test-secret".to_string(),
        jwt_issuer: "test-issuer".to_string(),
        jwt_expiry_minutes: 60,
        admin_username: "admin".to_string(),
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        client_mode: ClientMode::Demo,
        api_base_url: "http://localhost:5000/api".to_string(),
        mock_latency_ms: 0,
        session_file: ".test-session.json".to_string(),
        mail_host: "localhost".to_string(),
        mail_port: 1025,
        mail_user: None,
        mail_pass: None,
        mail_from: "\"Meu Projeto\" <seuemail@gmail.com>".to_string(),
    }
}

/// Transport double that records every delivery and can be switched into a
/// failing mode.
#[derive(Default)]
pub struct FakeMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
}

#[async_trait]
impl MailTransport for FakeMailer {
    async fn deliver(&self, email: OutgoingEmail) -> Result<()> {
        ensure!(
            !self.failing.load(Ordering::SeqCst),
            "smtp connection refused"
        );
        let mut guard = self.sent.lock().await;
        guard.push(email);
        Ok(())
    }
}

impl FakeMailer {
    #[allow(dead_code)]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        let guard = self.sent.lock().await;
        guard.clone()
    }

    #[allow(dead_code)]
    pub async fn sent_count(&self) -> usize {
        let guard = self.sent.lock().await;
        guard.len()
    }
}

pub struct TestApp {
    #[allow(dead_code)]
    pub state: AppState,
    router: Router,
    notify_router: Router,
    mailer: Arc<FakeMailer>,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        Self::with_store(test_config(), Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn RestaurantStore>) -> Result<Self> {
        let users = Arc::new(UserDirectory::from_config(&config)?);
        let jwt = JwtService::from_config(&config)?;
        let state = AppState::new(config, store, users, jwt);
        let router = routes::create_router(state.clone());

        let mailer = Arc::new(FakeMailer::default());
        let transport: Arc<dyn MailTransport> = mailer.clone();
        let sender = Arc::new(EmailSender::new(transport));
        let notify_router = routes::notify::create_router(NotifyState { sender });

        Ok(Self {
            state,
            router,
            notify_router,
            mailer,
        })
    }

    #[allow(dead_code)]
    pub fn mailer(&self) -> Arc<FakeMailer> {
        self.mailer.clone()
    }

    #[allow(dead_code)]
    pub async fn login_token(&self) -> Result<String> {
        #[derive(Serialize)]
        struct LoginPayload<'a> {
            email: &'a str,
            password: &'a str,
        }

        let response = self
            .post_json(
                "/api/auth/login",
                &LoginPayload {
                    email: ADMIN_EMAIL,
                    password: ADMIN_PASSWORD,
                },
                None,
            )
            .await?;

        ensure!(
            response.status() == StatusCode::OK,
            "login failed with status {}",
            response.status()
        );

        let body = body_to_vec(response.into_body()).await?;
        #[derive(serde::Deserialize)]
        struct LoginResponse {
            access_token: String,
        }
        let parsed: LoginResponse = serde_json::from_slice(&body)?;
        Ok(parsed.access_token)
    }

    #[allow(dead_code)]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(&self.router, Method::POST, path, payload, token)
            .await
    }

    #[allow(dead_code)]
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(&self.router, Method::PUT, path, payload, token)
            .await
    }

    /// POST against the standalone notification router.
    #[allow(dead_code)]
    pub async fn notify_post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(&self.notify_router, Method::POST, path, payload, None)
            .await
    }

    #[allow(dead_code)]
    pub async fn notify_get(&self, path: &str) -> Result<hyper::Response<Body>> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())?;
        Ok(self
            .notify_router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    #[allow(dead_code)]
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<hyper::Response<Body>> {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    #[allow(dead_code)]
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<hyper::Response<Body>> {
        let builder = Request::builder().method(Method::DELETE).uri(path);
        let builder = if let Some(token) = token {
            builder.header("authorization", format!("Bearer {token}"))
        } else {
            builder
        };
        let request = builder.body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        router: &Router,
        method: Method,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let body = serde_json::to_vec(payload)?;
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body))?;
        Ok(router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }
}

#[allow(dead_code)]
pub async fn body_to_vec(body: Body) -> Result<Vec<u8>> {
    let collected = body
        .collect()
        .await
        .map_err(|err| anyhow!("failed to read response body: {err}"))?;
    Ok(collected.to_bytes().to_vec())
}

/// Serves the registry API on an ephemeral port for tests that need a real
/// HTTP listener instead of `oneshot`.
#[allow(dead_code)]
pub async fn spawn_api(state: AppState) -> Result<SocketAddr> {
    let router = routes::create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            eprintln!("test server exited: {err}");
        }
    });
    Ok(addr)
}
