use std::env;

use anyhow::{bail, Context, Result};
use url::Url;

pub const DEFAULT_MOCK_LATENCY_MS: u64 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientMode {
    Demo,
    Remote,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub notify_host: String,
    pub notify_port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiry_minutes: i64,
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
    pub cors_origins: Vec<String>,
    pub client_mode: ClientMode,
    pub api_base_url: String,
    pub mock_latency_ms: u64,
    pub session_file: String,
    pub mail_host: String,
    pub mail_port: u16,
    pub mail_user: Option<String>,
    pub mail_pass: Option<String>,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .context("SERVER_PORT must be a valid u16")?;
        let notify_host = env::var("NOTIFY_HOST").unwrap_or_else(|_| server_host.clone());
        let notify_port = env::var("NOTIFY_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("NOTIFY_PORT must be a valid u16")?;
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "dev".to_string());
        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "qualaboa".to_string());
        let jwt_expiry_minutes = env::var("JWT_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .context("JWT_EXPIRY_MINUTES must be an integer")?;
        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "teste@admin.com".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "123456".to_string());
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| {
            "http://localhost:3000,http://127.0.0.1:3000".to_string()
        }));
        let client_mode =
            parse_client_mode(&env::var("CLIENT_MODE").unwrap_or_else(|_| "demo".to_string()))?;
        let api_base_url = normalize_base_url(
            &env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
        )?;
        let mock_latency_ms = env::var("MOCK_LATENCY_MS")
            .unwrap_or_else(|_| DEFAULT_MOCK_LATENCY_MS.to_string())
            .parse()
            .context("MOCK_LATENCY_MS must be an integer")?;
        let session_file =
            env::var("SESSION_FILE").unwrap_or_else(|_| ".qualaboa-session.json".to_string());
        let mail_host = env::var("MAIL_HOST").unwrap_or_else(|_| "localhost".to_string());
        let mail_port = env::var("MAIL_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .context("MAIL_PORT must be a valid u16")?;
        let mail_user = env::var("MAIL_USER").ok();
        let mail_pass = env::var("MAIL_PASS").ok();
        let mail_from = env::var("MAIL_FROM")
            .unwrap_or_else(|_| "\"Meu Projeto\" <seuemail@gmail.com>".to_string());

        Ok(Self {
            server_host,
            server_port,
            notify_host,
            notify_port,
            jwt_secret,
            jwt_issuer,
            jwt_expiry_minutes,
            admin_username,
            admin_email,
            admin_password,
            cors_origins,
            client_mode,
            api_base_url,
            mock_latency_ms,
            session_file,
            mail_host,
            mail_port,
            mail_user,
            mail_pass,
            mail_from,
        })
    }
}

fn parse_client_mode(raw: &str) -> Result<ClientMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "demo" | "mock" => Ok(ClientMode::Demo),
        "remote" | "api" => Ok(ClientMode::Remote),
        other => bail!("CLIENT_MODE must be 'demo' or 'remote', got '{other}'"),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    Url::parse(trimmed).with_context(|| format!("API_BASE_URL is not a valid URL: '{trimmed}'"))?;
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    // from_env tests mutate process-wide environment variables.
    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const KEYS: [&str; 20] = [
        "SERVER_HOST",
        "SERVER_PORT",
        "NOTIFY_HOST",
        "NOTIFY_PORT",
        "JWT_SECRET",
        "JWT_ISSUER",
        "JWT_EXPIRY_MINUTES",
        "ADMIN_USERNAME",
        "ADMIN_EMAIL",
        "ADMIN_PASSWORD",
        "CORS_ORIGINS",
        "CLIENT_MODE",
        "API_BASE_URL",
        "MOCK_LATENCY_MS",
        "SESSION_FILE",
        "MAIL_HOST",
        "MAIL_PORT",
        "MAIL_USER",
        "MAIL_PASS",
        "MAIL_FROM",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn parses_client_modes() {
        assert_eq!(parse_client_mode("demo").unwrap(), ClientMode::Demo);
        assert_eq!(parse_client_mode(" Remote ").unwrap(), ClientMode::Remote);
        assert!(parse_client_mode("hybrid").is_err());
    }

    #[test]
    fn splits_and_trims_origins() {
        let origins = parse_origins(" http://localhost:3000 , http://127.0.0.1:3000,");
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string()
            ]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let url = normalize_base_url("http://localhost:5000/api/").unwrap();
        assert_eq!(url, "http://localhost:5000/api");
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn from_env_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.notify_port, 3000);
        assert_eq!(config.jwt_secret, "dev");
        assert_eq!(config.admin_email, "teste@admin.com");
        assert_eq!(config.client_mode, ClientMode::Demo);
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.mock_latency_ms, DEFAULT_MOCK_LATENCY_MS);
        assert!(config.mail_user.is_none());
        clear_env();
    }

    #[test]
    fn from_env_reads_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var("SERVER_PORT", "8080");
        env::set_var("CLIENT_MODE", "remote");
        env::set_var("API_BASE_URL", "https://registry.example.com/api/");
        env::set_var("MAIL_USER", "mailer");
        env::set_var("MAIL_PASS", "s3cret");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.client_mode, ClientMode::Remote);
        assert_eq!(config.api_base_url, "https://registry.example.com/api");
        assert_eq!(config.mail_user.as_deref(), Some("mailer"));
        assert_eq!(config.mail_pass.as_deref(), Some("s3cret"));
        clear_env();
    }
}
