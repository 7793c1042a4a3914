use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower::make::Shared;
use tracing_subscriber::EnvFilter;

use qualaboa::config::AppConfig;
use qualaboa::mail::{EmailSender, SmtpMailTransport};
use qualaboa::routes::notify::{self, NotifyState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "notifier",
        notify_host = %config.notify_host,
        notify_port = config.notify_port,
        mail_host = %config.mail_host,
        mail_port = config.mail_port,
        mail_auth = config.mail_user.is_some(),
        "loaded notifier configuration"
    );

    let transport = Arc::new(SmtpMailTransport::from_config(&config)?);
    let sender = Arc::new(EmailSender::new(transport));

    let listen_addr: SocketAddr =
        format!("{}:{}", config.notify_host, config.notify_port).parse()?;
    let router = notify::create_router(NotifyState { sender });

    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!("listening for notifications on {}", listen_addr);

    axum::serve(listener, Shared::new(router)).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
