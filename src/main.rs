use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use qualaboa::auth::directory::UserDirectory;
use qualaboa::auth::jwt::JwtService;
use qualaboa::config::AppConfig;
use qualaboa::routes;
use qualaboa::state::AppState;
use qualaboa::store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "api",
        server_host = %config.server_host,
        server_port = config.server_port,
        jwt_issuer = %config.jwt_issuer,
        cors_origins = config.cors_origins.len(),
        "loaded registry configuration"
    );

    let users = Arc::new(UserDirectory::from_config(&config)?);
    let jwt = JwtService::from_config(&config)?;
    let store = Arc::new(MemoryStore::new());

    let state = AppState::new(config, store, users, jwt);
    let listen_addr: SocketAddr = {
        let config = state.config.clone();
        format!("{}:{}", config.server_host, config.server_port).parse()?
    };
    let router = routes::create_router(state);

    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!("listening on {}", listen_addr);

    axum::serve(listener, router).await?;
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
