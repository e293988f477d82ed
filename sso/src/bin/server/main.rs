use std::net::SocketAddr;
use std::sync::Arc;

use auth::PasswordHasher;
use sso::config::Config;
use sso::domain::auth::service::AuthService;
use sso::domain::auth::token::SystemClock;
use sso::domain::auth::token::TokenIssuer;
use sso::inbound::grpc::AuthGrpcService;
use sso::proto::auth_server::AuthServer;
use sso::repositories::SqliteStorage;
use sso::telemetry;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    telemetry::init(config.env);

    tracing::info!(
        service = "sso",
        version = env!("CARGO_PKG_VERSION"),
        env = ?config.env,
        "Service starting"
    );

    tracing::info!(
        storage_path = %config.storage.path,
        grpc_port = config.grpc.port,
        grpc_timeout_ms = config.grpc.timeout_ms,
        token_ttl_seconds = config.auth.token_ttl_seconds,
        "Configuration loaded"
    );

    let storage = SqliteStorage::connect(&config.storage).await?;
    tracing::info!(
        max_connections = config.storage.max_connections,
        database = "sqlite",
        "Database connection pool created"
    );

    storage.migrate().await?;
    tracing::info!(database = "sqlite", "Database migrations completed");

    let storage = Arc::new(storage);
    let password_hasher = PasswordHasher::with_cost(
        config.auth.password.memory_kib,
        config.auth.password.iterations,
        config.auth.password.parallelism,
    )?;
    let token_issuer = TokenIssuer::new(config.token_ttl()?, Arc::new(SystemClock))?;

    let auth_service = Arc::new(AuthService::new(
        tracing::info_span!("sso", env = ?config.env),
        Arc::clone(&storage),
        Arc::clone(&storage),
        Arc::clone(&storage),
        password_hasher,
        token_issuer,
    ));

    let grpc_address: SocketAddr = format!("0.0.0.0:{}", config.grpc.port).parse()?;
    let grpc_service = AuthGrpcService::new(auth_service, config.grpc.timeout());
    tracing::info!(
        address = %grpc_address,
        port = config.grpc.port,
        protocol = "grpc",
        "gRpc server listening"
    );

    Server::builder()
        .timeout(config.grpc.timeout())
        .add_service(AuthServer::new(grpc_service))
        .serve_with_shutdown(grpc_address, shutdown_signal())
        .await?;

    tracing::info!("Server stopped gracefully");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
