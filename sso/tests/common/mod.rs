#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::Claims;
use auth::JwtHandler;
use auth::PasswordHasher;
use sso::config::StorageConfig;
use sso::domain::auth::models::AppId;
use sso::domain::auth::service::AuthService;
use sso::domain::auth::token::SystemClock;
use sso::domain::auth::token::TokenIssuer;
use sso::inbound::grpc::AuthGrpcService;
use sso::proto::auth_client::AuthClient;
use sso::proto::auth_server::AuthServer;
use sso::repositories::SqliteStorage;
use tonic::transport::Channel;
use tonic::transport::Server;

pub const TEST_APP_ID: i32 = 1;
pub const TEST_APP_SECRET: &str = "test-secret";
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Fresh in-memory credential store with the schema applied.
pub async fn test_storage() -> SqliteStorage {
    let storage = SqliteStorage::connect(&StorageConfig {
        path: ":memory:".to_string(),
        max_connections: 5,
    })
    .await
    .expect("Failed to open in-memory storage");

    storage.migrate().await.expect("Failed to run migrations");

    storage
}

/// Test application serving the gRPC API on a random local port
pub struct TestApp {
    pub address: String,
    pub storage: SqliteStorage,
    pub client: AuthClient<Channel>,
}

impl TestApp {
    /// Spawn the server in a background task with app 1 provisioned
    pub async fn spawn() -> Self {
        Self::spawn_with_timeout(Duration::from_secs(5)).await
    }

    pub async fn spawn_with_timeout(timeout: Duration) -> Self {
        let storage = test_storage().await;
        storage
            .save_app(AppId(TEST_APP_ID), "test", TEST_APP_SECRET)
            .await
            .expect("Failed to provision test app");

        // Use random port (0 = OS assigns)
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("Failed to bind random port")
            .port();
        let socket: SocketAddr = ([127, 0, 0, 1], port).into();
        let address = format!("http://127.0.0.1:{}", port);

        let shared = Arc::new(storage.clone());
        let password_hasher =
            PasswordHasher::with_cost(8 * 1024, 1, 1).expect("Failed to build password hasher");
        let token_issuer = TokenIssuer::new(
            chrono::Duration::seconds(TOKEN_TTL_SECONDS),
            Arc::new(SystemClock),
        )
        .expect("Failed to build token issuer");

        let service = Arc::new(AuthService::new(
            tracing::info_span!("sso-test"),
            Arc::clone(&shared),
            Arc::clone(&shared),
            Arc::clone(&shared),
            password_hasher,
            token_issuer,
        ));
        let grpc_service = AuthGrpcService::new(service, timeout);

        // Spawn server in background
        tokio::spawn(async move {
            Server::builder()
                .add_service(AuthServer::new(grpc_service))
                .serve(socket)
                .await
                .expect("Server error");
        });

        let client = connect(&address).await;

        Self {
            address,
            storage,
            client,
        }
    }

    /// Another client on its own connection.
    pub async fn new_client(&self) -> AuthClient<Channel> {
        connect(&self.address).await
    }
}

async fn connect(address: &str) -> AuthClient<Channel> {
    for _ in 0..50 {
        if let Ok(client) = AuthClient::connect(address.to_string()).await {
            return client;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    panic!("Server at {} did not come up", address);
}

/// Decode a token with the test application's secret.
pub fn decode_token(token: &str) -> Claims {
    JwtHandler::new(TEST_APP_SECRET.as_bytes())
        .expect("Failed to build jwt handler")
        .decode::<Claims>(token)
        .expect("Failed to decode token")
}
