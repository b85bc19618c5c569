#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use privilege_shop_api::server;
use privilege_shop_api::testing::MemoryStore;

pub struct TestServer {
    pub base_url: String,
    pub store: MemoryStore,
}

impl TestServer {
    /// Function endpoint for an action, e.g. `http://127.0.0.1:1234/?action=orders`
    pub fn action_url(&self, action: &str) -> String {
        format!("{}/?action={}", self.base_url, action)
    }
}

/// Serve the app over a fresh in-memory store on an ephemeral port.
/// The server lives as long as the calling test's runtime.
pub async fn spawn_server() -> Result<TestServer> {
    let store = MemoryStore::new();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    let app = server::app(Arc::new(store.clone()));
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server stopped: {e}");
        }
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        store,
    })
}

/// Seed an admin and log in through the API, returning the token
pub async fn login_as(server: &TestServer, username: &str, password: &str) -> Result<String> {
    server.store.seed_admin(username, password);
    let body = reqwest::Client::new()
        .post(server.action_url("login"))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    body["token"]
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("login response has no token: {}", body))
}
