//! Shared fixtures for unit and HTTP tests.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::password::{Argon2Params, hash_password_with_params},
    config::{Config, PasswordConfig},
    db::{
        models::users::{UserCreateDBRequest, UserDBResponse},
        store::{InMemoryStore, Store},
    },
    payment_providers::dummy::DummyProvider,
};

/// Password used by [`signup`] and [`create_test_user`]
pub const TEST_PASSWORD: &str = "password123";

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        auth: crate::config::AuthConfig {
            // Minimal Argon2 cost so tests stay fast
            password: PasswordConfig {
                argon2_memory_kib: 128,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

/// State over a fresh in-memory store and the mock payment provider
pub fn create_test_state() -> AppState {
    AppState::builder()
        .store(Arc::new(InMemoryStore::new()))
        .payments(Arc::new(DummyProvider::new("usd")))
        .config(create_test_config())
        .build()
}

/// The full router over a fresh in-memory store
pub fn create_test_server() -> (TestServer, AppState) {
    let state = create_test_state();
    let router = crate::build_router(state.clone()).expect("Failed to build router");
    (TestServer::new(router).expect("Failed to create test server"), state)
}

/// Insert a user directly into the store
pub async fn create_test_user(store: &dyn Store, email: &str) -> UserDBResponse {
    let params = Argon2Params::from(&create_test_config().auth.password);
    store
        .create_user(&UserCreateDBRequest {
            email: email.to_string(),
            password_hash: hash_password_with_params(TEST_PASSWORD, params).expect("Failed to hash password"),
            name: None,
        })
        .await
        .expect("Failed to create test user")
}

/// Register through the API and return the access token
pub async fn signup(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    body["accessToken"].as_str().expect("No accessToken in response").to_string()
}

/// `Authorization` header value for a token
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
