//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the full router (middleware included) against a fresh
//! in-memory database with migrations applied. Methods are intentionally broad
//! to support various test scenarios across different test files.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use fintrack::config::Config;
use fintrack::db::{create_in_memory_pool, migrations};
use fintrack::server;
use fintrack::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tower::ServiceExt;

/// Pinned "today" used by tests that depend on the period filter.
pub const AS_OF: &str = "2024-03-15";

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 3001,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
            allowed_origins: vec!["http://localhost:5173".into()],
        };

        Self {
            state: AppState::new(pool, config),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    /// Send a request and return status and raw body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// GET and parse the body as JSON (`Value::Null` if it is not JSON).
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    pub async fn send_json(&self, method: &str, uri: &str, payload: &Value) -> (StatusCode, Value) {
        let (status, body) = self
            .send(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    pub async fn post_json(&self, uri: &str, payload: &Value) -> (StatusCode, Value) {
        self.send_json("POST", uri, payload).await
    }

    pub async fn put_json(&self, uri: &str, payload: &Value) -> (StatusCode, Value) {
        self.send_json("PUT", uri, payload).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self
            .send(
                Request::builder()
                    .method("DELETE")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    // =========================================================================
    // Helper methods for creating entities through the API
    // =========================================================================

    /// Create a transaction and return its id.
    pub async fn create_transaction(
        &self,
        date: &str,
        amount: f64,
        transaction_type: &str,
        category: &str,
        is_essential: Option<bool>,
    ) -> i64 {
        let mut payload = json!({
            "date": date,
            "description": format!("{} {}", category, date),
            "amount": amount,
            "type": transaction_type,
            "category": category,
            "payment_method": "Débito",
        });
        if let Some(flag) = is_essential {
            payload["is_essential"] = json!(flag);
        }

        let (status, body) = self.post_json("/api/transactions", &payload).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["data"]["id"].as_i64().expect("created transaction has an id")
    }

    pub async fn create_income(&self, date: &str, amount: f64) -> i64 {
        self.create_transaction(date, amount, "income", "Salário", None)
            .await
    }

    pub async fn create_expense(
        &self,
        date: &str,
        amount: f64,
        category: &str,
        is_essential: Option<bool>,
    ) -> i64 {
        self.create_transaction(date, amount, "expense", category, is_essential)
            .await
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
