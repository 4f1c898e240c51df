//! Shared harness: the real router over an in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::Duration;
use clinic_api::AppState;
use clinic_api::config::ApiConfig;
use clinic_core::auth::RegisterInput;
use clinic_core::rbac::Role;
use clinic_core::store::MemoryStore;
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        pg_connection_url: "postgres://unused".into(),
        jwt_secret: "integration-test-secret".into(),
        token_ttl: Duration::hours(1),
        bcrypt_cost: 10,
    }
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(Arc::new(MemoryStore::new()), test_config()).unwrap();
        let router = clinic_api::router(state.clone());
        Self { state, router }
    }

    /// Create an account with `role` and return a token for it.
    pub async fn token_for(&self, role: Role) -> String {
        let email = format!("{}@clinic.test", role.as_str().to_lowercase());
        let user = self
            .state
            .auth
            .create_account(
                self.state.store.as_ref(),
                RegisterInput {
                    name: format!("{role} user"),
                    email,
                    password: PASSWORD.into(),
                    role: Some(role),
                },
            )
            .await
            .unwrap();
        self.state
            .auth
            .tokens()
            .issue(user.id, &user.email, user.role)
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        self.send_request(req).await
    }

    /// Send a prebuilt request and decode the JSON body (`Null` if none).
    pub async fn send_request(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.expect("request");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }
}
