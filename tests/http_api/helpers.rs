//! Shared helpers for HTTP API tests.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use eyre::WrapErr;
use rstest::fixture;
use serde_json::Value;
use std::sync::Arc;
use taskdesk::http::router;
use taskdesk::task::{
    adapters::memory::InMemoryTaskRepository, ports::TaskRepository, services::TaskService,
};
use tower::ServiceExt;

/// Status and decoded JSON body of one response.
#[derive(Debug)]
pub struct TestResponse {
    /// Response status.
    pub status: StatusCode,
    /// Decoded body; `Value::Null` when the body is empty.
    pub body: Value,
}

impl TestResponse {
    /// Returns the `error` member of the body.
    pub fn error(&self) -> &Value {
        &self.body["error"]
    }

    /// Returns the `data` member of the body.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

/// Router backed by a fresh in-memory repository.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Sends a request with an optional JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> eyre::Result<TestResponse> {
        let payload = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));
        self.send_body(method, uri, payload).await
    }

    /// Sends a request whose body is the given raw text.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        raw: &'static str,
    ) -> eyre::Result<TestResponse> {
        self.send_body(method, uri, Body::from(raw)).await
    }

    async fn send_body(&self, method: Method, uri: &str, body: Body) -> eyre::Result<TestResponse> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .wrap_err("build request")?;
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .wrap_err("read response body")?;
        let decoded = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).wrap_err("decode response body")?
        };
        Ok(TestResponse {
            status,
            body: decoded,
        })
    }

    /// Creates a task with the given title and returns its identifier.
    pub async fn create(&self, title: &str) -> eyre::Result<i64> {
        let response = self
            .send(
                Method::POST,
                "/tasks/",
                Some(serde_json::json!({ "title": title })),
            )
            .await?;
        eyre::ensure!(
            response.status == StatusCode::CREATED,
            "unexpected status {}",
            response.status
        );
        response.data()["id"]
            .as_i64()
            .ok_or_else(|| eyre::eyre!("created task has no id"))
    }
}

/// Provides an application with empty storage.
#[fixture]
pub fn app() -> TestApp {
    let repository: Arc<dyn TaskRepository> = Arc::new(InMemoryTaskRepository::new());
    TestApp {
        router: router(TaskService::new(repository)),
    }
}
