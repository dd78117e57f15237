#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::sync::{Mutex, Once};
use std::time::Duration;

use vidora_client::{ApiError, ApiRequest, RawResponse, Transport};

static TRACING: Once = Once::new();

/// Route library logs through the test harness's captured output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

pub type Handler = Box<dyn Fn(&ApiRequest) -> Result<RawResponse, ApiError> + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    delay: Option<Duration>,
    handler: Handler,
}

/// One request as observed by the fake transport.
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Scripted in-process transport. Routes are matched by method and exact
/// path (first match wins); every request is logged for assertions.
#[derive(Default)]
pub struct FakeTransport {
    routes: Vec<Route>,
    log: Mutex<Vec<SentRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        init_tracing();
        Self::default()
    }

    pub fn on<F>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<RawResponse, ApiError> + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            delay: None,
            handler: Box::new(handler),
        });
        self
    }

    /// Like [`Self::on`], but the response is held back for `delay` first,
    /// so tests can overlap in-flight requests deterministically.
    pub fn on_delayed<F>(mut self, method: Method, path: &str, delay: Duration, handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<RawResponse, ApiError> + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            delay: Some(delay),
            handler: Box::new(handler),
        });
        self
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Number of requests made to a path, any method.
    pub fn calls_to(&self, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        self.log.lock().unwrap().push(SentRequest {
            method: request.method.clone(),
            path: request.path.clone(),
            query: request.query.clone(),
            bearer: request.bearer.clone(),
            body: request.body.clone(),
        });

        let route = self
            .routes
            .iter()
            .find(|r| r.method == request.method && r.path == request.path)
            .unwrap_or_else(|| panic!("no route for {} {}", request.method, request.path));

        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }
        (route.handler)(request)
    }
}

/// Response with the standard `{ statusCode, data, message, success }`
/// envelope around `data`.
pub fn enveloped(status: StatusCode, data: Value) -> RawResponse {
    RawResponse::new(
        status,
        json!({
            "statusCode": status.as_u16(),
            "data": data,
            "message": "ok",
            "success": status.is_success(),
        })
        .to_string(),
    )
}

pub fn ok(data: Value) -> Result<RawResponse, ApiError> {
    Ok(enveloped(StatusCode::OK, data))
}

/// Bare error response with a user-facing message in the envelope.
pub fn error_response(status: StatusCode, message: &str) -> Result<RawResponse, ApiError> {
    Ok(RawResponse::new(
        status,
        json!({
            "statusCode": status.as_u16(),
            "data": null,
            "message": message,
            "success": false,
        })
        .to_string(),
    ))
}

pub fn unauthorized() -> Result<RawResponse, ApiError> {
    error_response(StatusCode::UNAUTHORIZED, "jwt expired")
}

/// A page payload in the shape every listing endpoint returns.
pub fn page(docs: Vec<Value>, has_next: bool, total: u64) -> Value {
    json!({
        "docs": docs,
        "hasNextPage": has_next,
        "totalDocs": total,
        "page": 1,
    })
}

pub fn video(id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": "",
        "duration": 120.0,
        "views": 7,
        "isPublished": true,
        "likesCount": 5,
        "isLiked": false,
    })
}

pub fn user(id: &str, username: &str) -> Value {
    json!({
        "_id": id,
        "username": username,
        "fullName": "Test User",
        "email": format!("{}@example.com", username),
    })
}

pub fn auth_payload(access: &str, refresh: &str) -> Value {
    json!({
        "user": user("u1", "alice"),
        "accessToken": access,
        "refreshToken": refresh,
    })
}
