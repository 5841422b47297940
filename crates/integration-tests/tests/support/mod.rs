#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use api_server::http::{AppState, build_router};
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use shared::config::GenerationDefaults;
use shared::llm::{
    CompletionError, CompletionFuture, CompletionGateway, CompletionRequest, CredentialResolver,
    NoSecretStore, ResponseOrchestrator,
};
use tokio::sync::Mutex;
use tower::ServiceExt;

const UNSET_ENV_KEY: &str = "POWERGAS_INTEGRATION_KEY_NEVER_SET";

#[derive(Clone)]
pub struct StubGateway {
    available: bool,
    responses: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    seen_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl StubGateway {
    pub fn replying(responses: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            available: true,
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            seen_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn offline() -> Self {
        Self {
            available: false,
            ..Self::replying(Vec::new())
        }
    }

    pub async fn seen_requests(&self) -> Vec<CompletionRequest> {
        self.seen_requests.lock().await.clone()
    }
}

impl CompletionGateway for StubGateway {
    fn is_available(&self) -> bool {
        self.available
    }

    fn complete<'a>(&'a self, request: CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(async move {
            self.seen_requests.lock().await.push(request);
            self.responses.lock().await.pop_front().unwrap_or_else(|| {
                Err(CompletionError::TransportFailure(
                    "missing_stub_response".to_string(),
                ))
            })
        })
    }
}

pub fn build_test_router(gateway: &StubGateway) -> axum::Router {
    let orchestrator = ResponseOrchestrator::new(
        Arc::new(gateway.clone()),
        CredentialResolver::new(UNSET_ENV_KEY, Arc::new(NoSecretStore)),
        GenerationDefaults::default(),
    );

    build_router(AppState { orchestrator })
}

pub struct JsonResponse {
    pub status: StatusCode,
    pub request_id: Option<String>,
    pub body: Value,
}

pub async fn send_json(app: &axum::Router, request: Request<Body>) -> JsonResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should read");
    let body = serde_json::from_slice::<Value>(&body).unwrap_or_else(|_| json!({}));

    JsonResponse {
        status,
        request_id,
        body,
    }
}

pub fn request(method: Method, path: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::ACCEPT, "application/json");

    let request_body = body
        .map(|value| {
            serde_json::to_vec(&value).expect("json body should serialize for integration request")
        })
        .unwrap_or_default();
    if !request_body.is_empty() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }

    builder
        .body(Body::from(request_body))
        .expect("integration request should build")
}

pub fn error_code(body: &Value) -> Option<&str> {
    body.get("error")?.get("code")?.as_str()
}
