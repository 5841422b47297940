use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::llm::ResponseOrchestrator;

mod assistant;
mod errors;
mod health;
mod observability;

pub use errors::ApiError;

#[derive(Clone, Debug)]
pub struct AppState {
    pub orchestrator: ResponseOrchestrator,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/v1/models", get(assistant::list_models))
        .route("/v1/chatbot/answer", post(assistant::answer_question))
        .route("/v1/emails/reply", post(assistant::reply_to_email))
        .layer(middleware::from_fn(
            observability::request_observability_middleware,
        ))
        .with_state(app_state)
}
