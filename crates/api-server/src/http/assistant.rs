use axum::Json;
use axum::extract::State;
use shared::llm::{
    EmailReplyRequest, EnergyQuestion, answer_energy_question, available_models,
    compose_incoming_email, generate_email_reply,
};
use shared::models::{
    ChatbotAnswerRequest, ChatbotAnswerResponse, EmailReplyRequestBody, EmailReplyResponse,
    ModelsResponse,
};
use tracing::debug;

use super::AppState;
use super::errors::ApiError;

pub(super) async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        default_model: state.orchestrator.defaults().model.clone(),
        models: available_models().to_vec(),
    })
}

pub(super) async fn answer_question(
    State(state): State<AppState>,
    Json(req): Json<ChatbotAnswerRequest>,
) -> Result<Json<ChatbotAnswerResponse>, ApiError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(ApiError::InvalidRequest("question must not be empty"));
    }

    debug!(
        history_len = req.history.len(),
        cite_sources = req.cite_sources,
        "answering energy question"
    );

    let answer = answer_energy_question(
        &state.orchestrator,
        &EnergyQuestion {
            question,
            history: &req.history,
            api_key: None,
            model: req.model.as_deref(),
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            cite_sources: req.cite_sources,
        },
    )
    .await;

    Ok(Json(ChatbotAnswerResponse { answer }))
}

pub(super) async fn reply_to_email(
    State(state): State<AppState>,
    Json(req): Json<EmailReplyRequestBody>,
) -> Result<Json<EmailReplyResponse>, ApiError> {
    if req.email_text.trim().is_empty() {
        return Err(ApiError::InvalidRequest("email_text must not be empty"));
    }

    let incoming_email_text = compose_incoming_email(req.subject.as_deref(), &req.email_text);
    let reply = generate_email_reply(
        &state.orchestrator,
        &EmailReplyRequest {
            incoming_email_text: &incoming_email_text,
            tone: req.tone.as_deref().unwrap_or_default(),
            language: req.language.as_deref().unwrap_or_default(),
            extra_instructions: req.extra_instructions.as_deref(),
            api_key: None,
            model: req.model.as_deref(),
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        },
    )
    .await;

    Ok(Json(EmailReplyResponse { reply }))
}
