use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, ModelOption};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub default_model: String,
    pub models: Vec<ModelOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotAnswerRequest {
    pub question: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub cite_sources: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotAnswerResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReplyRequestBody {
    pub email_text: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub extra_instructions: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReplyResponse {
    pub reply: String,
}
