use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::credentials::CredentialResolver;
use super::fallback::{FallbackDomain, fallback_answer};
use super::gateway::{CompletionGateway, CompletionRequest};
use super::groq::{GroqGateway, GroqGatewayConfig};
use super::messages::{ChatMessage, build_messages};
use super::observability::{AnswerTelemetry, FallbackReason};
use crate::config::{AssistantConfig, GenerationDefaults};

#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerRequest<'a> {
    pub user_text: Option<&'a str>,
    pub system_prompt: Option<&'a str>,
    pub history: Option<&'a [ChatMessage]>,
    pub api_key: Option<&'a str>,
    pub model: Option<&'a str>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub fallback_domain: FallbackDomain,
}

#[derive(Debug, Clone)]
pub struct GeneratedAnswer {
    pub text: String,
    pub telemetry: AnswerTelemetry,
}

/// Entry point for every generated answer. Never fails: any completion error
/// is turned into the canned answer for the request's fallback domain.
#[derive(Clone)]
pub struct ResponseOrchestrator {
    gateway: Arc<dyn CompletionGateway>,
    credentials: CredentialResolver,
    defaults: GenerationDefaults,
}

impl fmt::Debug for ResponseOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseOrchestrator")
            .field("gateway_available", &self.gateway.is_available())
            .field("credentials", &self.credentials)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl ResponseOrchestrator {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        credentials: CredentialResolver,
        defaults: GenerationDefaults,
    ) -> Self {
        Self {
            gateway,
            credentials,
            defaults,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(
            Arc::new(GroqGateway::new(GroqGatewayConfig::from(config))),
            CredentialResolver::from_config(config),
            config.defaults.clone(),
        )
    }

    pub fn defaults(&self) -> &GenerationDefaults {
        &self.defaults
    }

    pub async fn generate_answer(&self, request: &AnswerRequest<'_>) -> String {
        self.generate(request).await.text
    }

    pub async fn generate(&self, request: &AnswerRequest<'_>) -> GeneratedAnswer {
        let started_at = Instant::now();
        let messages = build_messages(request.user_text, request.system_prompt, request.history);
        let api_key = self.credentials.resolve(request.api_key);

        if api_key.is_none() && !self.gateway.is_available() {
            return self.fallback(request, None, started_at, FallbackReason::ShortCircuit);
        }

        let model = request
            .model
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(&self.defaults.model)
            .to_string();

        let completion_request = CompletionRequest {
            messages,
            model: model.clone(),
            temperature: request
                .temperature
                .unwrap_or(self.defaults.chatbot.temperature)
                .clamp(0.0, 1.0),
            max_tokens: request
                .max_tokens
                .filter(|max_tokens| *max_tokens > 0)
                .unwrap_or(self.defaults.chatbot.max_tokens),
            api_key,
        };

        match self.gateway.complete(completion_request).await {
            Ok(text) => {
                let telemetry = AnswerTelemetry::completion(
                    request.fallback_domain,
                    model,
                    started_at.elapsed(),
                );
                telemetry.emit();
                GeneratedAnswer { text, telemetry }
            }
            Err(err) => self.fallback(
                request,
                Some(model),
                started_at,
                FallbackReason::from_error(&err),
            ),
        }
    }

    fn fallback(
        &self,
        request: &AnswerRequest<'_>,
        model: Option<String>,
        started_at: Instant,
        reason: FallbackReason,
    ) -> GeneratedAnswer {
        let text = fallback_answer(request.user_text.unwrap_or_default(), request.fallback_domain);
        let telemetry = AnswerTelemetry::fallback(
            request.fallback_domain,
            model,
            started_at.elapsed(),
            reason,
        );
        telemetry.emit();
        GeneratedAnswer {
            text: text.to_string(),
            telemetry,
        }
    }
}
