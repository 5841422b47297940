use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::gateway::{CompletionError, CompletionFuture, CompletionGateway, CompletionRequest};
use super::messages::ChatMessage;
use crate::config::{AssistantConfig, DEFAULT_API_KEY_ENV, DEFAULT_CHAT_COMPLETIONS_URL};
use crate::config_env::optional_trimmed_env;

#[derive(Debug, Clone)]
pub struct GroqGatewayConfig {
    pub chat_completions_url: String,
    /// Variable consulted when a request carries no key.
    pub ambient_api_key_env: String,
}

impl Default for GroqGatewayConfig {
    fn default() -> Self {
        Self {
            chat_completions_url: DEFAULT_CHAT_COMPLETIONS_URL.to_string(),
            ambient_api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl From<&AssistantConfig> for GroqGatewayConfig {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            chat_completions_url: config.chat_completions_url.clone(),
            ambient_api_key_env: config.api_key_env.clone(),
        }
    }
}

/// OpenAI-compatible chat-completions client. One request per call, transport
/// defaults for timeouts, no retries.
#[derive(Clone)]
pub struct GroqGateway {
    client: Option<reqwest::Client>,
    config: GroqGatewayConfig,
}

impl GroqGateway {
    pub fn new(config: GroqGatewayConfig) -> Self {
        let client = match reqwest::Client::builder().build() {
            Ok(client) => Some(client),
            Err(err) => {
                warn!("completion http client unavailable: {err}");
                None
            }
        };

        Self { client, config }
    }

    pub fn unavailable() -> Self {
        Self {
            client: None,
            config: GroqGatewayConfig::default(),
        }
    }

    async fn send_once(
        &self,
        client: &reqwest::Client,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = client
            .post(&self.config.chat_completions_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    CompletionError::TransportFailure("request_timed_out".to_string())
                } else {
                    CompletionError::TransportFailure("request_unavailable".to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|_| {
            CompletionError::MalformedResponse("response_body_read_failed".to_string())
        })?;

        if !status.is_success() {
            let provider_code = parse_provider_error_code(&body);
            let detail = format!("status={} code={provider_code}", status.as_u16());
            return Err(
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                    CompletionError::AuthenticationFailure(detail)
                } else {
                    CompletionError::TransportFailure(detail)
                },
            );
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|_| {
            CompletionError::MalformedResponse("response_json_parse_failed".to_string())
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::MalformedResponse("missing_choice".to_string()))?;

        Ok(choice
            .message
            .and_then(|message| message.content)
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

impl CompletionGateway for GroqGateway {
    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn complete<'a>(&'a self, request: CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(async move {
            let Some(client) = self.client.as_ref() else {
                return Err(CompletionError::DependencyUnavailable);
            };

            let api_key = match request.api_key.clone() {
                Some(key) => key,
                None => optional_trimmed_env(&self.config.ambient_api_key_env).ok_or_else(|| {
                    CompletionError::AuthenticationFailure("missing_api_key".to_string())
                })?,
            };

            debug!(
                model = %request.model,
                messages = request.messages.len(),
                "sending chat completion request"
            );
            self.send_once(client, &api_key, &request).await
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

fn parse_provider_error_code(body: &str) -> String {
    #[derive(Deserialize)]
    struct ProviderErrorEnvelope {
        error: Option<ProviderErrorDetails>,
    }

    #[derive(Deserialize)]
    struct ProviderErrorDetails {
        code: Option<Value>,
    }

    let parsed = serde_json::from_str::<ProviderErrorEnvelope>(body).ok();
    let Some(provider_error_code) = parsed
        .and_then(|envelope| envelope.error)
        .and_then(|details| details.code)
    else {
        return "unknown".to_string();
    };

    match provider_error_code {
        Value::String(code) => code,
        Value::Number(code) => code.to_string(),
        _ => "unknown".to_string(),
    }
}
