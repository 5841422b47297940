use std::fmt;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use super::messages::ChatMessage;

pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>>;

#[derive(Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_key: Option<String>,
}

impl fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("messages", &self.messages.len())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion client is not available")]
    DependencyUnavailable,
    #[error("completion provider rejected credentials: {0}")]
    AuthenticationFailure(String),
    #[error("completion provider request failed: {0}")]
    TransportFailure(String),
    #[error("completion provider returned an invalid payload: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::DependencyUnavailable => "dependency_unavailable",
            Self::AuthenticationFailure(_) => "authentication_failure",
            Self::TransportFailure(_) => "transport_failure",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

pub trait CompletionGateway: Send + Sync {
    /// Capability flag fixed at construction; `false` means `complete` fails fast.
    fn is_available(&self) -> bool;

    fn complete<'a>(&'a self, request: CompletionRequest) -> CompletionFuture<'a>;
}
