pub mod catalog;
pub mod chatbot;
pub mod credentials;
pub mod email;
pub mod fallback;
pub mod gateway;
pub mod groq;
pub mod messages;
pub mod observability;
pub mod orchestrator;
pub mod prompts;

pub use catalog::{ModelOption, available_models, find_model};
pub use chatbot::{EnergyQuestion, answer_energy_question};
pub use credentials::{
    CredentialResolver, DotenvSecretStore, NoSecretStore, SecretStore, SecretStoreError,
    resolve_api_key,
};
pub use email::{
    EmailReplyRequest, ReplyLanguage, Tone, compose_incoming_email, generate_email_reply,
};
pub use fallback::{FallbackDomain, fallback_answer};
pub use gateway::{CompletionError, CompletionFuture, CompletionGateway, CompletionRequest};
pub use groq::{GroqGateway, GroqGatewayConfig};
pub use messages::{ChatMessage, Role, build_messages};
pub use observability::{AnswerTelemetry, FallbackReason};
pub use orchestrator::{AnswerRequest, GeneratedAnswer, ResponseOrchestrator};
