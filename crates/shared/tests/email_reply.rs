use std::sync::Arc;

use shared::config::GenerationDefaults;
use shared::llm::fallback::GENERIC_FALLBACK_ANSWER;
use shared::llm::prompts::{EMAIL_SYSTEM_PROMPT_EN, EMAIL_SYSTEM_PROMPT_FR};
use shared::llm::{
    CompletionError, CompletionFuture, CompletionGateway, CompletionRequest, CredentialResolver,
    EmailReplyRequest, NoSecretStore, ResponseOrchestrator, Role, generate_email_reply,
};
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct RecordingGateway {
    reply: Option<String>,
    seen_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl RecordingGateway {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    async fn only_request(&self) -> CompletionRequest {
        let seen = self.seen_requests.lock().await;
        assert_eq!(seen.len(), 1, "expected exactly one completion call");
        seen[0].clone()
    }
}

impl CompletionGateway for RecordingGateway {
    fn is_available(&self) -> bool {
        self.reply.is_some()
    }

    fn complete<'a>(&'a self, request: CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(async move {
            self.seen_requests.lock().await.push(request);
            self.reply
                .clone()
                .ok_or(CompletionError::DependencyUnavailable)
        })
    }
}

fn orchestrator_with(gateway: &RecordingGateway) -> ResponseOrchestrator {
    ResponseOrchestrator::new(
        Arc::new(gateway.clone()),
        CredentialResolver::new(
            "POWERGAS_TEST_EMAIL_KEY_NEVER_SET",
            Arc::new(NoSecretStore),
        ),
        GenerationDefaults::default(),
    )
}

#[tokio::test]
async fn french_reply_uses_email_defaults_and_single_turn() {
    let gateway = RecordingGateway::replying("Bonjour,\n\nMerci pour votre message.");
    let orchestrator = orchestrator_with(&gateway);

    let reply = generate_email_reply(
        &orchestrator,
        &EmailReplyRequest {
            incoming_email_text: "Objet: Facture\n\nMa facture est trop élevée.",
            tone: "INVALID",
            language: "de",
            api_key: Some("test-key"),
            ..EmailReplyRequest::default()
        },
    )
    .await;

    assert_eq!(reply, "Bonjour,\n\nMerci pour votre message.");

    let request = gateway.only_request().await;
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[0].content, EMAIL_SYSTEM_PROMPT_FR);
    assert_eq!(request.messages[1].role, Role::User);
    assert!(
        request.messages[1]
            .content
            .starts_with("Rédige une réponse en français, ton professionnel et poli.")
    );
    assert!(
        request.messages[1]
            .content
            .contains("---\nObjet: Facture\n\nMa facture est trop élevée.\n---\n")
    );
    assert_eq!(request.max_tokens, 900);
    assert!((request.temperature - 0.3).abs() < f32::EPSILON);
}

#[tokio::test]
async fn english_reply_carries_tone_constraints_and_overrides() {
    let gateway = RecordingGateway::replying("Hello, thanks for reaching out.");
    let orchestrator = orchestrator_with(&gateway);

    generate_email_reply(
        &orchestrator,
        &EmailReplyRequest {
            incoming_email_text: "Where is my refund?",
            tone: "Convivial",
            language: "EN",
            extra_instructions: Some("Mention the 10 day delay."),
            api_key: Some("test-key"),
            model: Some("llama-3.3-70b-versatile"),
            temperature: Some(0.6),
            max_tokens: Some(400),
        },
    )
    .await;

    let request = gateway.only_request().await;
    assert_eq!(request.messages[0].content, EMAIL_SYSTEM_PROMPT_EN);
    assert!(
        request.messages[1]
            .content
            .starts_with("Write the reply in English, tone amical et accessible.")
    );
    assert!(
        request.messages[1]
            .content
            .ends_with("Additional constraints: Mention the 10 day delay.\n")
    );
    assert_eq!(request.model, "llama-3.3-70b-versatile");
    assert_eq!(request.max_tokens, 400);
    assert!((request.temperature - 0.6).abs() < f32::EPSILON);
}

#[tokio::test]
async fn zero_token_limit_uses_email_default() {
    let gateway = RecordingGateway::replying("ok");
    let orchestrator = orchestrator_with(&gateway);

    generate_email_reply(
        &orchestrator,
        &EmailReplyRequest {
            incoming_email_text: "Bonjour",
            api_key: Some("test-key"),
            max_tokens: Some(0),
            ..EmailReplyRequest::default()
        },
    )
    .await;

    assert_eq!(gateway.only_request().await.max_tokens, 900);
}

#[tokio::test]
async fn unavailable_service_returns_generic_fallback() {
    let gateway = RecordingGateway::default();
    let orchestrator = orchestrator_with(&gateway);

    let reply = generate_email_reply(
        &orchestrator,
        &EmailReplyRequest {
            incoming_email_text: "Le prix du kWh a augmenté, pourquoi ?",
            tone: "ferme",
            language: "fr",
            ..EmailReplyRequest::default()
        },
    )
    .await;

    assert_eq!(reply, GENERIC_FALLBACK_ANSWER);
    assert!(gateway.seen_requests.lock().await.is_empty());
}
