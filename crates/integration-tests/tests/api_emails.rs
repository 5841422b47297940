mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use shared::llm::fallback::GENERIC_FALLBACK_ANSWER;

use support::{StubGateway, build_test_router, error_code, request, send_json};

#[tokio::test]
async fn reply_includes_subject_tone_and_constraints() {
    let gateway = StubGateway::replying(vec![Ok(
        "Bonjour,\n\nNous revenons vers vous sous 48h.".to_string(),
    )]);
    let app = build_test_router(&gateway);

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/v1/emails/reply",
            Some(json!({
                "email_text": "Ma facture de janvier est incorrecte.",
                "subject": "Réclamation",
                "tone": "empathique",
                "language": "fr",
                "extra_instructions": "Proposer un rappel téléphonique."
            })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["reply"],
        "Bonjour,\n\nNous revenons vers vous sous 48h."
    );

    let seen = gateway.seen_requests().await;
    assert_eq!(seen.len(), 1);
    let sent = &seen[0];
    assert_eq!(sent.messages.len(), 2);
    assert_eq!(sent.max_tokens, 900);
    assert!((sent.temperature - 0.3).abs() < f32::EPSILON);
    let prompt = &sent.messages[1].content;
    assert!(prompt.starts_with("Rédige une réponse en français, ton empathique et rassurant."));
    assert!(
        prompt.contains("---\nObjet: Réclamation\n\nMa facture de janvier est incorrecte.\n---\n")
    );
    assert!(prompt.ends_with("Contraintes supplémentaires: Proposer un rappel téléphonique.\n"));
}

#[tokio::test]
async fn unknown_tone_and_language_fall_back_to_defaults() {
    let gateway = StubGateway::replying(vec![Ok("ok".to_string())]);
    let app = build_test_router(&gateway);

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/v1/emails/reply",
            Some(json!({
                "email_text": "Hello",
                "tone": "sarcastique",
                "language": "de"
            })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let seen = gateway.seen_requests().await;
    assert!(
        seen[0].messages[1]
            .content
            .starts_with("Rédige une réponse en français, ton professionnel et poli.")
    );
}

#[tokio::test]
async fn offline_service_returns_generic_fallback() {
    let app = build_test_router(&StubGateway::offline());

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/v1/emails/reply",
            Some(json!({ "email_text": "Le tarif du gaz a augmenté.", "language": "en" })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["reply"], GENERIC_FALLBACK_ANSWER);
}

#[tokio::test]
async fn blank_email_text_is_rejected() {
    let app = build_test_router(&StubGateway::offline());

    let response = send_json(
        &app,
        request(
            Method::POST,
            "/v1/emails/reply",
            Some(json!({ "email_text": "\n  " })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.body), Some("invalid_request"));
}
