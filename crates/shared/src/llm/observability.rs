use std::time::Duration;

use tracing::{info, warn};

use super::fallback::FallbackDomain;
use super::gateway::CompletionError;

pub const OUTCOME_COMPLETION: &str = "completion";
pub const OUTCOME_FALLBACK: &str = "fallback";

/// Why an answer came from the canned responder instead of the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No credential and no usable client: the provider was never contacted.
    ShortCircuit,
    Completion(&'static str),
}

impl FallbackReason {
    pub fn from_error(err: &CompletionError) -> Self {
        Self::Completion(err.error_type())
    }

    pub const fn error_type(self) -> &'static str {
        match self {
            Self::ShortCircuit => "no_credential_no_client",
            Self::Completion(error_type) => error_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnswerTelemetry {
    pub fallback_domain: FallbackDomain,
    pub outcome: &'static str,
    pub model: Option<String>,
    pub latency_ms: u64,
    pub fallback_reason: Option<FallbackReason>,
}

impl AnswerTelemetry {
    pub fn completion(fallback_domain: FallbackDomain, model: String, latency: Duration) -> Self {
        Self {
            fallback_domain,
            outcome: OUTCOME_COMPLETION,
            model: Some(model),
            latency_ms: duration_to_millis(latency),
            fallback_reason: None,
        }
    }

    pub fn fallback(
        fallback_domain: FallbackDomain,
        model: Option<String>,
        latency: Duration,
        reason: FallbackReason,
    ) -> Self {
        Self {
            fallback_domain,
            outcome: OUTCOME_FALLBACK,
            model,
            latency_ms: duration_to_millis(latency),
            fallback_reason: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }

    pub fn emit(&self) {
        let model = self.model.as_deref().unwrap_or("-");
        match self.fallback_reason {
            None => info!(
                outcome = self.outcome,
                domain = self.fallback_domain.as_str(),
                model,
                latency_ms = self.latency_ms,
                "assistant answer generated"
            ),
            Some(reason) => warn!(
                outcome = self.outcome,
                domain = self.fallback_domain.as_str(),
                model,
                latency_ms = self.latency_ms,
                error_type = reason.error_type(),
                "assistant answer served from fallback"
            ),
        }
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    duration.as_millis().min(u128::from(u64::MAX)) as u64
}
