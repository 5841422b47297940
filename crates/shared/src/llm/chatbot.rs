use super::fallback::FallbackDomain;
use super::messages::ChatMessage;
use super::orchestrator::{AnswerRequest, ResponseOrchestrator};
use super::prompts::energy_system_prompt;

/// Temperature ceiling while official sources are requested.
pub const SOURCES_MAX_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyQuestion<'a> {
    pub question: &'a str,
    /// Prior turns only; the caller appends `question` and the answer afterwards.
    pub history: &'a [ChatMessage],
    pub api_key: Option<&'a str>,
    pub model: Option<&'a str>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub cite_sources: bool,
}

pub fn effective_temperature(temperature: f32, cite_sources: bool) -> f32 {
    if cite_sources {
        temperature.min(SOURCES_MAX_TEMPERATURE)
    } else {
        temperature
    }
}

pub async fn answer_energy_question(
    orchestrator: &ResponseOrchestrator,
    question: &EnergyQuestion<'_>,
) -> String {
    let defaults = orchestrator.defaults().chatbot;
    let system_prompt = energy_system_prompt(question.cite_sources);
    let temperature = effective_temperature(
        question.temperature.unwrap_or(defaults.temperature),
        question.cite_sources,
    );

    orchestrator
        .generate_answer(&AnswerRequest {
            user_text: Some(question.question),
            system_prompt: Some(&system_prompt),
            history: Some(question.history),
            api_key: question.api_key,
            model: question.model,
            temperature: Some(temperature),
            max_tokens: question.max_tokens,
            fallback_domain: FallbackDomain::Energy,
        })
        .await
}
