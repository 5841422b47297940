use tracing::debug;

use super::fallback::FallbackDomain;
use super::orchestrator::{AnswerRequest, ResponseOrchestrator};
use super::prompts::{EMAIL_SYSTEM_PROMPT_EN, EMAIL_SYSTEM_PROMPT_FR};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Professionnel,
    Empathique,
    Ferme,
    Convivial,
}

impl Tone {
    /// Case-insensitive; anything unrecognised is `Professionnel`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "empathique" => Self::Empathique,
            "ferme" => Self::Ferme,
            "convivial" => Self::Convivial,
            _ => Self::Professionnel,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Professionnel => "professionnel",
            Self::Empathique => "empathique",
            Self::Ferme => "ferme",
            Self::Convivial => "convivial",
        }
    }

    pub const fn descriptor(self) -> &'static str {
        match self {
            Self::Professionnel => "professionnel et poli",
            Self::Empathique => "empathique et rassurant",
            Self::Ferme => "ferme mais courtois",
            Self::Convivial => "amical et accessible",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyLanguage {
    #[default]
    Fr,
    En,
}

impl ReplyLanguage {
    /// Case-insensitive; anything but `en` is French.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "en" => Self::En,
            _ => Self::Fr,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
        }
    }

    pub const fn descriptor(self) -> &'static str {
        match self {
            Self::Fr => "en français",
            Self::En => "in English",
        }
    }

    pub const fn system_prompt(self) -> &'static str {
        match self {
            Self::Fr => EMAIL_SYSTEM_PROMPT_FR,
            Self::En => EMAIL_SYSTEM_PROMPT_EN,
        }
    }

    const fn constraints_prefix(self) -> &'static str {
        match self {
            Self::Fr => "Contraintes supplémentaires: ",
            Self::En => "Additional constraints: ",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailReplyRequest<'a> {
    pub incoming_email_text: &'a str,
    pub tone: &'a str,
    pub language: &'a str,
    pub extra_instructions: Option<&'a str>,
    pub api_key: Option<&'a str>,
    pub model: Option<&'a str>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Prepends the optional subject line the way the reply form presents it.
pub fn compose_incoming_email(subject: Option<&str>, body: &str) -> String {
    match subject.map(str::trim).filter(|subject| !subject.is_empty()) {
        Some(subject) => format!("Objet: {subject}\n\n{body}"),
        None => body.to_string(),
    }
}

pub fn email_user_prompt(
    incoming_email_text: &str,
    tone: Tone,
    language: ReplyLanguage,
    extra_instructions: Option<&str>,
) -> String {
    let mut prompt = match language {
        ReplyLanguage::En => format!(
            "Write the reply {}, tone {}.\nIncoming email:\n---\n{incoming_email_text}\n---\n",
            language.descriptor(),
            tone.descriptor()
        ),
        ReplyLanguage::Fr => format!(
            "Rédige une réponse {}, ton {}.\nE-mail reçu:\n---\n{incoming_email_text}\n---\n",
            language.descriptor(),
            tone.descriptor()
        ),
    };

    if let Some(extra) = extra_instructions
        .map(str::trim)
        .filter(|extra| !extra.is_empty())
    {
        prompt.push_str(language.constraints_prefix());
        prompt.push_str(extra);
        prompt.push('\n');
    }

    prompt
}

/// Single-turn reply draft; never carries conversation history.
pub async fn generate_email_reply(
    orchestrator: &ResponseOrchestrator,
    request: &EmailReplyRequest<'_>,
) -> String {
    let tone = Tone::from_label(request.tone);
    let language = ReplyLanguage::from_label(request.language);
    let user_prompt = email_user_prompt(
        request.incoming_email_text,
        tone,
        language,
        request.extra_instructions,
    );
    let defaults = orchestrator.defaults().email;
    debug!(
        tone = tone.label(),
        language = language.label(),
        "drafting email reply"
    );

    orchestrator
        .generate_answer(&AnswerRequest {
            user_text: Some(&user_prompt),
            system_prompt: Some(language.system_prompt()),
            history: None,
            api_key: request.api_key,
            model: request.model,
            temperature: Some(request.temperature.unwrap_or(defaults.temperature)),
            max_tokens: Some(
                request
                    .max_tokens
                    .filter(|max_tokens| *max_tokens > 0)
                    .unwrap_or(defaults.max_tokens),
            ),
            fallback_domain: FallbackDomain::Email,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::{ReplyLanguage, Tone, compose_incoming_email, email_user_prompt};

    #[test]
    fn tone_lookup_is_case_insensitive_with_professional_default() {
        assert_eq!(Tone::from_label("EMPATHIQUE"), Tone::Empathique);
        assert_eq!(Tone::from_label(" ferme "), Tone::Ferme);
        assert_eq!(Tone::from_label("INVALID"), Tone::Professionnel);
        assert_eq!(Tone::from_label(""), Tone::Professionnel);
        assert_eq!(Tone::Convivial.descriptor(), "amical et accessible");
    }

    #[test]
    fn language_lookup_defaults_to_french() {
        assert_eq!(ReplyLanguage::from_label("EN"), ReplyLanguage::En);
        assert_eq!(ReplyLanguage::from_label("de"), ReplyLanguage::Fr);
        assert_eq!(ReplyLanguage::from_label("fr"), ReplyLanguage::Fr);
    }

    #[test]
    fn french_prompt_embeds_email_between_delimiters() {
        let prompt = email_user_prompt(
            "Ma facture est fausse.",
            Tone::Empathique,
            ReplyLanguage::Fr,
            None,
        );

        assert_eq!(
            prompt,
            "Rédige une réponse en français, ton empathique et rassurant.\n\
             E-mail reçu:\n---\nMa facture est fausse.\n---\n"
        );
    }

    #[test]
    fn english_prompt_appends_trimmed_constraints() {
        let prompt = email_user_prompt(
            "Where is my refund?",
            Tone::Ferme,
            ReplyLanguage::En,
            Some("  Ask for the contract number.  "),
        );

        assert_eq!(
            prompt,
            "Write the reply in English, tone ferme mais courtois.\n\
             Incoming email:\n---\nWhere is my refund?\n---\n\
             Additional constraints: Ask for the contract number.\n"
        );
    }

    #[test]
    fn blank_constraints_are_ignored() {
        let with_blank =
            email_user_prompt("Bonjour", Tone::default(), ReplyLanguage::Fr, Some("   "));
        let without = email_user_prompt("Bonjour", Tone::default(), ReplyLanguage::Fr, None);
        assert_eq!(with_blank, without);
        assert!(!with_blank.contains("Contraintes"));
    }

    #[test]
    fn subject_is_prefixed_only_when_present() {
        assert_eq!(
            compose_incoming_email(Some(" Relance "), "Bonjour"),
            "Objet: Relance\n\nBonjour"
        );
        assert_eq!(compose_incoming_email(Some("  "), "Bonjour"), "Bonjour");
        assert_eq!(compose_incoming_email(None, "Bonjour"), "Bonjour");
    }
}
