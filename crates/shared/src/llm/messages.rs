use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Assembles the completion payload: system turn, prior history in order,
/// then the current user turn. Entries with empty content are dropped.
pub fn build_messages(
    current_user_text: Option<&str>,
    system_prompt: Option<&str>,
    history: Option<&[ChatMessage]>,
) -> Vec<ChatMessage> {
    let mut messages = Vec::new();

    if let Some(system_prompt) = system_prompt.filter(|prompt| !prompt.is_empty()) {
        messages.push(ChatMessage::system(system_prompt));
    }

    if let Some(history) = history {
        messages.extend(
            history
                .iter()
                .filter(|message| !message.content.is_empty())
                .cloned(),
        );
    }

    if let Some(user_text) = current_user_text.filter(|text| !text.is_empty()) {
        messages.push(ChatMessage::user(user_text));
    }

    messages
}
