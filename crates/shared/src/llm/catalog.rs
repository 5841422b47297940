use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub label: &'static str,
    pub summary: &'static str,
}

static AVAILABLE_MODELS: [ModelOption; 3] = [
    ModelOption {
        id: "llama-3.1-8b-instant",
        label: "Llama 3.1 8B Instant",
        summary: "Fastest and cheapest; good answers for most everyday questions and emails.",
    },
    ModelOption {
        id: "gemma2-9b-it",
        label: "Gemma 2 9B",
        summary: "Alternative model with a different writing style; useful to vary phrasing.",
    },
    ModelOption {
        id: "llama-3.3-70b-versatile",
        label: "Llama 3.3 70B Versatile",
        summary: "Most capable for complex or sensitive requests; slower and more expensive.",
    },
];

/// Models offered by the surfaces, default first. Other ids are still accepted.
pub fn available_models() -> &'static [ModelOption] {
    &AVAILABLE_MODELS
}

pub fn find_model(id: &str) -> Option<&'static ModelOption> {
    let id = id.trim();
    available_models().iter().find(|model| model.id == id)
}
