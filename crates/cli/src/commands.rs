use std::io::Write;
use std::path::Path;

use shared::llm::{
    ChatMessage, EmailReplyRequest, EnergyQuestion, ResponseOrchestrator, answer_energy_question,
    available_models, compose_incoming_email, find_model, generate_email_reply,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, warn};

use crate::cli::{CliOptions, Command, EmailOptions, GenerationOptions};

const CLEAR_COMMAND: &str = "/clear";
const QUIT_COMMAND: &str = "/quit";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to read {source_name}: {source}")]
    Input {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("the email to answer is empty")]
    EmptyEmail,
}

pub async fn run(
    orchestrator: &ResponseOrchestrator,
    options: &CliOptions,
) -> Result<(), CommandError> {
    if let Some(model) = options.generation.model.as_deref() {
        if find_model(model).is_none() {
            warn!(model, "model is not in the catalog; sending it to the provider as is");
        }
    }

    match &options.command {
        Command::Ask { question } => ask(orchestrator, &options.generation, question).await,
        Command::Chat => chat(orchestrator, &options.generation).await,
        Command::Email(email) => email_reply(orchestrator, &options.generation, email).await,
        Command::Models => list_models(orchestrator),
    }
}

async fn ask(
    orchestrator: &ResponseOrchestrator,
    generation: &GenerationOptions,
    question: &str,
) -> Result<(), CommandError> {
    let answer = answer(orchestrator, generation, question, &[]).await;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{answer}")?;
    Ok(())
}

/// Line-oriented conversation. The history lives here, not in the core.
async fn chat(
    orchestrator: &ResponseOrchestrator,
    generation: &GenerationOptions,
) -> Result<(), CommandError> {
    let mut history: Vec<ChatMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_prompt(&format!(
        "Assistant électricité & gaz. \
         {CLEAR_COMMAND} efface l'historique, {QUIT_COMMAND} pour quitter.\n"
    ))?;

    loop {
        print_prompt("> ")?;
        let Some(line) = lines.next_line().await.map_err(|source| CommandError::Input {
            source_name: "stdin".to_string(),
            source,
        })?
        else {
            break;
        };

        let question = line.trim();
        match question {
            "" => continue,
            QUIT_COMMAND => break,
            CLEAR_COMMAND => {
                history.clear();
                print_prompt("Historique effacé.\n")?;
                continue;
            }
            _ => {}
        }

        let reply = answer(orchestrator, generation, question, &history).await;
        print_prompt(&format!("{reply}\n\n"))?;

        history.push(ChatMessage::user(question));
        history.push(ChatMessage::assistant(reply));
        debug!(turns = history.len(), "chat history updated");
    }

    Ok(())
}

async fn answer(
    orchestrator: &ResponseOrchestrator,
    generation: &GenerationOptions,
    question: &str,
    history: &[ChatMessage],
) -> String {
    answer_energy_question(
        orchestrator,
        &EnergyQuestion {
            question,
            history,
            api_key: generation.api_key.as_deref(),
            model: generation.model.as_deref(),
            temperature: generation.temperature,
            max_tokens: generation.max_tokens,
            cite_sources: generation.cite_sources,
        },
    )
    .await
}

async fn email_reply(
    orchestrator: &ResponseOrchestrator,
    generation: &GenerationOptions,
    email: &EmailOptions,
) -> Result<(), CommandError> {
    let body = match &email.file {
        Some(path) => read_file(path).await?,
        None => read_stdin().await?,
    };
    if body.trim().is_empty() {
        return Err(CommandError::EmptyEmail);
    }

    let incoming_email_text = compose_incoming_email(email.subject.as_deref(), &body);
    let reply = generate_email_reply(
        orchestrator,
        &EmailReplyRequest {
            incoming_email_text: &incoming_email_text,
            tone: &email.tone,
            language: &email.language,
            extra_instructions: email.constraints.as_deref(),
            api_key: generation.api_key.as_deref(),
            model: generation.model.as_deref(),
            temperature: generation.temperature,
            max_tokens: generation.max_tokens,
        },
    )
    .await;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{reply}")?;
    Ok(())
}

fn list_models(orchestrator: &ResponseOrchestrator) -> Result<(), CommandError> {
    let default_model = &orchestrator.defaults().model;
    let mut stdout = std::io::stdout().lock();
    for model in available_models() {
        let marker = if model.id == default_model.as_str() { "*" } else { " " };
        writeln!(stdout, "{marker} {:<26} {}", model.id, model.label)?;
        writeln!(stdout, "  {:<26} {}", "", model.summary)?;
    }
    Ok(())
}

async fn read_file(path: &Path) -> Result<String, CommandError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Input {
            source_name: path.display().to_string(),
            source,
        })
}

async fn read_stdin() -> Result<String, CommandError> {
    let mut body = String::new();
    tokio::io::stdin()
        .read_to_string(&mut body)
        .await
        .map_err(|source| CommandError::Input {
            source_name: "stdin".to_string(),
            source,
        })?;
    Ok(body)
}

fn print_prompt(text: &str) -> Result<(), CommandError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
