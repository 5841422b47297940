mod cli;
mod commands;

use cli::{CliError, CliOptions};
use shared::config::{AssistantConfig, load_dotenv};
use shared::llm::ResponseOrchestrator;
use tracing::error;

#[tokio::main]
async fn main() {
    let options = match CliOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(CliError::HelpRequested) => {
            print_usage();
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = load_dotenv() {
        eprintln!("{err}");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "powergas=info,shared=warn".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match AssistantConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let orchestrator = ResponseOrchestrator::from_config(&config);
    if let Err(err) = commands::run(&orchestrator, &options).await {
        error!(command = options.command.name(), "{err}");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "Usage: powergas <command> [options]\n\
         \n\
         Commands:\n\
         - ask <question...>  Answer one electricity/gas question\n\
         - chat               Interactive conversation (/clear resets history, /quit exits)\n\
         - email              Draft a reply to an email read from --file or stdin\n\
         - models             List the available models (* marks the default)\n\
         \n\
         Options:\n\
         - --model <id>          Model id (default from ASSISTANT_DEFAULT_MODEL)\n\
         - --temperature <0-1>   Sampling temperature\n\
         - --max-tokens <n>      Response length limit\n\
         - --api-key <key>       Key used instead of GROQ_API_KEY or the secrets file\n\
         - --sources             Ask for official sources (ask, chat)\n\
         - --file <path>         Email to answer (email)\n\
         - --tone <tone>         professionnel|empathique|ferme|convivial (email)\n\
         - --lang <fr|en>        Reply language (email)\n\
         - --subject <text>      Subject of the received email (email)\n\
         - --constraints <text>  Extra instructions for the reply (email)\n\
         - --help                Show this help text"
    );
}
