use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ask { question: String },
    Chat,
    Email(EmailOptions),
    Models,
}

impl Command {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ask { .. } => "ask",
            Self::Chat => "chat",
            Self::Email(_) => "email",
            Self::Models => "models",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailOptions {
    /// Read from stdin when unset.
    pub file: Option<PathBuf>,
    pub tone: String,
    pub language: String,
    pub subject: Option<String>,
    pub constraints: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub api_key: Option<String>,
    pub cite_sources: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub command: Command,
    pub generation: GenerationOptions,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing command")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("missing value for argument: {0}")]
    MissingValue(String),
    #[error("invalid value for {arg}: {value}")]
    InvalidValue { arg: String, value: String },
    #[error("{option} is not supported by the {command} command")]
    UnsupportedOption {
        option: String,
        command: &'static str,
    },
    #[error("ask requires a question")]
    MissingQuestion,
    #[error("help requested")]
    HelpRequested,
}

impl CliOptions {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut iter = args.into_iter();
        let command_name = match iter.next() {
            Some(arg) if matches!(arg.as_str(), "--help" | "-h" | "help") => {
                return Err(CliError::HelpRequested);
            }
            Some(arg) => arg,
            None => return Err(CliError::MissingCommand),
        };

        let mut generation = GenerationOptions::default();
        let mut email = EmailOptions::default();
        let mut email_flags = Vec::new();
        let mut words = Vec::new();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(CliError::HelpRequested),
                "--model" => generation.model = Some(next_value(&mut iter, &arg)?),
                "--temperature" => {
                    let value = next_value(&mut iter, &arg)?;
                    generation.temperature = Some(parse_temperature(&arg, &value)?);
                }
                "--max-tokens" => {
                    let value = next_value(&mut iter, &arg)?;
                    generation.max_tokens = Some(parse_max_tokens(&arg, &value)?);
                }
                "--api-key" => generation.api_key = Some(next_value(&mut iter, &arg)?),
                "--sources" => generation.cite_sources = true,
                "--file" => {
                    email.file = Some(PathBuf::from(next_value(&mut iter, &arg)?));
                    email_flags.push(arg);
                }
                "--tone" => {
                    email.tone = next_value(&mut iter, &arg)?;
                    email_flags.push(arg);
                }
                "--lang" => {
                    email.language = next_value(&mut iter, &arg)?;
                    email_flags.push(arg);
                }
                "--subject" => {
                    email.subject = Some(next_value(&mut iter, &arg)?);
                    email_flags.push(arg);
                }
                "--constraints" => {
                    email.constraints = Some(next_value(&mut iter, &arg)?);
                    email_flags.push(arg);
                }
                flag if flag.starts_with("--") => {
                    return Err(CliError::UnknownArgument(flag.to_string()));
                }
                _ => words.push(arg),
            }
        }

        let command = match command_name.as_str() {
            "ask" => {
                let question = words.join(" ");
                if question.trim().is_empty() {
                    return Err(CliError::MissingQuestion);
                }
                Command::Ask { question }
            }
            "chat" => Command::Chat,
            "email" => Command::Email(email),
            "models" => Command::Models,
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };

        if !matches!(command, Command::Ask { .. }) {
            if let Some(word) = words.into_iter().next() {
                return Err(CliError::UnknownArgument(word));
            }
        }

        if !matches!(command, Command::Email(_)) {
            if let Some(option) = email_flags.into_iter().next() {
                return Err(CliError::UnsupportedOption {
                    option,
                    command: command.name(),
                });
            }
        }

        if generation.cite_sources && !matches!(command, Command::Ask { .. } | Command::Chat) {
            return Err(CliError::UnsupportedOption {
                option: "--sources".to_string(),
                command: command.name(),
            });
        }

        Ok(Self {
            command,
            generation,
        })
    }
}

fn next_value<I>(iter: &mut I, arg: &str) -> Result<String, CliError>
where
    I: Iterator<Item = String>,
{
    iter.next()
        .ok_or_else(|| CliError::MissingValue(arg.to_string()))
}

fn parse_temperature(arg: &str, value: &str) -> Result<f32, CliError> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|temperature| (0.0..=1.0).contains(temperature))
        .ok_or_else(|| CliError::InvalidValue {
            arg: arg.to_string(),
            value: value.to_string(),
        })
}

fn parse_max_tokens(arg: &str, value: &str) -> Result<u32, CliError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|max_tokens| *max_tokens > 0)
        .ok_or_else(|| CliError::InvalidValue {
            arg: arg.to_string(),
            value: value.to_string(),
        })
}
