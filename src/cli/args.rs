//! Command-line argument parsing.
//!
//! Determines which command to run and collects the overrides applied on
//! top of the environment configuration.

use std::time::Duration;

use thiserror::Error;

use crate::config::ChatConfig;

pub const USAGE: &str = "\
Usage: streamchat [OPTIONS]

Reads questions from stdin, one per line, and prints the streamed answers.

Options:
  --url <BASE>            API root (default: $STREAMCHAT_API_URL or http://localhost:8080/api)
  --read-timeout <SECS>   Fail an answer when no data arrives for SECS seconds
  --no-greeting           Do not print the greeting message
  -V, --version           Print version and exit
  -h, --help              Print this help and exit";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the interactive chat loop (default)
    Chat(ChatOptions),
}

/// Overrides given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub base_url: Option<String>,
    pub read_timeout: Option<Duration>,
    pub no_greeting: bool,
}

impl ChatOptions {
    /// Layer these overrides on top of `config`.
    pub fn apply(&self, mut config: ChatConfig) -> ChatConfig {
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(timeout) = self.read_timeout {
            config = config.with_read_timeout(timeout);
        }
        if self.no_greeting {
            config = config.with_greeting(None);
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("invalid value for --read-timeout: {0:?} (expected whole seconds > 0)")]
    InvalidTimeout(String),
    #[error("unknown argument: {0}")]
    Unknown(String),
}

/// Parse command-line arguments and return the command to run.
///
/// `--version` and `--help` win as soon as they are seen.
///
/// # Examples
///
/// ```
/// use streamchat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["streamchat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = ChatOptions::default();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--no-greeting" => options.no_greeting = true,
            "--url" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--url"))?;
                options.base_url = Some(value);
            }
            "--read-timeout" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--read-timeout"))?;
                options.read_timeout = Some(parse_secs(&value)?);
            }
            _ => return Err(ArgsError::Unknown(arg)),
        }
    }

    Ok(CliCommand::Chat(options))
}

fn parse_secs(value: &str) -> Result<Duration, ArgsError> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ArgsError::InvalidTimeout(value.to_string())),
    }
}
