//! Chat command parsing.

use thiserror::Error;

use crate::core::conversion::ConversionPair;

/// Supported chat commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChatCommand {
    Help,
    Convert { pair: ConversionPair, amount: f64 },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("message is not a command")]
    NotACommand,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("missing argument `{0}`")]
    MissingArgument(&'static str),
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
}

/// Commands registered with the platform's command menu.
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("usd2jpy", "USD を JPY に換算します"),
        ("jpy2usd", "JPY を USD に換算します"),
        ("help", "使い方を表示します"),
    ]
}

pub const fn command_help() -> &'static str {
    "使い方\n\
    /usd2jpy <金額> - USD を JPY に換算します\n\
    /jpy2usd <金額> - JPY を USD に換算します"
}

/// Parse a chat message into a command.
pub fn parse_command(text: &str) -> Result<ChatCommand, CommandParseError> {
    let mut parts = text.split_whitespace();
    let Some(raw_command) = parts.next() else {
        return Err(CommandParseError::NotACommand);
    };
    if !raw_command.starts_with('/') {
        return Err(CommandParseError::NotACommand);
    }

    // Group chats address commands as `/usd2jpy@SomeBot`.
    let command = raw_command
        .split_once('@')
        .map_or(raw_command, |(head, _)| head);

    let pair = match command {
        "/start" | "/help" => return Ok(ChatCommand::Help),
        "/usd2jpy" => ConversionPair::UsdToJpy,
        "/jpy2usd" => ConversionPair::JpyToUsd,
        other => return Err(CommandParseError::UnknownCommand(other.to_string())),
    };

    let raw_amount = parts
        .next()
        .ok_or(CommandParseError::MissingArgument("amount"))?;
    let amount = parse_amount(raw_amount)?;
    if let Some(extra) = parts.next() {
        return Err(CommandParseError::UnexpectedArgument(extra.to_string()));
    }

    Ok(ChatCommand::Convert { pair, amount })
}

/// Accepts grouped input such as `1,000.5`. Sign is left for the engine to judge.
fn parse_amount(raw: &str) -> Result<f64, CommandParseError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandParseError::InvalidAmount(raw.to_string()))
}
