//! Platform-independent command dispatch.
//!
//! A conversion runs as two visible phases: [`CommandHandler::acknowledge`]
//! tells the platform the command was received, and [`CommandHandler::resolve`]
//! calls the API and delivers the final reply through the same interaction.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::client::ConvertApi;
use super::command::{ChatCommand, CommandParseError, command_help};
use super::format::{TRANSPORT_FAILURE_MESSAGE, format_failure, render_result};

#[derive(Debug, Error)]
#[error("chat platform error: {0}")]
pub struct ChatError(pub String);

/// One in-flight command invocation on a chat platform.
#[async_trait]
pub trait Interaction: Send {
    /// Signal receipt before the (possibly slow) work starts.
    async fn acknowledge(&mut self) -> Result<(), ChatError>;

    /// Deliver the final reply. Must work even if acknowledge failed.
    async fn resolve(&mut self, text: &str) -> Result<(), ChatError>;
}

#[derive(Clone)]
pub struct CommandHandler {
    api: Arc<dyn ConvertApi>,
}

impl CommandHandler {
    pub fn new(api: Arc<dyn ConvertApi>) -> Self {
        CommandHandler { api }
    }

    pub async fn acknowledge(&self, interaction: &mut dyn Interaction) {
        if let Err(e) = interaction.acknowledge().await {
            warn!(error = %e, "Failed to acknowledge command");
        }
    }

    /// Builds the reply for `command`. Transport failures are logged, not shown.
    pub async fn reply_for(&self, command: ChatCommand) -> String {
        match command {
            ChatCommand::Help => command_help().to_string(),
            ChatCommand::Convert { pair, amount } => match self.api.convert(pair, amount).await {
                Ok(result) => {
                    info!(?pair, amount, success = result.is_success(), "Conversion replied");
                    render_result(pair, amount, &result)
                }
                Err(e) => {
                    error!(error = %e, error_detail = ?e, "Error calling convert API");
                    TRANSPORT_FAILURE_MESSAGE.to_string()
                }
            },
        }
    }

    pub async fn resolve(&self, command: ChatCommand, interaction: &mut dyn Interaction) {
        let reply = self.reply_for(command).await;
        if let Err(e) = interaction.resolve(&reply).await {
            error!(error = %e, "Failed to deliver reply");
        }
    }

    /// Acknowledge, then resolve. Help is answered immediately.
    pub async fn handle(&self, command: ChatCommand, interaction: &mut dyn Interaction) {
        if matches!(command, ChatCommand::Convert { .. }) {
            self.acknowledge(interaction).await;
        }
        self.resolve(command, interaction).await;
    }

    /// Runs [`Self::handle`] on its own task so a slow conversion does not
    /// hold back later commands from the same chat. The task yields the
    /// interaction back once the reply has been delivered.
    pub fn spawn<I>(&self, command: ChatCommand, mut interaction: I) -> JoinHandle<I>
    where
        I: Interaction + 'static,
    {
        let handler = self.clone();
        tokio::spawn(async move {
            handler.handle(command, &mut interaction).await;
            interaction
        })
    }
}

/// Reply for a message that looked like a command but could not be used.
/// Returns `None` for messages the bot should stay silent on.
pub fn reply_for_parse_error(err: &CommandParseError) -> Option<String> {
    let reason = match err {
        CommandParseError::NotACommand | CommandParseError::UnknownCommand(_) => return None,
        CommandParseError::MissingArgument(_) => "金額を指定してください".to_string(),
        CommandParseError::InvalidAmount(raw) => format!("金額が不正です: {raw}"),
        CommandParseError::UnexpectedArgument(extra) => format!("余分な引数があります: {extra}"),
    };
    Some(format!("{}\n\n{}", format_failure(&reason), command_help()))
}
