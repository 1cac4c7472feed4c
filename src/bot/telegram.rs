//! Telegram binding for the chat front end.
//!
//! Acknowledging posts a short placeholder message; resolving edits that
//! placeholder into the final reply, or sends a fresh message when there is
//! no placeholder or the edit is rejected.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, MessageId};
use tracing::{debug, info, warn};

use super::command::{bot_commands, parse_command};
use super::handler::{ChatError, CommandHandler, Interaction, reply_for_parse_error};

const ACKNOWLEDGE_TEXT: &str = "換算中です…";

pub struct TelegramInteraction {
    bot: Bot,
    chat_id: ChatId,
    placeholder: Option<MessageId>,
}

impl TelegramInteraction {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        TelegramInteraction {
            bot,
            chat_id,
            placeholder: None,
        }
    }

    async fn send_new(&self, text: &str) -> Result<(), ChatError> {
        self.bot
            .send_message(self.chat_id, text)
            .await
            .map(|_| ())
            .map_err(|e| ChatError(e.to_string()))
    }
}

#[async_trait]
impl Interaction for TelegramInteraction {
    async fn acknowledge(&mut self) -> Result<(), ChatError> {
        let sent = self
            .bot
            .send_message(self.chat_id, ACKNOWLEDGE_TEXT)
            .await
            .map_err(|e| ChatError(e.to_string()))?;
        self.placeholder = Some(sent.id);
        Ok(())
    }

    async fn resolve(&mut self, text: &str) -> Result<(), ChatError> {
        if let Some(message_id) = self.placeholder.take() {
            match self
                .bot
                .edit_message_text(self.chat_id, message_id, text)
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) => warn!(error = %e, "Failed to edit placeholder, sending new message"),
            }
        }
        self.send_new(text).await
    }
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}

/// Runs the long-polling loop until the process is interrupted.
pub async fn run_bot(token: &str, handler: CommandHandler) {
    let bot = Bot::new(token);

    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    info!("Telegram command listener started");

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let handler = handler.clone();
        async move {
            let Some(text) = msg.text() else {
                return respond(());
            };

            match parse_command(text) {
                Ok(command) => {
                    // Detached: the dispatcher serializes updates per chat.
                    handler.spawn(command, TelegramInteraction::new(bot, msg.chat.id));
                }
                Err(e) => {
                    debug!(error = %e, "Ignoring or rejecting message");
                    if let Some(reply) = reply_for_parse_error(&e) {
                        if let Err(e) = bot.send_message(msg.chat.id, reply).await {
                            warn!(error = %e, "Failed to send usage reply");
                        }
                    }
                }
            }

            respond(())
        }
    })
    .await;

    info!("Telegram command listener stopped");
}
