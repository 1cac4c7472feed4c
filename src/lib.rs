pub mod api;
pub mod bot;
pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::ConversionEngine;
use crate::core::config::AppConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Serve {
        host: Option<String>,
        port: Option<u16>,
    },
    Bot,
    Convert {
        from: String,
        to: String,
        amount: f64,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Builds the engine backed by the configured Yahoo Finance endpoint.
pub fn build_engine(config: &AppConfig) -> Result<ConversionEngine> {
    let source = providers::YahooRateSource::new(config.yahoo_base_url())?;
    Ok(ConversionEngine::new(Arc::new(source)))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;

    match command {
        AppCommand::Serve { host, port } => {
            let engine = build_engine(&config)?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            api::server::run_server(api::AppState::new(engine), &host, port).await
        }
        AppCommand::Bot => run_bot(&config).await,
        AppCommand::Convert { from, to, amount } => {
            let engine = build_engine(&config)?;
            cli::convert::run_convert(&engine, &from, &to, amount).await
        }
    }
}

async fn run_bot(config: &AppConfig) -> Result<()> {
    // Both are required before anything connects.
    let token = AppConfig::bot_token()?;
    let api_url = config.api_url()?;

    // The one outbound client for the bot process; dropped when polling stops.
    let client = Arc::new(bot::ConvertClient::new(&api_url, config.bot.timeout())?);
    info!(api_url = %client.base_url(), "Starting chat bot");

    let handler = bot::CommandHandler::new(client);
    bot::telegram::run_bot(&token, handler).await;
    Ok(())
}
