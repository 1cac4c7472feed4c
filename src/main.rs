use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::core::log::init_logging;
use std::path::Path;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Serve { host, port } => fxconv::AppCommand::Serve { host, port },
            Commands::Bot => fxconv::AppCommand::Bot,
            Commands::Convert { from, to, amount } => {
                fxconv::AppCommand::Convert { from, to, amount }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the example configuration (to --config-path if given)
    Setup,
    /// Run the HTTP conversion API
    Serve {
        /// Host address to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run the Telegram bot (needs TELEGRAM_BOT_TOKEN and an API URL)
    Bot,
    /// Convert an amount once and print the result
    Convert {
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. JPY
        to: String,
        /// Amount to convert
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => {
            fxconv::cli::setup::setup(cli.config_path.as_deref().map(Path::new)).map(|path| {
                println!("Wrote example configuration to {}", path.display());
            })
        }
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
