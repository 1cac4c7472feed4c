//! Chat front end: command parsing, reply formatting and the API client.

pub mod client;
pub mod command;
pub mod format;
pub mod handler;
pub mod telegram;

pub use client::{ClientError, ConvertApi, ConvertClient};
pub use command::{ChatCommand, parse_command};
pub use handler::{CommandHandler, Interaction};
