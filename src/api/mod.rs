//! HTTP front end exposing the conversion engine.

pub mod dto;
pub mod routes;
pub mod server;

use crate::core::ConversionEngine;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: ConversionEngine,
}

impl AppState {
    pub fn new(engine: ConversionEngine) -> Self {
        AppState { engine }
    }
}
