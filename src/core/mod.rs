//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod log;
pub mod rate;

// Re-export main types for cleaner imports
pub use conversion::{Conversion, ConversionEngine, ConversionError, ConversionResult};
pub use rate::{Quote, RateError, RateSource};
