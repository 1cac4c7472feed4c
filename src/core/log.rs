//! Tracing subscriber setup shared by every subcommand.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Targets shown at the chosen verbosity. Everything else stays at `warn`.
const APP_TARGETS: [&str; 3] = ["fxconv", "tower_http", "teloxide"];

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    std::iter::once("warn".to_string())
        .chain(APP_TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global subscriber. A set `RUST_LOG` replaces the defaults entirely.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}
