//! Logging infrastructure for the Aurora FAQ assistant.
//!
//! All logs go to stderr so stdout stays clean for answers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// This sets up structured logging with:
/// - Output to stderr (stdout is reserved for answers)
/// - Environment-based filtering (RUST_LOG or provided level)
/// - Human-readable or JSON lines format
/// - Optional ANSI color control
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "debug", "aurora_knowledge=trace")
/// * `no_color` - Disable colored output
/// * `json` - Emit one JSON object per event instead of text
///
/// # Example
/// ```no_run
/// use aurora_core::logging::init_logging;
///
/// init_logging(None, false, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool, json: bool) -> AppResult<()> {
    let filter_str = resolve_filter(log_level);

    let env_filter = EnvFilter::try_new(&filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(!no_color && supports_color()),
            )
            .try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))
}

/// Pick the filter string: explicit level, then RUST_LOG, then "warn".
///
/// The default is quiet because the chat loop shares the terminal with logs.
fn resolve_filter(log_level: Option<&str>) -> String {
    match log_level {
        Some(level) => level.to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
    }
}

fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(resolve_filter(Some("debug")), "debug");
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let result = init_logging(Some("aurora=notalevel"), true, false);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
