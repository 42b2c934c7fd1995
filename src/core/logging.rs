//=========================================================================
// Logging
//=========================================================================
//
// Process-wide `env_logger` initialization.
//
// Subsystems log through the `log` facade under these targets:
//   platform, platform::input   winit loop, window, pointer events
//   lifecycle                   bridge state transitions
//   render                      surface negotiation and the frame loop
//   reporter                    dialogs and the fatal path
//   game                        sessions, levels, toasts
//
// Filter precedence: `LoggingConfig::env_filter`, then `RUST_LOG`, then
// `LoggingConfig::level` with winit held at `warn`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Once;

use log::LevelFilter;

//=== LoggingConfig =======================================================

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Full `env_logger` directive string, e.g. `"game=debug,render=trace"`.
    pub env_filter: Option<String>,
    pub level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    fn directives(&self, rust_log: Option<String>) -> String {
        if let Some(filter) = &self.env_filter {
            return filter.clone();
        }
        match rust_log {
            Some(filter) if !filter.trim().is_empty() => filter,
            _ => format!("{},winit=warn", self.level.as_str().to_ascii_lowercase()),
        }
    }
}

//=== Initialization ======================================================

static INIT: Once = Once::new();

/// Installs the `env_logger` backend on the first call; later calls are
/// no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let directives = config.directives(std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&directives);
        builder.write_style(config.write_style);

        // Tests and embedding hosts may have installed a logger already.
        if builder.try_init().is_err() {
            log::debug!(target: "platform", "Logger already installed, keeping it");
        }

        log::debug!(target: "platform", "Logging initialized with '{}'", directives);
    });
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_rust_log() {
        let config = LoggingConfig::default().with_filter("game=trace");
        assert_eq!(config.directives(Some("warn".to_string())), "game=trace");
    }

    #[test]
    fn rust_log_is_used_without_explicit_filter() {
        let config = LoggingConfig::default();
        assert_eq!(config.directives(Some("render=debug".to_string())), "render=debug");
    }

    #[test]
    fn level_fallback_quiets_winit() {
        let config = LoggingConfig::default().with_level(LevelFilter::Debug);
        assert_eq!(config.directives(None), "debug,winit=warn");
        assert_eq!(config.directives(Some("  ".to_string())), "debug,winit=warn");
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default().with_filter("debug"));
    }
}
