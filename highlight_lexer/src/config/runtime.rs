// RUNTIME PREFERENCES (User Experience)

use super::compile_time::lexical::MAX_TOKEN_COUNT;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Whether to refuse files whose extension no registered lexer claims
    pub require_known_extension: bool,

    /// Whether to enable detailed performance logging
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_known_extension: env::var("HIGHLIGHT_REQUIRE_KNOWN_EXTENSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_performance_logging: env::var("HIGHLIGHT_ENABLE_PERFORMANCE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether consecutive tokens of the same category are joined
    pub merge_adjacent_tokens: bool,

    /// Whether to collect per-category token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to log every character that no rule claimed
    pub log_fallback_characters: bool,

    /// Tokens emitted before the rest of the input becomes one `Text` token;
    /// never above the compile-time limit
    #[serde(default = "default_max_token_count")]
    pub max_token_count: usize,
}

fn default_max_token_count() -> usize {
    MAX_TOKEN_COUNT
}

impl LexicalPreferences {
    /// Effective token limit
    pub fn token_limit(&self) -> usize {
        self.max_token_count.min(MAX_TOKEN_COUNT)
    }
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            merge_adjacent_tokens: env::var("HIGHLIGHT_LEXICAL_MERGE_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            collect_detailed_metrics: env::var("HIGHLIGHT_LEXICAL_DETAILED_METRICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_fallback_characters: env::var("HIGHLIGHT_LEXICAL_LOG_FALLBACK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            max_token_count: env::var("HIGHLIGHT_LEXICAL_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_TOKEN_COUNT),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPreferences {
    /// Wrap HTML output in `<div class="highlight"><pre><code>`
    pub wrap_output: bool,

    /// Emit a line-number gutter in HTML output
    pub line_numbers: bool,

    /// CSS class of the wrapping elements
    pub css_class: String,
}

impl Default for RenderPreferences {
    fn default() -> Self {
        Self {
            wrap_output: env::var("HIGHLIGHT_RENDER_WRAP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            line_numbers: env::var("HIGHLIGHT_RENDER_LINE_NUMBERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            css_class: env::var("HIGHLIGHT_RENDER_CSS_CLASS")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "highlight".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("HIGHLIGHT_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("HIGHLIGHT_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("HIGHLIGHT_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            include_file_context: env::var("HIGHLIGHT_LOGGING_INCLUDE_FILE_CONTEXT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and the CLI)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub render: RenderPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_KNOWN_EXTENSION: &str = "HIGHLIGHT_REQUIRE_KNOWN_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "HIGHLIGHT_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_MERGE_TOKENS: &str = "HIGHLIGHT_LEXICAL_MERGE_TOKENS";
    pub const LEXICAL_DETAILED_METRICS: &str = "HIGHLIGHT_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_LOG_FALLBACK: &str = "HIGHLIGHT_LEXICAL_LOG_FALLBACK";
    pub const LEXICAL_MAX_TOKENS: &str = "HIGHLIGHT_LEXICAL_MAX_TOKENS";

    // Render
    pub const RENDER_WRAP: &str = "HIGHLIGHT_RENDER_WRAP";
    pub const RENDER_LINE_NUMBERS: &str = "HIGHLIGHT_RENDER_LINE_NUMBERS";
    pub const RENDER_CSS_CLASS: &str = "HIGHLIGHT_RENDER_CSS_CLASS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "HIGHLIGHT_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "HIGHLIGHT_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "HIGHLIGHT_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "HIGHLIGHT_LOGGING_INCLUDE_FILE_CONTEXT";
}
