// Internal modules
pub mod config;
pub mod extension;
pub mod file_processor;
pub mod format;
pub mod languages;
pub mod lexer;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod registry;
pub mod rules;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use extension::{Extension, ExtensionError};
pub use format::{render_code_block, Formatter, HtmlFormatter, JsonFormatter, RenderError, Theme};
pub use lexer::{Lexer, LexerInfo};
pub use registry::LexerRegistry;
pub use rules::{GrammarBuilder, GrammarError};
pub use tokens::{Token, TokenCategory, TokenStream};

use std::sync::OnceLock;

static DEFAULT_REGISTRY: OnceLock<LexerRegistry> = OnceLock::new();

/// Registry holding the built-in lexers, built on first use
pub fn default_registry() -> &'static LexerRegistry {
    DEFAULT_REGISTRY.get_or_init(|| {
        LexerRegistry::with_defaults().unwrap_or_else(|error| {
            logging::safe_log_error(error.error_code(), &error.to_string());
            LexerRegistry::new()
        })
    })
}

/// Tokenize `source` with the built-in lexer registered as `tag`
pub fn highlight(tag: &str, source: &str) -> TokenStream {
    default_registry().highlight(tag, source)
}

/// Check generated limits and code registrations before first use
pub fn validate_configuration() -> Result<(), String> {
    use config::compile_time::lexical::{MAX_STATE_DEPTH, MAX_TOKEN_COUNT};

    if MAX_STATE_DEPTH == 0 || MAX_TOKEN_COUNT == 0 {
        return Err("Lexical limits must be non-zero".to_string());
    }
    file_processor::init_file_processor_logging()?;

    let required = [
        logging::codes::lexical::TOKEN_LIMIT_REACHED,
        logging::codes::lexical::STATE_DEPTH_EXCEEDED,
        logging::codes::lexical::UNMATCHED_INPUT,
        logging::codes::registry::UNKNOWN_TAG,
        logging::codes::registry::TAG_REPLACED,
    ];
    for code in &required {
        if logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Code {} is not registered", code.as_str()));
        }
    }
    Ok(())
}
