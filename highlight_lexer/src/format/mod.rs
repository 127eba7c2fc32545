//! Rendering token streams for the site

pub mod escape;
pub mod html;
pub mod json;
pub mod theme;

use crate::config::runtime::RenderPreferences;
use crate::log_performance;
use crate::logging::codes;
use crate::registry::LexerRegistry;
use crate::tokens::TokenStream;
use std::time::Instant;

pub use escape::escape_html;
pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use theme::{Style, Theme};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to serialize tokens: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write output")]
    Write(#[from] std::fmt::Error),
}

impl RenderError {
    pub fn error_code(&self) -> crate::logging::Code {
        codes::render::SERIALIZATION_FAILURE
    }
}

pub trait Formatter {
    fn name(&self) -> &'static str;

    fn format_to(&self, tokens: &TokenStream, out: &mut String) -> Result<(), RenderError>;

    fn format(&self, tokens: &TokenStream) -> Result<String, RenderError> {
        let mut out = String::new();
        self.format_to(tokens, &mut out)?;
        Ok(out)
    }
}

/// Site markup for a fenced code block:
/// `<div class="language-cpp highlighter-rouge">` around the highlighted HTML
pub fn render_code_block(
    registry: &LexerRegistry,
    tag: &str,
    source: &str,
    preferences: &RenderPreferences,
) -> Result<String, RenderError> {
    let started = Instant::now();
    let tokens = registry.highlight(tag, source);
    let formatter = HtmlFormatter::new(RenderPreferences {
        wrap_output: true,
        ..preferences.clone()
    });

    let mut out = String::new();
    out.push_str(&format!(
        "<div class=\"language-{} highlighter-rouge\">",
        escape_html(tag)
    ));
    formatter.format_to(&tokens, &mut out)?;
    out.push_str("</div>");

    log_performance!(codes::success::RENDER_COMPLETE, "Code block rendered",
        duration = started.elapsed(),
        "tag" => tag,
        "tokens" => tokens.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_code_block() {
        let registry = LexerRegistry::with_defaults().unwrap();
        let preferences = RenderPreferences {
            wrap_output: false,
            line_numbers: false,
            css_class: "highlight".to_string(),
        };
        let html = render_code_block(&registry, "cpp", "U32 x;", &preferences).unwrap();

        assert!(html.starts_with(
            "<div class=\"language-cpp highlighter-rouge\"><div class=\"highlight\"><pre class=\"highlight\"><code>"
        ));
        assert!(html.contains("<span class=\"kt\">U32</span>"));
        assert!(html.ends_with("</code></pre></div></div>"));
    }

    #[test]
    fn test_formatter_names() {
        assert_eq!(HtmlFormatter::default().name(), "html");
        assert_eq!(JsonFormatter::default().name(), "json");
    }
}
