//! HTML output with short CSS classes (`<span class="kt">U32</span>`)

use super::escape::escape_html;
use super::{Formatter, RenderError};
use crate::config::runtime::RenderPreferences;
use crate::tokens::{TokenCategory, TokenStream};
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct HtmlFormatter {
    preferences: RenderPreferences,
}

impl HtmlFormatter {
    pub fn new(preferences: RenderPreferences) -> Self {
        Self { preferences }
    }

    /// Bare spans, no wrapper and no gutter
    pub fn inline() -> Self {
        Self::new(RenderPreferences {
            wrap_output: false,
            line_numbers: false,
            ..RenderPreferences::default()
        })
    }

    pub fn preferences(&self) -> &RenderPreferences {
        &self.preferences
    }

    fn write_token(out: &mut String, category: TokenCategory, text: &str) -> Result<(), RenderError> {
        let text = escape_html(text);
        if category.is_plain() {
            out.push_str(&text);
        } else {
            write!(out, "<span class=\"{}\">{}</span>", category.css_class(), text)?;
        }
        Ok(())
    }

    fn write_spans(&self, tokens: &TokenStream, out: &mut String) -> Result<(), RenderError> {
        for token in tokens {
            Self::write_token(out, token.category, &token.text)?;
        }
        Ok(())
    }

    /// Gutter and code cells; every line is closed so spans never cross rows
    fn write_table(&self, tokens: &TokenStream, out: &mut String) -> Result<(), RenderError> {
        let lines = tokens.lines();

        out.push_str("<table class=\"rouge-table\"><tbody><tr>");
        out.push_str("<td class=\"rouge-gutter gl\"><pre class=\"lineno\">");
        for number in 1..=lines.len() {
            writeln!(out, "{}", number)?;
        }
        out.push_str("</pre></td><td class=\"rouge-code\"><pre>");
        for line in &lines {
            for (category, text) in line {
                Self::write_token(out, *category, text)?;
            }
            out.push('\n');
        }
        out.push_str("</pre></td></tr></tbody></table>");
        Ok(())
    }
}

impl Default for HtmlFormatter {
    fn default() -> Self {
        Self::new(RenderPreferences::default())
    }
}

impl Formatter for HtmlFormatter {
    fn name(&self) -> &'static str {
        "html"
    }

    fn format_to(&self, tokens: &TokenStream, out: &mut String) -> Result<(), RenderError> {
        let class = escape_html(&self.preferences.css_class);

        if self.preferences.wrap_output {
            write!(
                out,
                "<div class=\"{class}\"><pre class=\"{class}\"><code>",
                class = class
            )?;
        }

        if self.preferences.line_numbers {
            self.write_table(tokens, out)?;
        } else {
            self.write_spans(tokens, out)?;
        }

        if self.preferences.wrap_output {
            out.push_str("</code></pre></div>");
        }
        Ok(())
    }
}
