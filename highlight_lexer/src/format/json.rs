//! JSON token dump for tooling

use super::{Formatter, RenderError};
use crate::tokens::TokenStream;
use serde::Serialize;

#[derive(Serialize)]
struct JsonToken<'a> {
    category: &'static str,
    class: &'static str,
    text: &'a str,
    line: u32,
    column: u32,
}

#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn format_to(&self, tokens: &TokenStream, out: &mut String) -> Result<(), RenderError> {
        let records: Vec<JsonToken<'_>> = tokens
            .iter()
            .map(|token| JsonToken {
                category: token.category.qualified_name(),
                class: token.category.css_class(),
                text: &token.text,
                line: token.span.start.line,
                column: token.span.start.column,
            })
            .collect();

        let json = if self.pretty {
            serde_json::to_string_pretty(&records)?
        } else {
            serde_json::to_string(&records)?
        };
        out.push_str(&json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::custom_cpp;

    #[test]
    fn test_json_records() {
        let tokens = custom_cpp::lexer().unwrap().tokenize("U32 x;");
        let json = JsonFormatter::default().format(&tokens).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["category"], "Keyword.Type");
        assert_eq!(value[0]["class"], "kt");
        assert_eq!(value[0]["text"], "U32");
        assert_eq!(value[0]["line"], 1);
        assert_eq!(value[0]["column"], 1);
        assert_eq!(value[2]["column"], 5);
    }
}
