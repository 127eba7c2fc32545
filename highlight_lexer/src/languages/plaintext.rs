//! Fallback lexer: the whole input as one `Text` token

use crate::lexer::{Lexer, LexerInfo};
use crate::rules::{GrammarBuilder, GrammarError, RuleDef, ROOT_STATE};
use crate::tokens::TokenCategory;

pub const PLAINTEXT_TAG: &str = "plaintext";

pub fn lexer() -> Result<Lexer, GrammarError> {
    let info = LexerInfo::new(PLAINTEXT_TAG, "Plain Text")
        .with_description("A boring lexer that doesn't highlight anything")
        .with_aliases(&["text", "plain"])
        .with_filenames(&["*.txt"])
        .with_mimetypes(&["text/plain"]);
    let definition = GrammarBuilder::new(PLAINTEXT_TAG).state(
        ROOT_STATE,
        [RuleDef::token(r"(?s:.)+", TokenCategory::Text).into()],
    );
    Lexer::new(info, definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_text_token() {
        let stream = lexer().unwrap().tokenize("U32 x;\nint y;\n");
        assert_eq!(stream.len(), 1);
        assert_eq!(stream.category_of("U32 x;\nint y;\n"), Some(TokenCategory::Text));
    }
}
