//! Lexer lookup by tag, alias and filename

use crate::extension::ExtensionError;
use crate::languages::{c_family, custom_cpp, plaintext, PLAINTEXT_TAG};
use crate::lexer::Lexer;
use crate::logging::codes;
use crate::tokens::{Token, TokenCategory, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_success, log_warning};
use std::sync::Arc;

/// Registered lexers in registration order.
///
/// Registering a tag that is already present replaces the old lexer and
/// moves the tag to the end, so filename lookups prefer it.
#[derive(Debug, Clone, Default)]
pub struct LexerRegistry {
    lexers: Vec<Arc<Lexer>>,
}

impl LexerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text, C, C++ and the custom C++ lexer replacing `cpp`
    pub fn with_defaults() -> Result<Self, ExtensionError> {
        let mut registry = Self::new();
        registry.register(plaintext::lexer()?);
        registry.register(c_family::c_lexer()?);
        registry.register(c_family::cpp_lexer()?);
        registry.register(custom_cpp::lexer()?);
        Ok(registry)
    }

    /// Add a lexer, returning the one it replaced
    pub fn register(&mut self, lexer: Lexer) -> Option<Arc<Lexer>> {
        let replaced = self
            .lexers
            .iter()
            .position(|existing| existing.tag() == lexer.tag())
            .map(|index| self.lexers.remove(index));

        if let Some(previous) = &replaced {
            log_warning!(code = codes::registry::TAG_REPLACED,
                "Lexer tag re-registered, replacing previous lexer",
                "tag" => lexer.tag(),
                "previous" => previous.info().title
            );
        }

        log_success!(codes::success::LEXER_REGISTERED, "Lexer registered",
            "tag" => lexer.tag(),
            "title" => lexer.info().title
        );
        self.lexers.push(Arc::new(lexer));
        replaced
    }

    /// Exact tag or alias
    pub fn get(&self, name: &str) -> Option<Arc<Lexer>> {
        self.lexers
            .iter()
            .rev()
            .find(|lexer| lexer.info().answers_to(name))
            .cloned()
    }

    /// Tag or alias, falling back to plain text
    pub fn find(&self, name: &str) -> Option<Arc<Lexer>> {
        if let Some(lexer) = self.get(name) {
            return Some(lexer);
        }
        log_warning!(code = codes::registry::UNKNOWN_TAG,
            "Unknown lexer tag, falling back to plain text",
            "tag" => name
        );
        self.get(PLAINTEXT_TAG)
    }

    /// Most recently registered lexer whose filename patterns match
    pub fn for_filename(&self, file_name: &str) -> Option<Arc<Lexer>> {
        self.lexers
            .iter()
            .rev()
            .find(|lexer| lexer.info().matches_filename(file_name))
            .cloned()
    }

    /// Tokenize with the lexer for `tag`; never fails
    pub fn highlight(&self, tag: &str, source: &str) -> TokenStream {
        match self.find(tag) {
            Some(lexer) => lexer.tokenize(source),
            None => unclassified(source),
        }
    }

    pub fn tags(&self) -> Vec<&str> {
        self.lexers.iter().map(|lexer| lexer.tag()).collect()
    }

    pub fn lexers(&self) -> impl Iterator<Item = &Arc<Lexer>> {
        self.lexers.iter()
    }

    /// Extensions claimed through `*.ext` filename patterns
    pub fn known_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self
            .lexers
            .iter()
            .flat_map(|lexer| lexer.info().extensions().map(str::to_lowercase))
            .collect();
        extensions.sort();
        extensions.dedup();
        extensions
    }

    pub fn len(&self) -> usize {
        self.lexers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexers.is_empty()
    }
}

fn unclassified(source: &str) -> TokenStream {
    if source.is_empty() {
        return TokenStream::default();
    }
    let span = Span::covering(Position::start(), source);
    TokenStream::new(vec![Token::new(TokenCategory::Text, source, span)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexerInfo;
    use crate::rules::{GrammarBuilder, RuleDef, ROOT_STATE};

    fn registry() -> LexerRegistry {
        LexerRegistry::with_defaults().unwrap()
    }

    #[test]
    fn test_defaults() {
        let registry = registry();
        assert_eq!(registry.tags(), vec!["plaintext", "c", "cpp"]);
        assert!(registry.get("C++").is_some());
        assert!(registry.get("text").is_some());
    }

    #[test]
    fn test_custom_cpp_replaces_base() {
        let registry = registry();
        let cpp = registry.get("cpp").unwrap();
        assert_eq!(
            cpp.tokenize("U32 x;").category_of("U32"),
            Some(TokenCategory::KeywordType)
        );
    }

    #[test]
    fn test_unknown_tag_falls_back_to_plaintext() {
        let registry = registry();
        let stream = registry.highlight("cobol", "U32 x;");
        assert_eq!(stream.len(), 1);
        assert_eq!(stream.category_of("U32 x;"), Some(TokenCategory::Text));
    }

    #[test]
    fn test_empty_registry_is_still_lossless() {
        let stream = LexerRegistry::new().highlight("cpp", "U32 x;");
        assert_eq!(stream.source_text(), "U32 x;");
        assert!(LexerRegistry::new().highlight("cpp", "").is_empty());
    }

    #[test]
    fn test_filename_lookup_prefers_latest() {
        let registry = registry();
        assert_eq!(registry.for_filename("arena.h").unwrap().tag(), "cpp");
        assert_eq!(registry.for_filename("arena.c").unwrap().tag(), "c");
        assert_eq!(registry.for_filename("notes.txt").unwrap().tag(), "plaintext");
        assert!(registry.for_filename("build.rs").is_none());
    }

    #[test]
    fn test_register_returns_replaced() {
        let mut registry = registry();
        let definition = GrammarBuilder::new("cpp").state(
            ROOT_STATE,
            [RuleDef::token(r"(?s:.)+", TokenCategory::Comment).into()],
        );
        let replaced = registry.register(Lexer::new(LexerInfo::new("cpp", "Quiet"), definition).unwrap());

        assert_eq!(replaced.unwrap().tag(), "cpp");
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.highlight("cpp", "U32").category_of("U32"),
            Some(TokenCategory::Comment)
        );
    }

    #[test]
    fn test_known_extensions() {
        let extensions = registry().known_extensions();
        assert!(extensions.contains(&"cpp".to_string()));
        assert!(extensions.contains(&"h".to_string()));
        assert!(extensions.contains(&"txt".to_string()));
    }
}
