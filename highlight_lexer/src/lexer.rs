//! Named lexers: a grammar plus the metadata a registry looks it up by

use crate::config::runtime::LexicalPreferences;
use crate::lexical::{LexicalAnalyzer, LexicalMetrics};
use crate::log_warning;
use crate::logging::codes;
use crate::rules::{Grammar, GrammarBuilder, GrammarError};
use crate::tokens::TokenStream;
use glob::{MatchOptions, Pattern};
use serde::Serialize;
use std::sync::Arc;

const FILENAME_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Registry metadata for a lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexerInfo {
    pub tag: String,
    pub title: String,
    pub description: String,
    pub aliases: Vec<String>,
    /// Filename patterns (`*.cpp`, `*.h`)
    pub filenames: Vec<String>,
    pub mimetypes: Vec<String>,
    #[serde(skip)]
    patterns: Vec<Pattern>,
}

impl LexerInfo {
    pub fn new(tag: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            title: title.into(),
            description: String::new(),
            aliases: Vec::new(),
            filenames: Vec::new(),
            mimetypes: Vec::new(),
            patterns: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Filename globs; a pattern that does not compile is logged and skipped
    pub fn with_filenames(mut self, filenames: &[&str]) -> Self {
        self.filenames.clear();
        self.patterns.clear();
        for filename in filenames {
            match Pattern::new(filename) {
                Ok(pattern) => {
                    self.filenames.push(filename.to_string());
                    self.patterns.push(pattern);
                }
                Err(error) => log_warning!(code = codes::registry::INVALID_FILENAME_PATTERN,
                    "Ignoring invalid filename pattern",
                    "tag" => &self.tag,
                    "pattern" => filename,
                    "error" => error
                ),
            }
        }
        self
    }

    pub fn with_mimetypes(mut self, mimetypes: &[&str]) -> Self {
        self.mimetypes = mimetypes.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Tag or alias, ignoring ASCII case
    pub fn answers_to(&self, name: &str) -> bool {
        self.tag.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }

    /// Shell-style match against the filename globs, ignoring case
    pub fn matches_filename(&self, file_name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(file_name, FILENAME_MATCH))
    }

    /// Extensions named by `*.ext` patterns
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.filenames
            .iter()
            .filter_map(|pattern| pattern.strip_prefix("*."))
            .filter(|ext| !ext.contains(['*', '?']))
    }
}

/// A compiled lexer.
///
/// The definition is kept next to the compiled grammar so an extension can
/// derive a new lexer from it without touching this one.
#[derive(Debug, Clone)]
pub struct Lexer {
    info: LexerInfo,
    definition: GrammarBuilder,
    grammar: Arc<Grammar>,
}

impl Lexer {
    pub fn new(info: LexerInfo, definition: GrammarBuilder) -> Result<Self, GrammarError> {
        let grammar = Arc::new(definition.build()?);
        Ok(Self {
            info,
            definition,
            grammar,
        })
    }

    pub fn info(&self) -> &LexerInfo {
        &self.info
    }

    pub fn tag(&self) -> &str {
        &self.info.tag
    }

    pub fn definition(&self) -> &GrammarBuilder {
        &self.definition
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// Build a new lexer from a modified copy of this one's definition
    pub fn derive<F>(&self, info: LexerInfo, modify: F) -> Result<Lexer, GrammarError>
    where
        F: FnOnce(&mut GrammarBuilder) -> Result<(), GrammarError>,
    {
        let mut definition = self.definition.clone();
        definition.rename(info.tag.clone());
        modify(&mut definition)?;
        Lexer::new(info, definition)
    }

    pub fn tokenize(&self, source: &str) -> TokenStream {
        LexicalAnalyzer::new(&self.grammar).tokenize(source)
    }

    pub fn tokenize_with_preferences(
        &self,
        source: &str,
        preferences: LexicalPreferences,
    ) -> (TokenStream, LexicalMetrics) {
        crate::lexical::tokenize_with_metrics(&self.grammar, source, preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleDef, ROOT_STATE};
    use crate::tokens::TokenCategory;

    fn words_lexer() -> Lexer {
        let definition = GrammarBuilder::new("words").state(
            ROOT_STATE,
            [
                RuleDef::token(r"\w+", TokenCategory::Name).into(),
                RuleDef::token(r"\s+", TokenCategory::Whitespace).into(),
            ],
        );
        Lexer::new(
            LexerInfo::new("words", "Words")
                .with_aliases(&["w"])
                .with_filenames(&["*.words", "WORDS"]),
            definition,
        )
        .unwrap()
    }

    #[test]
    fn test_filename_globs() {
        let info = LexerInfo::new("globs", "Globs")
            .with_filenames(&["*.CPP", "*.h", "*.?xx", "CMake*.txt", "*.c"]);
        assert!(info.matches_filename("arena.cpp"));
        assert!(info.matches_filename("ARENA.CPP"));
        assert!(info.matches_filename("handle.h"));
        assert!(!info.matches_filename("handle.hpp"));
        assert!(info.matches_filename("handle.hxx"));
        assert!(info.matches_filename("CMakeLists.txt"));
        assert!(!info.matches_filename("arena.cc"));
        assert!(!info.matches_filename("notes.txt"));
    }

    #[test]
    fn test_invalid_filename_pattern_skipped() {
        let info = LexerInfo::new("globs", "Globs").with_filenames(&["[", "*.cc"]);
        assert_eq!(info.filenames, vec!["*.cc"]);
        assert!(info.matches_filename("arena.cc"));
        assert!(!info.matches_filename("["));
    }

    #[test]
    fn test_info_lookup() {
        let lexer = words_lexer();
        assert!(lexer.info().answers_to("WORDS"));
        assert!(lexer.info().answers_to("w"));
        assert!(lexer.info().matches_filename("list.words"));
        assert!(lexer.info().matches_filename("words"));
        assert_eq!(lexer.info().extensions().collect::<Vec<_>>(), vec!["words"]);
    }

    #[test]
    fn test_derive_leaves_original_untouched() {
        let lexer = words_lexer();
        let derived = lexer
            .derive(LexerInfo::new("shout", "Shout"), |definition| {
                definition.prepend(
                    ROOT_STATE,
                    [RuleDef::token(r"\bHEY\b", TokenCategory::Keyword).into()],
                )
            })
            .unwrap();

        assert_eq!(derived.grammar().name(), "shout");
        assert_eq!(
            derived.tokenize("HEY you").category_of("HEY"),
            Some(TokenCategory::Keyword)
        );
        assert_eq!(
            lexer.tokenize("HEY you").category_of("HEY"),
            Some(TokenCategory::Name)
        );
    }
}
