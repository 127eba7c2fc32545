//! Word lists: vocabulary rules and keyword lookup tables

use super::grammar::GrammarError;
use super::rule::RuleDef;
use crate::config::compile_time::lexical::{MAX_PATTERN_LENGTH, MAX_VOCABULARY_WORDS};
use crate::tokens::TokenCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Literal identifiers that all map to one category.
///
/// Compiles to `\b(?:w1|w2|...)\b`, so a word never matches inside a longer
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub category: TokenCategory,
    pub words: Vec<String>,
}

impl Vocabulary {
    pub fn new<I, S>(category: TokenCategory, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category,
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Word-boundary alternation with every word escaped
    pub fn pattern(&self) -> String {
        let alternatives: Vec<String> = self.words.iter().map(|w| regex::escape(w)).collect();
        format!(r"\b(?:{})\b", alternatives.join("|"))
    }

    pub fn to_rule(&self) -> Result<RuleDef, GrammarError> {
        let words: Vec<&String> = self.words.iter().filter(|w| !w.is_empty()).collect();
        if words.is_empty() {
            return Err(GrammarError::EmptyVocabulary {
                category: self.category,
            });
        }
        if words.len() != self.words.len() {
            return Err(GrammarError::ZeroWidthPattern {
                state: String::new(),
                pattern: self.pattern(),
            });
        }
        if self.words.len() > MAX_VOCABULARY_WORDS {
            return Err(GrammarError::VocabularyTooLarge {
                words: self.words.len(),
                limit: MAX_VOCABULARY_WORDS,
            });
        }

        let pattern = self.pattern();
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(GrammarError::PatternTooLong {
                length: pattern.len(),
                limit: MAX_PATTERN_LENGTH,
            });
        }

        Ok(RuleDef::token(pattern, self.category))
    }
}

/// Exact-word lookup used for identifiers; anything unlisted gets the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    entries: HashMap<String, TokenCategory>,
    fallback: TokenCategory,
}

impl KeywordTable {
    pub fn new(fallback: TokenCategory) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
        }
    }

    /// Add words; a word already present keeps its first category
    pub fn with(mut self, category: TokenCategory, words: &[&str]) -> Self {
        for word in words {
            self.entries.entry((*word).to_string()).or_insert(category);
        }
        self
    }

    /// Same entries with a different fallback category
    pub fn with_fallback(&self, fallback: TokenCategory) -> Self {
        Self {
            entries: self.entries.clone(),
            fallback,
        }
    }

    pub fn classify(&self, word: &str) -> TokenCategory {
        self.entries.get(word).copied().unwrap_or(self.fallback)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
