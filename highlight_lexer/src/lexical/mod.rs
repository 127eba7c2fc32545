//! Lexical analysis: run a compiled grammar over source text

pub mod analyzer;

use crate::config::runtime::LexicalPreferences;
use crate::rules::Grammar;
use crate::tokens::TokenStream;

pub use analyzer::{LexicalAnalyzer, LexicalMetrics};

/// Tokenize with default preferences
pub fn tokenize(grammar: &Grammar, source: &str) -> TokenStream {
    LexicalAnalyzer::new(grammar).tokenize(source)
}

/// Tokenize and return the scan metrics alongside the tokens
pub fn tokenize_with_metrics(
    grammar: &Grammar,
    source: &str,
    preferences: LexicalPreferences,
) -> (TokenStream, LexicalMetrics) {
    let mut analyzer = LexicalAnalyzer::with_preferences(grammar, preferences);
    let stream = analyzer.tokenize(source);
    (stream, analyzer.metrics().clone())
}
