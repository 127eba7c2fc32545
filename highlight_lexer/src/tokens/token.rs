//! A classified lexeme with its source location

use super::category::TokenCategory;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub category: TokenCategory,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(category: TokenCategory, text: impl Into<String>, span: Span) -> Self {
        Self {
            category,
            text: text.into(),
            span,
        }
    }

    pub fn is(&self, category: TokenCategory) -> bool {
        self.category == category
    }

    /// Whitespace-only plain text
    pub fn is_blank(&self) -> bool {
        self.category.is_within(TokenCategory::Text) && self.text.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} @ {}", self.category, self.text, self.span.start)
    }
}
