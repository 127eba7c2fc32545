//! Ordered token output of one scan

use super::category::TokenCategory;
use super::token::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tokens in source order; their texts concatenate to the scanned input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Rebuild the scanned text
    pub fn source_text(&self) -> String {
        let capacity = self.tokens.iter().map(Token::len).sum();
        let mut text = String::with_capacity(capacity);
        for token in &self.tokens {
            text.push_str(&token.text);
        }
        text
    }

    /// Tokens whose category is exactly `category`
    pub fn with_category(&self, category: TokenCategory) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |token| token.category == category)
    }

    /// Tokens at or below `ancestor` in the category hierarchy
    pub fn within(&self, ancestor: TokenCategory) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(move |token| token.category.is_within(ancestor))
    }

    /// Category of the first token whose text is exactly `text`
    pub fn category_of(&self, text: &str) -> Option<TokenCategory> {
        self.tokens
            .iter()
            .find(|token| token.text == text)
            .map(|token| token.category)
    }

    /// Tokens other than blank text
    pub fn significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| !token.is_blank())
    }

    pub fn count_by_category(&self) -> BTreeMap<TokenCategory, usize> {
        let mut counts = BTreeMap::new();
        for token in &self.tokens {
            *counts.entry(token.category).or_insert(0) += 1;
        }
        counts
    }

    /// Join runs of adjacent tokens that share a category
    pub fn merge_adjacent(self) -> Self {
        let mut merged: Vec<Token> = Vec::with_capacity(self.tokens.len());
        for token in self.tokens {
            match merged.last_mut() {
                Some(previous) if previous.category == token.category => {
                    previous.text.push_str(&token.text);
                    previous.span = previous.span.merge(token.span);
                }
                _ => merged.push(token),
            }
        }
        Self { tokens: merged }
    }

    /// Split tokens on newlines, producing one token list per source line
    pub fn lines(&self) -> Vec<Vec<(TokenCategory, &str)>> {
        let mut lines = vec![Vec::new()];
        for token in &self.tokens {
            let mut pieces = token.text.split('\n').peekable();
            while let Some(piece) = pieces.next() {
                if !piece.is_empty() {
                    if let Some(line) = lines.last_mut() {
                        line.push((token.category, piece));
                    }
                }
                if pieces.peek().is_some() {
                    lines.push(Vec::new());
                }
            }
        }
        if self.source_text().ends_with('\n') {
            lines.pop();
        }
        lines
    }
}

impl IntoIterator for TokenStream {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};

    fn stream(parts: &[(TokenCategory, &str)]) -> TokenStream {
        let mut position = Position::start();
        parts
            .iter()
            .map(|(category, text)| {
                let span = Span::covering(position, text);
                position = span.end;
                Token::new(*category, *text, span)
            })
            .collect()
    }

    #[test]
    fn test_merge_adjacent_joins_runs() {
        let tokens = stream(&[
            (TokenCategory::Text, " "),
            (TokenCategory::Text, "\n"),
            (TokenCategory::KeywordType, "U32"),
            (TokenCategory::Text, " "),
        ])
        .merge_adjacent();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens.tokens()[0].text, " \n");
        assert_eq!(tokens.tokens()[0].span.end.line, 2);
        assert_eq!(tokens.source_text(), " \nU32 ");
    }

    #[test]
    fn test_category_queries() {
        let tokens = stream(&[
            (TokenCategory::KeywordType, "U32"),
            (TokenCategory::Text, " "),
            (TokenCategory::Name, "count"),
            (TokenCategory::Keyword, "return"),
        ]);

        assert_eq!(tokens.category_of("count"), Some(TokenCategory::Name));
        assert_eq!(tokens.within(TokenCategory::Keyword).count(), 2);
        assert_eq!(tokens.significant().count(), 3);
        assert_eq!(tokens.count_by_category()[&TokenCategory::KeywordType], 1);
    }

    #[test]
    fn test_lines_split_multiline_tokens() {
        let tokens = stream(&[
            (TokenCategory::CommentMultiline, "/* a\nb */"),
            (TokenCategory::Text, "\n"),
            (TokenCategory::Name, "x"),
        ]);

        let lines = tokens.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![(TokenCategory::CommentMultiline, "/* a")]);
        assert_eq!(lines[1], vec![(TokenCategory::CommentMultiline, "b */")]);
        assert_eq!(lines[2], vec![(TokenCategory::Name, "x")]);
    }

    #[test]
    fn test_lines_drop_trailing_empty_line() {
        let tokens = stream(&[(TokenCategory::Name, "x"), (TokenCategory::Text, "\n")]);
        assert_eq!(tokens.lines().len(), 1);
    }
}
