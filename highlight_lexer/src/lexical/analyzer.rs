//! State-stack scanner driven by a compiled grammar
//!
//! Scanning never fails. Input no rule claims becomes `Text`, one character
//! at a time, and the token limit turns the unscanned remainder into a single
//! `Text` token.

use crate::config::compile_time::lexical::MAX_STATE_DEPTH;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::rules::rule::{CompiledAction, CompiledGroup, CompiledRule, CompiledTransition, RuleMatch};
use crate::rules::Grammar;
use crate::tokens::{Token, TokenCategory, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_success, log_warning};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;
use std::time::Instant;

/// Counters collected during one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub bytes_scanned: usize,
    pub fallback_characters: usize,
    pub max_stack_depth: usize,
    pub ignored_pushes: usize,
    pub truncated: bool,
    pub tokens_by_category: BTreeMap<String, usize>,
    pub processing_time_ms: f64,
}

impl LexicalMetrics {
    /// Share of the input that a rule classified (1.0 when nothing fell through)
    pub fn coverage(&self) -> f64 {
        if self.bytes_scanned == 0 {
            1.0
        } else {
            1.0 - (self.fallback_characters as f64 / self.bytes_scanned as f64).min(1.0)
        }
    }
}

struct RawToken {
    category: TokenCategory,
    range: Range<usize>,
}

/// Scanner over one grammar
pub struct LexicalAnalyzer<'g> {
    grammar: &'g Grammar,
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
}

impl<'g> LexicalAnalyzer<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_preferences(grammar, LexicalPreferences::default())
    }

    pub fn with_preferences(grammar: &'g Grammar, preferences: LexicalPreferences) -> Self {
        Self {
            grammar,
            preferences,
            metrics: LexicalMetrics::default(),
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Scan `source` from the root state
    pub fn tokenize(&mut self, source: &str) -> TokenStream {
        let started = Instant::now();
        self.metrics = LexicalMetrics {
            bytes_scanned: source.len(),
            ..LexicalMetrics::default()
        };

        log_debug!("Starting lexical analysis",
            "grammar" => self.grammar.name(),
            "bytes" => source.len()
        );

        let mut raw = Vec::new();
        self.scan(source, 0, self.grammar.root(), 0, &mut raw);

        if self.preferences.merge_adjacent_tokens {
            raw = merge_adjacent(raw);
        }

        let stream = resolve_positions(source, raw);

        self.metrics.total_tokens = stream.len();
        if self.preferences.collect_detailed_metrics {
            self.metrics.tokens_by_category = stream
                .count_by_category()
                .into_iter()
                .map(|(category, count)| (category.qualified_name().to_string(), count))
                .collect();
        }
        self.metrics.processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "grammar" => self.grammar.name(),
            "tokens" => self.metrics.total_tokens,
            "fallback_chars" => self.metrics.fallback_characters,
            "duration_ms" => format!("{:.3}", self.metrics.processing_time_ms)
        );

        stream
    }

    /// Scan `text`, whose first byte sits at `base` in the full input
    fn scan(
        &mut self,
        text: &str,
        base: usize,
        initial_state: usize,
        depth: usize,
        out: &mut Vec<RawToken>,
    ) {
        let grammar = self.grammar;
        let mut stack = vec![initial_state];
        let mut pos = 0;

        while pos < text.len() {
            if out.len() >= self.preferences.token_limit() {
                self.truncate(base + pos, base + text.len(), out);
                return;
            }

            let state = stack.last().copied().unwrap_or(initial_state);
            let matched = grammar
                .state(state)
                .rules
                .iter()
                .find_map(|rule| rule.match_at(text, pos).map(|found| (rule, found)));

            match matched {
                Some((rule, found)) => {
                    self.emit(rule, &found, text, base, depth, out);
                    self.apply_transition(rule.transition, &mut stack);
                    pos = found.range.end;
                }
                None => {
                    let width = text[pos..].chars().next().map_or(1, char::len_utf8);
                    self.fallback(base + pos..base + pos + width, state, out);
                    pos += width;
                }
            }
        }
    }

    fn emit(
        &mut self,
        rule: &CompiledRule,
        found: &RuleMatch,
        text: &str,
        base: usize,
        depth: usize,
        out: &mut Vec<RawToken>,
    ) {
        let absolute = |range: &Range<usize>| base + range.start..base + range.end;

        match &rule.action {
            CompiledAction::Token(category) => push(out, *category, absolute(&found.range)),
            CompiledAction::Keywords(table) => {
                let category = table.classify(&text[found.range.clone()]);
                push(out, category, absolute(&found.range));
            }
            CompiledAction::Groups(actions) => {
                let mut cursor = found.range.start;
                for (action, group) in actions.iter().zip(found.groups.iter()) {
                    let Some(range) = group else { continue };
                    if range.is_empty() || range.start < cursor {
                        continue;
                    }
                    if range.start > cursor {
                        push(out, TokenCategory::Text, absolute(&(cursor..range.start)));
                    }

                    match action {
                        CompiledGroup::Token(category) => {
                            push(out, *category, absolute(range));
                        }
                        CompiledGroup::Keywords(table) => {
                            push(out, table.classify(&text[range.clone()]), absolute(range));
                        }
                        CompiledGroup::Lex(state) if depth < MAX_STATE_DEPTH => {
                            self.scan(&text[range.clone()], base + range.start, *state, depth + 1, out);
                        }
                        CompiledGroup::Lex(_) => push(out, TokenCategory::Text, absolute(range)),
                    }
                    cursor = range.end;
                }

                if cursor < found.range.end {
                    push(out, TokenCategory::Text, absolute(&(cursor..found.range.end)));
                }
            }
        }
    }

    fn apply_transition(&mut self, transition: CompiledTransition, stack: &mut Vec<usize>) {
        match transition {
            CompiledTransition::None => {}
            CompiledTransition::Pop => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            CompiledTransition::Push(state) => {
                if stack.len() >= MAX_STATE_DEPTH {
                    self.metrics.ignored_pushes += 1;
                    if self.metrics.ignored_pushes == 1 {
                        log_warning!(code = codes::lexical::STATE_DEPTH_EXCEEDED,
                            "State stack depth limit reached",
                            "grammar" => self.grammar.name(),
                            "state" => self.grammar.state_name(state).unwrap_or("?"),
                            "limit" => MAX_STATE_DEPTH
                        );
                    }
                } else {
                    stack.push(state);
                    self.metrics.max_stack_depth = self.metrics.max_stack_depth.max(stack.len());
                }
            }
        }
    }

    fn fallback(&mut self, range: Range<usize>, state: usize, out: &mut Vec<RawToken>) {
        self.metrics.fallback_characters += range.len();
        if self.preferences.log_fallback_characters {
            log_warning!(code = codes::lexical::UNMATCHED_INPUT,
                "Input matched no rule",
                "state" => self.grammar.state_name(state).unwrap_or("?"),
                "offset" => range.start
            );
        }
        push(out, TokenCategory::Text, range);
    }

    fn truncate(&mut self, start: usize, end: usize, out: &mut Vec<RawToken>) {
        if !self.metrics.truncated {
            self.metrics.truncated = true;
            log_warning!(code = codes::lexical::TOKEN_LIMIT_REACHED,
                "Token limit reached, remaining input left unclassified",
                "grammar" => self.grammar.name(),
                "limit" => self.preferences.token_limit(),
                "remaining_bytes" => end - start
            );
        }
        push(out, TokenCategory::Text, start..end);
    }
}

fn push(out: &mut Vec<RawToken>, category: TokenCategory, range: Range<usize>) {
    if !range.is_empty() {
        out.push(RawToken { category, range });
    }
}

fn merge_adjacent(raw: Vec<RawToken>) -> Vec<RawToken> {
    let mut merged: Vec<RawToken> = Vec::with_capacity(raw.len());
    for token in raw {
        match merged.last_mut() {
            Some(previous)
                if previous.category == token.category && previous.range.end == token.range.start =>
            {
                previous.range.end = token.range.end;
            }
            _ => merged.push(token),
        }
    }
    merged
}

fn resolve_positions(source: &str, raw: Vec<RawToken>) -> TokenStream {
    let mut position = Position::start();
    raw.into_iter()
        .map(|token| {
            let text = &source[token.range.clone()];
            let span = Span::covering(position, text);
            position = span.end;
            Token::new(token.category, text, span)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{include, GrammarBuilder, GroupAction, KeywordTable, RuleDef, ROOT_STATE};
    use std::sync::Arc;

    fn demo_grammar() -> Grammar {
        let table = Arc::new(
            KeywordTable::new(TokenCategory::Name).with(TokenCategory::Keyword, &["return"]),
        );
        GrammarBuilder::new("demo")
            .state(
                "ws",
                [RuleDef::token(r"\s+", TokenCategory::Whitespace).into()],
            )
            .state(
                "string",
                [
                    RuleDef::token("\"", TokenCategory::String).pop().into(),
                    RuleDef::token(r#"[^"]+"#, TokenCategory::String).into(),
                ],
            )
            .state(
                ROOT_STATE,
                [
                    include("ws"),
                    RuleDef::token("\"", TokenCategory::String).push("string").into(),
                    RuleDef::groups(
                        r"(class)(\s+)(\w+)",
                        vec![
                            GroupAction::Token(TokenCategory::Keyword),
                            GroupAction::Token(TokenCategory::Whitespace),
                            GroupAction::Token(TokenCategory::NameClass),
                        ],
                    )
                    .into(),
                    RuleDef::groups(
                        r"(\w+ )(\w+)\(",
                        vec![
                            GroupAction::Lex(ROOT_STATE.to_string()),
                            GroupAction::Token(TokenCategory::NameFunction),
                        ],
                    )
                    .into(),
                    RuleDef::keywords(r"[A-Za-z_]\w*", table).into(),
                    RuleDef::token(r"\d+", TokenCategory::NumberInteger).into(),
                ],
            )
            .build()
            .unwrap()
    }

    fn categories(stream: &TokenStream) -> Vec<(TokenCategory, &str)> {
        stream
            .iter()
            .map(|token| (token.category, token.text.as_str()))
            .collect()
    }

    #[test]
    fn test_states_and_keywords() {
        let grammar = demo_grammar();
        let stream = LexicalAnalyzer::new(&grammar).tokenize("return \"a b\" x");

        assert_eq!(
            categories(&stream),
            vec![
                (TokenCategory::Keyword, "return"),
                (TokenCategory::Whitespace, " "),
                (TokenCategory::String, "\"a b\""),
                (TokenCategory::Whitespace, " "),
                (TokenCategory::Name, "x"),
            ]
        );
    }

    #[test]
    fn test_groups_and_sub_scan() {
        let grammar = demo_grammar();
        let stream = LexicalAnalyzer::new(&grammar).tokenize("class Foo\nreturn run(");

        assert_eq!(stream.category_of("Foo"), Some(TokenCategory::NameClass));
        assert_eq!(stream.category_of("run"), Some(TokenCategory::NameFunction));
        assert_eq!(stream.category_of("return"), Some(TokenCategory::Keyword));
        assert_eq!(stream.category_of("("), Some(TokenCategory::Text));
    }

    #[test]
    fn test_unmatched_input_is_text_and_lossless() {
        let grammar = demo_grammar();
        let source = "x @ 12 µ\"open";
        let mut analyzer = LexicalAnalyzer::new(&grammar);
        let stream = analyzer.tokenize(source);

        assert_eq!(stream.source_text(), source);
        assert_eq!(stream.category_of("@"), Some(TokenCategory::Text));
        assert_eq!(analyzer.metrics().fallback_characters, "@".len() + "µ".len());
        assert!(analyzer.metrics().coverage() < 1.0);
    }

    #[test]
    fn test_positions_track_lines() {
        let grammar = demo_grammar();
        let stream = LexicalAnalyzer::new(&grammar).tokenize("a\n  b");
        let b = stream.iter().find(|t| t.text == "b").unwrap();

        assert_eq!(b.span.start.line, 2);
        assert_eq!(b.span.start.column, 3);
        assert_eq!(b.span.start.offset, 4);
    }

    #[test]
    fn test_merge_preference() {
        let grammar = demo_grammar();
        let merged = LexicalAnalyzer::new(&grammar).tokenize("@@");
        assert_eq!(merged.len(), 1);

        let preferences = LexicalPreferences {
            merge_adjacent_tokens: false,
            ..LexicalPreferences::default()
        };
        let split = LexicalAnalyzer::with_preferences(&grammar, preferences).tokenize("@@");
        assert_eq!(split.len(), 2);
    }

    #[test]
    fn test_pop_at_root_keeps_root() {
        let grammar = GrammarBuilder::new("pops")
            .state(
                ROOT_STATE,
                [
                    RuleDef::token(r"\)", TokenCategory::Punctuation).pop().into(),
                    RuleDef::token(r"\w+", TokenCategory::Name).into(),
                ],
            )
            .build()
            .unwrap();

        let stream = LexicalAnalyzer::new(&grammar).tokenize("))a");
        assert_eq!(stream.category_of("a"), Some(TokenCategory::Name));
    }

    #[test]
    fn test_runaway_push_is_bounded() {
        let grammar = GrammarBuilder::new("nest")
            .state(
                ROOT_STATE,
                [RuleDef::token(r"\(", TokenCategory::Punctuation)
                    .push(ROOT_STATE)
                    .into()],
            )
            .build()
            .unwrap();

        let source = "(".repeat(MAX_STATE_DEPTH + 5);
        let mut analyzer = LexicalAnalyzer::new(&grammar);
        let stream = analyzer.tokenize(&source);

        assert_eq!(stream.source_text(), source);
        assert_eq!(analyzer.metrics().max_stack_depth, MAX_STATE_DEPTH);
        assert_eq!(analyzer.metrics().ignored_pushes, 6);
    }

    #[test]
    fn test_token_limit_leaves_remainder_as_text() {
        let grammar = demo_grammar();
        let preferences = LexicalPreferences {
            merge_adjacent_tokens: false,
            max_token_count: 3,
            ..LexicalPreferences::default()
        };
        let source = "return x \"tail\" 42";
        let mut analyzer = LexicalAnalyzer::with_preferences(&grammar, preferences);
        let stream = analyzer.tokenize(source);

        assert!(analyzer.metrics().truncated);
        assert_eq!(stream.len(), 4);
        assert_eq!(
            categories(&stream),
            vec![
                (TokenCategory::Keyword, "return"),
                (TokenCategory::Whitespace, " "),
                (TokenCategory::Name, "x"),
                (TokenCategory::Text, " \"tail\" 42"),
            ]
        );
        assert_eq!(stream.source_text(), source);
    }

    #[test]
    fn test_token_limit_is_capped_by_build_limit() {
        let preferences = LexicalPreferences {
            max_token_count: usize::MAX,
            ..LexicalPreferences::default()
        };
        assert_eq!(
            preferences.token_limit(),
            crate::config::compile_time::lexical::MAX_TOKEN_COUNT
        );
    }

    #[test]
    fn test_empty_input() {
        let grammar = demo_grammar();
        let mut analyzer = LexicalAnalyzer::new(&grammar);
        assert!(analyzer.tokenize("").is_empty());
        assert_eq!(analyzer.metrics().coverage(), 1.0);
    }
}
