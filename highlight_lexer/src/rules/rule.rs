//! Rule definitions and their compiled, cursor-anchored form

use super::vocabulary::KeywordTable;
use crate::tokens::TokenCategory;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::Arc;

/// State change applied after a rule matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(String),
    Pop,
}

/// What a capture group produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupAction {
    Token(TokenCategory),
    /// Re-scan the group's text starting in the named state
    Lex(String),
    /// Category decided by looking up the group's text
    Keywords(Arc<KeywordTable>),
}

/// What a whole match produces
#[derive(Debug, Clone)]
pub enum Action {
    Token(TokenCategory),
    /// One action per capture group; text between groups is emitted as `Text`
    Groups(Vec<GroupAction>),
    /// Category decided by looking up the matched word
    Keywords(Arc<KeywordTable>),
}

/// An uncompiled rule as declared in a grammar
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub pattern: String,
    pub action: Action,
    pub transition: Transition,
}

impl RuleDef {
    pub fn token(pattern: impl Into<String>, category: TokenCategory) -> Self {
        Self {
            pattern: pattern.into(),
            action: Action::Token(category),
            transition: Transition::None,
        }
    }

    pub fn groups(pattern: impl Into<String>, groups: Vec<GroupAction>) -> Self {
        Self {
            pattern: pattern.into(),
            action: Action::Groups(groups),
            transition: Transition::None,
        }
    }

    pub fn keywords(pattern: impl Into<String>, table: Arc<KeywordTable>) -> Self {
        Self {
            pattern: pattern.into(),
            action: Action::Keywords(table),
            transition: Transition::None,
        }
    }

    pub fn push(mut self, state: impl Into<String>) -> Self {
        self.transition = Transition::Push(state.into());
        self
    }

    pub fn pop(mut self) -> Self {
        self.transition = Transition::Pop;
        self
    }

    /// States this rule refers to, either by transition or by sub-scan
    pub(crate) fn referenced_states(&self) -> Vec<&str> {
        let mut states = Vec::new();
        if let Transition::Push(state) = &self.transition {
            states.push(state.as_str());
        }
        if let Action::Groups(groups) = &self.action {
            for group in groups {
                if let GroupAction::Lex(state) = group {
                    states.push(state.as_str());
                }
            }
        }
        states
    }
}

/// Entry in a state's ordered rule list
#[derive(Debug, Clone)]
pub enum StateEntry {
    Rule(RuleDef),
    /// Splice another state's rules in at this point
    Include(String),
}

impl From<RuleDef> for StateEntry {
    fn from(rule: RuleDef) -> Self {
        StateEntry::Rule(rule)
    }
}

pub fn include(state: impl Into<String>) -> StateEntry {
    StateEntry::Include(state.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompiledTransition {
    None,
    Push(usize),
    Pop,
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledGroup {
    Token(TokenCategory),
    Lex(usize),
    Keywords(Arc<KeywordTable>),
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledAction {
    Token(TokenCategory),
    Groups(Vec<CompiledGroup>),
    Keywords(Arc<KeywordTable>),
}

/// A match at the cursor, with absolute byte ranges
#[derive(Debug)]
pub(crate) struct RuleMatch {
    pub range: Range<usize>,
    /// Ranges of participating capture groups, indexed from group 1
    pub groups: Vec<Option<Range<usize>>>,
}

/// A rule compiled into two anchored regexes.
///
/// `at_start` is `\A(?:pat)` and is used at offset 0. `in_context` is
/// `\A(?s:.)(?:pat)` and runs on a haystack that begins one character before
/// the cursor, so `\b` and `(?m)^` observe the preceding character.
#[derive(Debug)]
pub(crate) struct CompiledRule {
    pub pattern: String,
    at_start: Regex,
    in_context: Regex,
    wants_groups: bool,
    pub action: CompiledAction,
    pub transition: CompiledTransition,
}

impl CompiledRule {
    pub fn new(
        pattern: &str,
        action: CompiledAction,
        transition: CompiledTransition,
    ) -> Result<Self, regex::Error> {
        let at_start = Regex::new(&format!(r"\A(?:{})", pattern))?;
        let in_context = Regex::new(&format!(r"\A(?s:.)(?:{})", pattern))?;
        let wants_groups = matches!(action, CompiledAction::Groups(_));

        Ok(Self {
            pattern: pattern.to_string(),
            at_start,
            in_context,
            wants_groups,
            action,
            transition,
        })
    }

    /// Match starting exactly at `pos`; empty matches count as no match
    pub fn match_at(&self, text: &str, pos: usize) -> Option<RuleMatch> {
        let (haystack_start, regex) = if pos == 0 {
            (0, &self.at_start)
        } else {
            let previous = text[..pos].char_indices().next_back().map(|(i, _)| i)?;
            (previous, &self.in_context)
        };
        let haystack = &text[haystack_start..];

        let result = if self.wants_groups {
            let captures = regex.captures(haystack)?;
            let end = haystack_start + captures.get(0)?.end();
            RuleMatch {
                range: pos..end,
                groups: Self::group_ranges(&captures, haystack_start),
            }
        } else {
            let found = regex.find(haystack)?;
            RuleMatch {
                range: pos..haystack_start + found.end(),
                groups: Vec::new(),
            }
        };

        if result.range.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    fn group_ranges(captures: &Captures<'_>, offset: usize) -> Vec<Option<Range<usize>>> {
        (1..captures.len())
            .map(|index| {
                captures
                    .get(index)
                    .map(|m| offset + m.start()..offset + m.end())
            })
            .collect()
    }
}

/// True when the pattern accepts the empty string on its own
pub(crate) fn matches_empty(pattern: &str) -> Result<bool, regex::Error> {
    let whole = Regex::new(&format!(r"\A(?:{})\z", pattern))?;
    Ok(whole.is_match(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str) -> CompiledRule {
        CompiledRule::new(
            pattern,
            CompiledAction::Token(TokenCategory::Name),
            CompiledTransition::None,
        )
        .unwrap()
    }

    #[test]
    fn test_match_is_anchored_at_cursor() {
        let r = rule(r"[a-z]+");
        assert_eq!(r.match_at("12 abc", 3).map(|m| m.range), Some(3..6));
        assert!(r.match_at("12 abc", 0).is_none());
        assert!(r.match_at("12 abc", 2).is_none());
    }

    #[test]
    fn test_word_boundary_sees_previous_character() {
        let r = rule(r"\binit\b");
        assert!(r.match_at("my_init", 3).is_none());
        assert_eq!(r.match_at("x.init()", 2).map(|m| m.range), Some(2..6));
        assert!(r.match_at("initialize", 0).is_none());
    }

    #[test]
    fn test_line_anchor_uses_context() {
        let r = rule(r"(?m)^#");
        assert!(r.match_at("a #", 2).is_none());
        assert_eq!(r.match_at("a\n#", 2).map(|m| m.range), Some(2..3));
        assert_eq!(r.match_at("#x", 0).map(|m| m.range), Some(0..1));
    }

    #[test]
    fn test_multibyte_previous_character() {
        let r = rule(r"\bU32\b");
        assert!(r.match_at("éU32", 2).is_none());
        assert_eq!(r.match_at("é U32", 3).map(|m| m.range), Some(3..6));
    }

    #[test]
    fn test_empty_match_is_no_match() {
        let r = rule(r"\b");
        assert!(r.match_at("abc", 0).is_none());
    }

    #[test]
    fn test_group_ranges_are_absolute() {
        let r = CompiledRule::new(
            r"(class)(\s+)([A-Za-z_]\w*)",
            CompiledAction::Groups(vec![
                CompiledGroup::Token(TokenCategory::Keyword),
                CompiledGroup::Token(TokenCategory::Text),
                CompiledGroup::Token(TokenCategory::NameClass),
            ]),
            CompiledTransition::None,
        )
        .unwrap();

        let found = r.match_at("; class Foo", 2).unwrap();
        assert_eq!(found.range, 2..11);
        assert_eq!(found.groups, vec![Some(2..7), Some(7..8), Some(8..11)]);
    }

    #[test]
    fn test_matches_empty() {
        assert!(matches_empty(r"\s*").unwrap());
        assert!(matches_empty(r"(?m)^").unwrap());
        assert!(!matches_empty(r"\bU8\b").unwrap());
        assert!(!matches_empty(r"[a-z]+").unwrap());
        assert!(matches_empty(r"(").is_err());
    }
}
