//! Grammar construction and compilation
//!
//! A grammar is a set of named states, each an ordered rule list. States may
//! include other states; includes are flattened when the grammar is built, so
//! the scanner only ever walks a flat list per state.

use super::rule::{
    matches_empty, Action, CompiledAction, CompiledGroup, CompiledRule, CompiledTransition,
    GroupAction, RuleDef, StateEntry, Transition,
};
use crate::logging::codes;
use crate::tokens::TokenCategory;
use crate::{log_debug, log_error, log_success};
use std::collections::HashMap;
use std::sync::Arc;

pub const ROOT_STATE: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("Invalid pattern in state '{state}': {pattern}: {message}")]
    InvalidPattern {
        state: String,
        pattern: String,
        message: String,
    },

    #[error("Pattern in state '{state}' can match empty input: {pattern}")]
    ZeroWidthPattern { state: String, pattern: String },

    #[error("Unknown state '{state}' referenced from '{referenced_from}'")]
    UnknownState {
        state: String,
        referenced_from: String,
    },

    #[error("State include cycle: {}", .path.join(" -> "))]
    IncludeCycle { path: Vec<String> },

    #[error("Vocabulary for {category} has no words")]
    EmptyVocabulary { category: TokenCategory },

    #[error("Grammar '{grammar}' has no '{}' state", ROOT_STATE)]
    MissingRootState { grammar: String },

    #[error("Vocabulary has {words} words, limit is {limit}")]
    VocabularyTooLarge { words: usize, limit: usize },

    #[error("Pattern is {length} bytes, limit is {limit}")]
    PatternTooLong { length: usize, limit: usize },
}

impl GrammarError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            GrammarError::InvalidPattern { .. } => codes::grammar::INVALID_PATTERN,
            GrammarError::ZeroWidthPattern { .. } => codes::grammar::ZERO_WIDTH_PATTERN,
            GrammarError::UnknownState { .. } => codes::grammar::UNKNOWN_STATE,
            GrammarError::IncludeCycle { .. } => codes::grammar::INCLUDE_CYCLE,
            GrammarError::EmptyVocabulary { .. } => codes::grammar::EMPTY_VOCABULARY,
            GrammarError::MissingRootState { .. } => codes::grammar::MISSING_ROOT_STATE,
            GrammarError::VocabularyTooLarge { .. } | GrammarError::PatternTooLong { .. } => {
                codes::grammar::VOCABULARY_TOO_LARGE
            }
        }
    }
}

/// Ordered, mutable grammar definition
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    name: String,
    states: Vec<(String, Vec<StateEntry>)>,
}

impl GrammarBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Declare a state, or append to it if already declared
    pub fn state<I>(mut self, name: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = StateEntry>,
    {
        self.entries_mut(name).extend(entries);
        self
    }

    /// Append entries after the state's existing rules
    pub fn append<I>(&mut self, name: &str, entries: I)
    where
        I: IntoIterator<Item = StateEntry>,
    {
        self.entries_mut(name).extend(entries);
    }

    /// Insert entries ahead of every rule already in `name`, keeping their
    /// relative order. A later prepend lands in front of an earlier one.
    pub fn prepend<I>(&mut self, name: &str, entries: I) -> Result<(), GrammarError>
    where
        I: IntoIterator<Item = StateEntry>,
    {
        let added: Vec<StateEntry> = entries.into_iter().collect();
        log_debug!("Prepending rules",
            "grammar" => self.name,
            "state" => name,
            "rules" => added.len()
        );

        let grammar = self.name.clone();
        let existing = self
            .states
            .iter_mut()
            .find(|(state, _)| state == name)
            .map(|(_, entries)| entries)
            .ok_or_else(|| GrammarError::UnknownState {
                state: name.to_string(),
                referenced_from: grammar,
            })?;

        existing.splice(0..0, added);
        Ok(())
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.iter().any(|(state, _)| state == name)
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|(state, _)| state.as_str())
    }

    pub fn entries(&self, name: &str) -> Option<&[StateEntry]> {
        self.states
            .iter()
            .find(|(state, _)| state == name)
            .map(|(_, entries)| entries.as_slice())
    }

    fn entries_mut(&mut self, name: &str) -> &mut Vec<StateEntry> {
        let index = match self.states.iter().position(|(state, _)| state == name) {
            Some(index) => index,
            None => {
                self.states.push((name.to_string(), Vec::new()));
                self.states.len() - 1
            }
        };
        &mut self.states[index].1
    }

    /// Compile every rule, resolve state references, and flatten includes
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        self.compile().map_err(|error| {
            log_error!(error.error_code(), &error.to_string(),
                "grammar" => self.name
            );
            error
        })
    }

    fn compile(&self) -> Result<Grammar, GrammarError> {
        let index: HashMap<String, usize> = self
            .states
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();

        if !index.contains_key(ROOT_STATE) {
            return Err(GrammarError::MissingRootState {
                grammar: self.name.clone(),
            });
        }

        let mut declared: Vec<Vec<Slot>> = Vec::with_capacity(self.states.len());
        for (state, entries) in &self.states {
            let mut slots = Vec::with_capacity(entries.len());
            for entry in entries {
                slots.push(match entry {
                    StateEntry::Rule(rule) => {
                        Slot::Rule(Arc::new(compile_rule(state, rule, &index)?))
                    }
                    StateEntry::Include(target) => {
                        Slot::Include(resolve(&index, target, state)?)
                    }
                });
            }
            declared.push(slots);
        }

        let mut flattened: HashMap<usize, Vec<Arc<CompiledRule>>> = HashMap::new();
        let mut states = Vec::with_capacity(self.states.len());
        for (i, (name, _)) in self.states.iter().enumerate() {
            let mut visiting = Vec::new();
            let rules = self.flatten(i, &declared, &mut visiting, &mut flattened)?;
            states.push(CompiledState {
                name: name.clone(),
                rules,
            });
        }

        let rule_count: usize = states.iter().map(|s| s.rules.len()).sum();
        log_success!(codes::success::GRAMMAR_COMPILED, "Grammar compiled",
            "grammar" => self.name,
            "states" => states.len(),
            "rules" => rule_count
        );

        Ok(Grammar {
            name: self.name.clone(),
            states,
            index,
        })
    }

    fn flatten(
        &self,
        state: usize,
        declared: &[Vec<Slot>],
        visiting: &mut Vec<usize>,
        done: &mut HashMap<usize, Vec<Arc<CompiledRule>>>,
    ) -> Result<Vec<Arc<CompiledRule>>, GrammarError> {
        if let Some(rules) = done.get(&state) {
            return Ok(rules.clone());
        }
        if let Some(start) = visiting.iter().position(|&s| s == state) {
            let mut path: Vec<String> = visiting[start..]
                .iter()
                .map(|&s| self.states[s].0.clone())
                .collect();
            path.push(self.states[state].0.clone());
            return Err(GrammarError::IncludeCycle { path });
        }

        visiting.push(state);
        let mut rules = Vec::new();
        for slot in &declared[state] {
            match slot {
                Slot::Rule(rule) => rules.push(Arc::clone(rule)),
                Slot::Include(target) => {
                    rules.extend(self.flatten(*target, declared, visiting, done)?);
                }
            }
        }
        visiting.pop();

        done.insert(state, rules.clone());
        Ok(rules)
    }
}

enum Slot {
    Rule(Arc<CompiledRule>),
    Include(usize),
}

fn resolve(
    index: &HashMap<String, usize>,
    target: &str,
    from: &str,
) -> Result<usize, GrammarError> {
    index
        .get(target)
        .copied()
        .ok_or_else(|| GrammarError::UnknownState {
            state: target.to_string(),
            referenced_from: from.to_string(),
        })
}

fn compile_rule(
    state: &str,
    rule: &RuleDef,
    index: &HashMap<String, usize>,
) -> Result<CompiledRule, GrammarError> {
    let invalid = |error: regex::Error| GrammarError::InvalidPattern {
        state: state.to_string(),
        pattern: rule.pattern.clone(),
        message: error.to_string(),
    };

    if matches_empty(&rule.pattern).map_err(invalid)? {
        return Err(GrammarError::ZeroWidthPattern {
            state: state.to_string(),
            pattern: rule.pattern.clone(),
        });
    }

    for target in rule.referenced_states() {
        resolve(index, target, state)?;
    }

    let transition = match &rule.transition {
        Transition::None => CompiledTransition::None,
        Transition::Pop => CompiledTransition::Pop,
        Transition::Push(target) => CompiledTransition::Push(resolve(index, target, state)?),
    };

    let action = match &rule.action {
        Action::Token(category) => CompiledAction::Token(*category),
        Action::Keywords(table) => CompiledAction::Keywords(Arc::clone(table)),
        Action::Groups(groups) => CompiledAction::Groups(
            groups
                .iter()
                .map(|group| match group {
                    GroupAction::Token(category) => Ok(CompiledGroup::Token(*category)),
                    GroupAction::Lex(target) => {
                        resolve(index, target, state).map(CompiledGroup::Lex)
                    }
                    GroupAction::Keywords(table) => {
                        Ok(CompiledGroup::Keywords(Arc::clone(table)))
                    }
                })
                .collect::<Result<_, _>>()?,
        ),
    };

    CompiledRule::new(&rule.pattern, action, transition).map_err(invalid)
}

#[derive(Debug)]
pub(crate) struct CompiledState {
    pub name: String,
    pub rules: Vec<Arc<CompiledRule>>,
}

/// Immutable compiled grammar, shared between lexers through `Arc`
#[derive(Debug)]
pub struct Grammar {
    name: String,
    states: Vec<CompiledState>,
    index: HashMap<String, usize>,
}

impl Grammar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn root(&self) -> usize {
        self.index.get(ROOT_STATE).copied().unwrap_or(0)
    }

    pub(crate) fn state(&self, index: usize) -> &CompiledState {
        &self.states[index]
    }

    pub fn state_name(&self, index: usize) -> Option<&str> {
        self.states.get(index).map(|s| s.name.as_str())
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|s| s.name.as_str())
    }

    /// Flattened rule patterns of a state, in matching order
    pub fn patterns(&self, state: &str) -> Option<Vec<&str>> {
        let index = self.state_index(state)?;
        Some(
            self.states[index]
                .rules
                .iter()
                .map(|rule| rule.pattern.as_str())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::rule::include;
    use assert_matches::assert_matches;

    fn word(pattern: &str) -> StateEntry {
        RuleDef::token(pattern, TokenCategory::Name).into()
    }

    #[test]
    fn test_prepend_places_rules_first_in_order() {
        let mut builder = GrammarBuilder::new("demo").state(ROOT_STATE, [word("c")]);
        builder
            .prepend(ROOT_STATE, [word("a"), word("b")])
            .unwrap();

        let grammar = builder.build().unwrap();
        assert_eq!(grammar.patterns(ROOT_STATE).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_later_prepend_goes_in_front() {
        let mut builder = GrammarBuilder::new("demo").state(ROOT_STATE, [word("z")]);
        builder.prepend(ROOT_STATE, [word("first")]).unwrap();
        builder.prepend(ROOT_STATE, [word("second")]).unwrap();

        let grammar = builder.build().unwrap();
        assert_eq!(
            grammar.patterns(ROOT_STATE).unwrap(),
            vec!["second", "first", "z"]
        );
    }

    #[test]
    fn test_prepend_unknown_state() {
        let mut builder = GrammarBuilder::new("demo").state(ROOT_STATE, [word("a")]);
        assert_matches!(
            builder.prepend("statement", [word("b")]),
            Err(GrammarError::UnknownState { .. })
        );
    }

    #[test]
    fn test_includes_are_flattened() {
        let grammar = GrammarBuilder::new("demo")
            .state("ws", [word(r"\s+")])
            .state("body", [include("ws"), word("x")])
            .state(ROOT_STATE, [word("r"), include("body")])
            .build()
            .unwrap();

        assert_eq!(
            grammar.patterns(ROOT_STATE).unwrap(),
            vec!["r", r"\s+", "x"]
        );
    }

    #[test]
    fn test_include_cycle_detected() {
        let result = GrammarBuilder::new("demo")
            .state(ROOT_STATE, [include("a")])
            .state("a", [include("b")])
            .state("b", [include("a")])
            .build();

        assert_matches!(result, Err(GrammarError::IncludeCycle { path }) => {
            assert_eq!(path, vec!["a", "b", "a"]);
        });
    }

    #[test]
    fn test_build_errors() {
        assert_matches!(
            GrammarBuilder::new("demo").state("other", [word("a")]).build(),
            Err(GrammarError::MissingRootState { .. })
        );
        assert_matches!(
            GrammarBuilder::new("demo").state(ROOT_STATE, [word("a*")]).build(),
            Err(GrammarError::ZeroWidthPattern { .. })
        );
        assert_matches!(
            GrammarBuilder::new("demo").state(ROOT_STATE, [word("(")]).build(),
            Err(GrammarError::InvalidPattern { .. })
        );
        assert_matches!(
            GrammarBuilder::new("demo")
                .state(
                    ROOT_STATE,
                    [RuleDef::token("\"", TokenCategory::String).push("string").into()]
                )
                .build(),
            Err(GrammarError::UnknownState { state, .. }) if state == "string"
        );
    }

    #[test]
    fn test_error_codes() {
        let error = GrammarError::ZeroWidthPattern {
            state: "root".into(),
            pattern: "x*".into(),
        };
        assert_eq!(error.error_code().as_str(), "E021");
    }
}
