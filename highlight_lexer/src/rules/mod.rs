//! Regex rule engine: rules, vocabularies, and grammars built from them

pub mod grammar;
pub mod rule;
pub mod vocabulary;

pub use grammar::{Grammar, GrammarBuilder, GrammarError, ROOT_STATE};
pub use rule::{include, Action, GroupAction, RuleDef, StateEntry, Transition};
pub use vocabulary::{KeywordTable, Vocabulary};
