//! Vocabulary extensions layered on top of an existing lexer
//!
//! An extension is an ordered list of vocabulary rules, each listing the
//! states it belongs to. Applying it prepends the rules into those states,
//! so they are tried before every rule the base lexer already has there.
//!
//! Extensions load from TOML:
//!
//! ```toml
//! tag = "cpp"
//! base = "cpp"
//!
//! [[rules]]
//! contexts = ["root", "statements"]
//! category = "Keyword.Type"
//! words = ["S8", "S16"]
//! ```

use crate::lexer::{Lexer, LexerInfo};
use crate::logging::codes;
use crate::rules::{GrammarBuilder, GrammarError, StateEntry, Vocabulary, ROOT_STATE};
use crate::tokens::TokenCategory;
use crate::{log_error, log_success};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// States an extension rule goes into when none are listed
pub const DEFAULT_CONTEXTS: [&str; 2] = [ROOT_STATE, "statements"];

#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    #[error("Invalid extension definition: {message}")]
    Parse { message: String },

    #[error("Cannot read extension file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Unknown token category '{category}'")]
    UnknownCategory { category: String },

    #[error("Unknown base lexer '{base}'")]
    UnknownBase { base: String },

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl ExtensionError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ExtensionError::Parse { .. } => codes::extension::PARSE_FAILURE,
            ExtensionError::Io { .. } => codes::extension::READ_FAILURE,
            ExtensionError::UnknownCategory { .. } => codes::extension::UNKNOWN_CATEGORY,
            ExtensionError::UnknownBase { .. } => codes::extension::UNKNOWN_BASE_LEXER,
            ExtensionError::Grammar(error) => error.error_code(),
        }
    }
}

/// One vocabulary and the states it is prepended into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRule {
    pub contexts: Vec<String>,
    pub vocabulary: Vocabulary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    tag: Option<String>,
    base: String,
    rules: Vec<ExtensionRule>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExtension {
    tag: Option<String>,
    #[serde(default = "default_base")]
    base: String,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    #[serde(default = "default_contexts")]
    contexts: Vec<String>,
    category: String,
    words: Vec<String>,
}

fn default_base() -> String {
    crate::languages::CPP_TAG.to_string()
}

fn default_contexts() -> Vec<String> {
    DEFAULT_CONTEXTS.iter().map(|c| c.to_string()).collect()
}

impl Extension {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            tag: None,
            base: base.into(),
            rules: Vec::new(),
        }
    }

    /// Register the extended lexer under a different tag than the base
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Add a rule for the given states, after the rules added so far
    pub fn rule<I, S>(mut self, contexts: &[&str], category: TokenCategory, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.push(ExtensionRule {
            contexts: contexts.iter().map(|c| c.to_string()).collect(),
            vocabulary: Vocabulary::new(category, words),
        });
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Tag of the extended lexer; the base tag unless overridden
    pub fn tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(&self.base)
    }

    pub fn rules(&self) -> &[ExtensionRule] {
        &self.rules
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ExtensionError> {
        let raw: RawExtension = toml::from_str(content).map_err(|e| {
            let error = ExtensionError::Parse {
                message: e.to_string(),
            };
            log_error!(error.error_code(), "Failed to parse extension definition",
                "error" => e.message()
            );
            error
        })?;

        let mut rules = Vec::with_capacity(raw.rules.len());
        for rule in raw.rules {
            let category: TokenCategory = rule.category.parse().map_err(|_| {
                let error = ExtensionError::UnknownCategory {
                    category: rule.category.clone(),
                };
                log_error!(error.error_code(), "Extension names an unknown token category",
                    "category" => rule.category
                );
                error
            })?;
            rules.push(ExtensionRule {
                contexts: rule.contexts,
                vocabulary: Vocabulary::new(category, rule.words),
            });
        }

        Ok(Self {
            tag: raw.tag,
            base: raw.base,
            rules,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExtensionError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            let error = ExtensionError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            };
            log_error!(error.error_code(), "Failed to read extension file",
                "path" => path.display(),
                "io_error" => e
            );
            error
        })?;
        Self::from_toml_str(&content)
    }

    /// Prepend every rule into its states.
    ///
    /// Rules for one state go in as a single block in declaration order, so
    /// the first declared rule is the first one tried.
    pub fn apply(&self, definition: &mut GrammarBuilder) -> Result<(), ExtensionError> {
        Ok(self.prepend_into(definition)?)
    }

    fn prepend_into(&self, definition: &mut GrammarBuilder) -> Result<(), GrammarError> {
        let mut blocks: Vec<(&str, Vec<StateEntry>)> = Vec::new();

        for rule in &self.rules {
            let compiled = rule.vocabulary.to_rule()?;
            for context in &rule.contexts {
                let entry = StateEntry::from(compiled.clone());
                match blocks.iter_mut().find(|(state, _)| *state == context.as_str()) {
                    Some((_, entries)) => entries.push(entry),
                    None => blocks.push((context.as_str(), vec![entry])),
                }
            }
        }

        for (state, entries) in blocks {
            definition.prepend(state, entries)?;
        }
        Ok(())
    }

    /// Derive the extended lexer from `base`
    pub fn extend(&self, base: &Lexer) -> Result<Lexer, ExtensionError> {
        if !base.info().answers_to(&self.base) {
            let error = ExtensionError::UnknownBase {
                base: self.base.clone(),
            };
            log_error!(error.error_code(), "Extension applied to the wrong base lexer",
                "expected" => self.base,
                "found" => base.tag()
            );
            return Err(error);
        }

        let mut info: LexerInfo = base.info().clone();
        info.tag = self.tag().to_string();
        if info.tag != base.tag() {
            info.aliases.clear();
        }

        let lexer = base.derive(info, |definition| self.prepend_into(definition))?;

        log_success!(codes::success::EXTENSION_APPLIED, "Extension applied",
            "base" => base.tag(),
            "tag" => lexer.tag(),
            "rules" => self.rules.len()
        );
        Ok(lexer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::c_family;
    use assert_matches::assert_matches;
    use std::io::Write;

    const HANDLES: &str = r#"
        base = "cpp"
        tag = "cpp-handles"

        [[rules]]
        category = "Name.Class"
        words = ["Handle", "FooHandle"]

        [[rules]]
        contexts = ["statements"]
        category = "Name.Function"
        words = ["createResource"]
    "#;

    #[test]
    fn test_parse_toml() {
        let extension = Extension::from_toml_str(HANDLES).unwrap();
        assert_eq!(extension.base(), "cpp");
        assert_eq!(extension.tag(), "cpp-handles");
        assert_eq!(extension.rules().len(), 2);
        assert_eq!(extension.rules()[0].contexts, vec!["root", "statements"]);
        assert_eq!(extension.rules()[1].contexts, vec!["statements"]);
        assert_eq!(
            extension.rules()[1].vocabulary.category,
            TokenCategory::NameFunction
        );
    }

    #[test]
    fn test_tag_defaults_to_base() {
        let extension = Extension::from_toml_str(
            "[[rules]]\ncategory = \"Keyword.Type\"\nwords = [\"U8\"]\n",
        )
        .unwrap();
        assert_eq!(extension.base(), "cpp");
        assert_eq!(extension.tag(), "cpp");
    }

    #[test]
    fn test_parse_errors() {
        assert_matches!(
            Extension::from_toml_str("rules = 3"),
            Err(ExtensionError::Parse { .. })
        );
        assert_matches!(
            Extension::from_toml_str("[[rules]]\ncategory = \"Keyword.Kind\"\nwords = [\"x\"]\n"),
            Err(ExtensionError::UnknownCategory { category }) if category == "Keyword.Kind"
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HANDLES.as_bytes()).unwrap();

        let extension = Extension::from_file(file.path()).unwrap();
        assert_eq!(extension.tag(), "cpp-handles");

        assert_matches!(
            Extension::from_file("/nonexistent/extension.toml"),
            Err(ExtensionError::Io { .. })
        );
    }

    #[test]
    fn test_apply_prepends_block_in_order() {
        let extension = Extension::new("cpp")
            .rule(&["root"], TokenCategory::KeywordType, ["U8"])
            .rule(&["root"], TokenCategory::NameClass, ["Span"]);

        let mut definition = c_family::cpp_grammar();
        extension.apply(&mut definition).unwrap();
        let grammar = definition.build().unwrap();
        let patterns = grammar.patterns("root").unwrap();

        assert_eq!(patterns[0], r"\b(?:U8)\b");
        assert_eq!(patterns[1], r"\b(?:Span)\b");
    }

    #[test]
    fn test_apply_unknown_state() {
        let extension =
            Extension::new("cpp").rule(&["statement"], TokenCategory::KeywordType, ["U8"]);
        let mut definition = c_family::cpp_grammar();
        assert_matches!(
            extension.apply(&mut definition),
            Err(ExtensionError::Grammar(GrammarError::UnknownState { .. }))
        );
    }

    #[test]
    fn test_extend_checks_base() {
        let c = c_family::c_lexer().unwrap();
        let extension = Extension::new("cpp").rule(&["root"], TokenCategory::KeywordType, ["U8"]);
        assert_matches!(extension.extend(&c), Err(ExtensionError::UnknownBase { .. }));
    }

    #[test]
    fn test_extend_under_new_tag() {
        let base = c_family::cpp_lexer().unwrap();
        let extended = Extension::from_toml_str(HANDLES)
            .unwrap()
            .extend(&base)
            .unwrap();

        assert_eq!(extended.tag(), "cpp-handles");
        assert!(extended.info().aliases.is_empty());
        assert_eq!(
            extended.tokenize("Handle h;").category_of("Handle"),
            Some(TokenCategory::NameClass)
        );
        assert_eq!(
            base.tokenize("Handle h;").category_of("Handle"),
            Some(TokenCategory::Name)
        );
    }
}
