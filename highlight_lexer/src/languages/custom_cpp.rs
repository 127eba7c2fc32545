//! C++ with the engine's own vocabulary: sized scalar and vector types,
//! memory arena and resource handle classes, and their common methods.
//!
//! Registered under `cpp`, so it replaces the plain C++ lexer once added to
//! a registry after it.

use super::c_family::{self, CPP_TAG};
use crate::extension::{Extension, ExtensionError, DEFAULT_CONTEXTS};
use crate::lexer::Lexer;
use crate::tokens::TokenCategory;

/// Vocabulary groups, in the order they are tried
pub const VOCABULARY: &[(TokenCategory, &[&str])] = &[
    (TokenCategory::KeywordType, &["S8", "S16", "S32", "S64"]),
    (TokenCategory::KeywordType, &["U8", "U16", "U32", "U64"]),
    (TokenCategory::KeywordType, &["Float", "Double"]),
    (TokenCategory::KeywordType, &["float2", "float3", "float4"]),
    (TokenCategory::KeywordType, &["vec2", "vec3", "vec4"]),
    (
        TokenCategory::NameClass,
        &["Flags", "Flag", "Span", "T", "Node", "Type", "Chunk"],
    ),
    (
        TokenCategory::NameClass,
        &[
            "MemoryArenaFlag",
            "MemoryArena",
            "FixedMemoryArena",
            "VirtualMemoryArena",
            "ScopedMemoryArena",
            "MemoryArenaVector",
            "MemoryArenaDeque",
            "MemoryArenaPool",
        ],
    ),
    (
        TokenCategory::NameClass,
        &[
            "Handle",
            "TResourceHandle",
            "ResourceHandle32",
            "ResourceHandle64",
            "ResourceHandleManager",
            "HandleContainer",
            "ResourceContainer",
            "Foo",
            "FooHandle",
        ],
    ),
    (
        TokenCategory::NameFunction,
        &["init", "allocate", "beg", "end", "ptr", "rewind", "reset", "free", "growable"],
    ),
    (
        TokenCategory::NameFunction,
        &["printf", "push_back", "pop_back", "push_front", "pop_front", "clear"],
    ),
    (
        TokenCategory::NameFunction,
        &["createResource", "getResource", "destroyResource"],
    ),
    (TokenCategory::KeywordType, &["K_ASSERT", "K_ASSERT_CONDITION"]),
];

/// The built-in vocabulary as an extension of `cpp`
pub fn extension() -> Extension {
    VOCABULARY
        .iter()
        .fold(Extension::new(CPP_TAG), |extension, (category, words)| {
            extension.rule(&DEFAULT_CONTEXTS, *category, words.iter().copied())
        })
}

/// Plain C++ lexer with the built-in vocabulary applied
pub fn lexer() -> Result<Lexer, ExtensionError> {
    extension().extend(&c_family::cpp_lexer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_shape() {
        let extension = extension();
        assert_eq!(extension.tag(), "cpp");
        assert_eq!(extension.rules().len(), 12);
        assert!(extension
            .rules()
            .iter()
            .all(|rule| rule.contexts == vec!["root", "statements"]));
    }

    #[test]
    fn test_rules_lead_both_contexts_in_order() {
        let lexer = lexer().unwrap();
        for state in ["root", "statements"] {
            let patterns = lexer.grammar().patterns(state).unwrap();
            assert_eq!(patterns[0], r"\b(?:S8|S16|S32|S64)\b");
            assert_eq!(patterns[5], r"\b(?:Flags|Flag|Span|T|Node|Type|Chunk)\b");
            assert_eq!(patterns[11], r"\b(?:K_ASSERT|K_ASSERT_CONDITION)\b");
        }
    }

    #[test]
    fn test_registered_under_cpp() {
        let lexer = lexer().unwrap();
        assert_eq!(lexer.tag(), "cpp");
        assert!(lexer.info().matches_filename("arena.hpp"));
    }
}
