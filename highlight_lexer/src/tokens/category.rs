//! Hierarchical token categories
//!
//! Each category has a dotted qualified name (`Keyword.Type`), the short CSS
//! class used by site stylesheets (`kt`), and a parent category.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenCategory {
    Text,
    Whitespace,
    Error,

    Comment,
    CommentSingle,
    CommentMultiline,
    CommentPreproc,
    CommentPreprocFile,

    Keyword,
    KeywordConstant,
    KeywordReserved,
    KeywordType,

    Name,
    NameBuiltin,
    NameClass,
    NameFunction,
    NameNamespace,

    Literal,
    String,
    StringChar,
    StringEscape,
    Number,
    NumberFloat,
    NumberHex,
    NumberOct,
    NumberBin,
    NumberInteger,

    Operator,
    Punctuation,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 29] = [
        TokenCategory::Text,
        TokenCategory::Whitespace,
        TokenCategory::Error,
        TokenCategory::Comment,
        TokenCategory::CommentSingle,
        TokenCategory::CommentMultiline,
        TokenCategory::CommentPreproc,
        TokenCategory::CommentPreprocFile,
        TokenCategory::Keyword,
        TokenCategory::KeywordConstant,
        TokenCategory::KeywordReserved,
        TokenCategory::KeywordType,
        TokenCategory::Name,
        TokenCategory::NameBuiltin,
        TokenCategory::NameClass,
        TokenCategory::NameFunction,
        TokenCategory::NameNamespace,
        TokenCategory::Literal,
        TokenCategory::String,
        TokenCategory::StringChar,
        TokenCategory::StringEscape,
        TokenCategory::Number,
        TokenCategory::NumberFloat,
        TokenCategory::NumberHex,
        TokenCategory::NumberOct,
        TokenCategory::NumberBin,
        TokenCategory::NumberInteger,
        TokenCategory::Operator,
        TokenCategory::Punctuation,
    ];

    pub fn qualified_name(&self) -> &'static str {
        match self {
            TokenCategory::Text => "Text",
            TokenCategory::Whitespace => "Text.Whitespace",
            TokenCategory::Error => "Error",
            TokenCategory::Comment => "Comment",
            TokenCategory::CommentSingle => "Comment.Single",
            TokenCategory::CommentMultiline => "Comment.Multiline",
            TokenCategory::CommentPreproc => "Comment.Preproc",
            TokenCategory::CommentPreprocFile => "Comment.PreprocFile",
            TokenCategory::Keyword => "Keyword",
            TokenCategory::KeywordConstant => "Keyword.Constant",
            TokenCategory::KeywordReserved => "Keyword.Reserved",
            TokenCategory::KeywordType => "Keyword.Type",
            TokenCategory::Name => "Name",
            TokenCategory::NameBuiltin => "Name.Builtin",
            TokenCategory::NameClass => "Name.Class",
            TokenCategory::NameFunction => "Name.Function",
            TokenCategory::NameNamespace => "Name.Namespace",
            TokenCategory::Literal => "Literal",
            TokenCategory::String => "Literal.String",
            TokenCategory::StringChar => "Literal.String.Char",
            TokenCategory::StringEscape => "Literal.String.Escape",
            TokenCategory::Number => "Literal.Number",
            TokenCategory::NumberFloat => "Literal.Number.Float",
            TokenCategory::NumberHex => "Literal.Number.Hex",
            TokenCategory::NumberOct => "Literal.Number.Oct",
            TokenCategory::NumberBin => "Literal.Number.Bin",
            TokenCategory::NumberInteger => "Literal.Number.Integer",
            TokenCategory::Operator => "Operator",
            TokenCategory::Punctuation => "Punctuation",
        }
    }

    /// Short class emitted in HTML; empty for plain text
    pub fn css_class(&self) -> &'static str {
        match self {
            TokenCategory::Text => "",
            TokenCategory::Whitespace => "w",
            TokenCategory::Error => "err",
            TokenCategory::Comment => "c",
            TokenCategory::CommentSingle => "c1",
            TokenCategory::CommentMultiline => "cm",
            TokenCategory::CommentPreproc => "cp",
            TokenCategory::CommentPreprocFile => "cpf",
            TokenCategory::Keyword => "k",
            TokenCategory::KeywordConstant => "kc",
            TokenCategory::KeywordReserved => "kr",
            TokenCategory::KeywordType => "kt",
            TokenCategory::Name => "n",
            TokenCategory::NameBuiltin => "nb",
            TokenCategory::NameClass => "nc",
            TokenCategory::NameFunction => "nf",
            TokenCategory::NameNamespace => "nn",
            TokenCategory::Literal => "l",
            TokenCategory::String => "s",
            TokenCategory::StringChar => "sc",
            TokenCategory::StringEscape => "se",
            TokenCategory::Number => "m",
            TokenCategory::NumberFloat => "mf",
            TokenCategory::NumberHex => "mh",
            TokenCategory::NumberOct => "mo",
            TokenCategory::NumberBin => "mb",
            TokenCategory::NumberInteger => "mi",
            TokenCategory::Operator => "o",
            TokenCategory::Punctuation => "p",
        }
    }

    pub fn parent(&self) -> Option<TokenCategory> {
        match self {
            TokenCategory::Text
            | TokenCategory::Error
            | TokenCategory::Comment
            | TokenCategory::Keyword
            | TokenCategory::Name
            | TokenCategory::Literal
            | TokenCategory::Operator
            | TokenCategory::Punctuation => None,
            TokenCategory::Whitespace => Some(TokenCategory::Text),
            TokenCategory::CommentSingle
            | TokenCategory::CommentMultiline
            | TokenCategory::CommentPreproc => Some(TokenCategory::Comment),
            TokenCategory::CommentPreprocFile => Some(TokenCategory::CommentPreproc),
            TokenCategory::KeywordConstant
            | TokenCategory::KeywordReserved
            | TokenCategory::KeywordType => Some(TokenCategory::Keyword),
            TokenCategory::NameBuiltin
            | TokenCategory::NameClass
            | TokenCategory::NameFunction
            | TokenCategory::NameNamespace => Some(TokenCategory::Name),
            TokenCategory::String | TokenCategory::Number => Some(TokenCategory::Literal),
            TokenCategory::StringChar | TokenCategory::StringEscape => {
                Some(TokenCategory::String)
            }
            TokenCategory::NumberFloat
            | TokenCategory::NumberHex
            | TokenCategory::NumberOct
            | TokenCategory::NumberBin
            | TokenCategory::NumberInteger => Some(TokenCategory::Number),
        }
    }

    /// True when `self` is `ancestor` or lies below it in the hierarchy
    pub fn is_within(&self, ancestor: TokenCategory) -> bool {
        let mut current = Some(*self);
        while let Some(category) = current {
            if category == ancestor {
                return true;
            }
            current = category.parent();
        }
        false
    }

    /// Top-level category this one descends from
    pub fn root(&self) -> TokenCategory {
        let mut category = *self;
        while let Some(parent) = category.parent() {
            category = parent;
        }
        category
    }

    /// Categories written without a wrapping `<span>`
    pub fn is_plain(&self) -> bool {
        matches!(self, TokenCategory::Text)
    }

    pub fn from_css_class(class: &str) -> Option<TokenCategory> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.css_class() == class)
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown token category '{0}'")]
pub struct UnknownCategory(pub std::string::String);

impl FromStr for TokenCategory {
    type Err = UnknownCategory;

    /// Accepts qualified names, with or without the `Literal.` prefix for
    /// strings and numbers (`String.Char`, `Number.Hex`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let qualified = if trimmed.starts_with("String") || trimmed.starts_with("Number") {
            format!("Literal.{}", trimmed)
        } else {
            trimmed.to_string()
        };

        Self::ALL
            .iter()
            .copied()
            .find(|category| category.qualified_name() == qualified)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for TokenCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.qualified_name())
    }
}

impl<'de> Deserialize<'de> for TokenCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = std::string::String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
