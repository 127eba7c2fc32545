//! C and C++ grammars
//!
//! States:
//! - `whitespace`: blanks, comments, preprocessor lines, `#if 0` blocks
//! - `statements`: literals, operators, declarations, identifiers
//! - `root`: top-level code; a declarator at the start of a line followed by
//!   `(` names a function
//! - `string`, `macro`, `if_0`: pushed from the above
//!
//! `root` and `statements` are the states vocabulary extensions prepend into.

use crate::lexer::{Lexer, LexerInfo};
use crate::rules::{include, GrammarBuilder, GrammarError, GroupAction, KeywordTable, RuleDef, ROOT_STATE};
use crate::tokens::TokenCategory;
use std::sync::Arc;

pub const C_TAG: &str = "c";
pub const CPP_TAG: &str = "cpp";

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "const", "continue", "default", "do", "else", "enum", "extern",
    "for", "goto", "if", "register", "restrict", "return", "sizeof", "static", "struct",
    "switch", "typedef", "union", "volatile", "while", "inline", "_Alignas", "_Alignof",
    "_Atomic", "_Generic", "_Noreturn", "_Static_assert", "_Thread_local",
];

const C_TYPES: &[&str] = &[
    "int", "long", "float", "short", "double", "char", "unsigned", "signed", "void", "bool",
    "_Bool", "_Complex", "_Imaginary", "size_t", "ssize_t", "ptrdiff_t", "intptr_t",
    "uintptr_t", "intmax_t", "uintmax_t", "int8_t", "int16_t", "int32_t", "int64_t",
    "uint8_t", "uint16_t", "uint32_t", "uint64_t", "wchar_t", "va_list", "FILE",
];

const C_RESERVED: &[&str] = &[
    "__asm", "__int8", "__based", "__except", "__int16", "__stdcall", "__cdecl", "__fastcall",
    "__int32", "__declspec", "__finally", "__int64", "__try", "__leave", "__inline",
    "_inline", "__restrict", "_restrict", "__thread", "__attribute__", "__typeof__",
    "__volatile__", "__asm__", "__extension__",
];

const C_CONSTANTS: &[&str] = &["true", "false"];

const C_BUILTINS: &[&str] = &[
    "NULL", "__FILE__", "__LINE__", "__DATE__", "__TIME__", "__func__", "__FUNCTION__",
    "__PRETTY_FUNCTION__", "stdin", "stdout", "stderr", "errno",
];

const CPP_KEYWORDS: &[&str] = &[
    "asm", "catch", "class", "const_cast", "delete", "dynamic_cast", "explicit", "export",
    "friend", "mutable", "namespace", "new", "operator", "private", "protected", "public",
    "reinterpret_cast", "static_cast", "template", "this", "throw", "try", "typeid",
    "typename", "using", "virtual", "alignas", "alignof", "constexpr", "consteval",
    "constinit", "decltype", "noexcept", "static_assert", "thread_local", "co_await",
    "co_return", "co_yield", "concept", "requires", "final", "override", "and", "and_eq",
    "bitand", "bitor", "compl", "not", "not_eq", "or", "or_eq", "xor", "xor_eq",
];

const CPP_TYPES: &[&str] = &["char8_t", "char16_t", "char32_t", "nullptr_t"];

const CPP_CONSTANTS: &[&str] = &["nullptr"];

const OPERATORS: &str = r"<<=|>>=|<=>|->\*|->|\+\+|--|<<|>>|<=|>=|==|!=|&&|\|\||\+=|-=|\*=|/=|%=|&=|\|=|\^=|::|\.\*|\.\.\.|[-+*/%&|^~!<>=?:]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    C,
    Cpp,
}

fn keyword_table(dialect: Dialect) -> KeywordTable {
    let table = KeywordTable::new(TokenCategory::Name)
        .with(TokenCategory::Keyword, C_KEYWORDS)
        .with(TokenCategory::KeywordType, C_TYPES)
        .with(TokenCategory::KeywordReserved, C_RESERVED)
        .with(TokenCategory::KeywordConstant, C_CONSTANTS)
        .with(TokenCategory::NameBuiltin, C_BUILTINS);

    match dialect {
        Dialect::C => table,
        Dialect::Cpp => table
            .with(TokenCategory::Keyword, CPP_KEYWORDS)
            .with(TokenCategory::KeywordType, CPP_TYPES)
            .with(TokenCategory::KeywordConstant, CPP_CONSTANTS),
    }
}

fn whitespace_state() -> Vec<crate::rules::StateEntry> {
    vec![
        RuleDef::token(r"(?m)^[ \t]*#[ \t]*if[ \t]+0\b", TokenCategory::CommentPreproc)
            .push("if_0")
            .into(),
        RuleDef::token(r"(?m)^[ \t]*#", TokenCategory::CommentPreproc)
            .push("macro")
            .into(),
        RuleDef::token(r"\r?\n", TokenCategory::Whitespace).into(),
        RuleDef::token(r"[^\S\n]+", TokenCategory::Whitespace).into(),
        RuleDef::token(r"\\\r?\n", TokenCategory::Text).into(),
        RuleDef::token(r"//(?:\\\r?\n|[^\n])*", TokenCategory::CommentSingle).into(),
        RuleDef::token(r"/\*(?s:.)*?\*/", TokenCategory::CommentMultiline).into(),
        // unterminated block comment runs to the end of input
        RuleDef::token(r"/\*(?s:.)*", TokenCategory::CommentMultiline).into(),
    ]
}

fn if_0_state() -> Vec<crate::rules::StateEntry> {
    vec![
        RuleDef::token(r"(?m)^[ \t]*#[ \t]*if[^\n]*\n?", TokenCategory::CommentPreproc)
            .push("if_0")
            .into(),
        RuleDef::token(r"(?m)^[ \t]*#[ \t]*el(?:se|if)[^\n]*\n?", TokenCategory::CommentPreproc)
            .pop()
            .into(),
        RuleDef::token(r"(?m)^[ \t]*#[ \t]*endif[^\n]*\n?", TokenCategory::CommentPreproc)
            .pop()
            .into(),
        RuleDef::token(r"[^\n]*\n", TokenCategory::Comment).into(),
        RuleDef::token(r"[^\n]+", TokenCategory::Comment).into(),
    ]
}

fn macro_state() -> Vec<crate::rules::StateEntry> {
    vec![
        RuleDef::groups(
            r#"([ \t]*)(include|include_next|import)([ \t]*)(<[^>\n]*>|"[^"\n]*")"#,
            vec![
                GroupAction::Token(TokenCategory::Whitespace),
                GroupAction::Token(TokenCategory::CommentPreproc),
                GroupAction::Token(TokenCategory::Whitespace),
                GroupAction::Token(TokenCategory::CommentPreprocFile),
            ],
        )
        .into(),
        RuleDef::token(r"[^/\n\\]+", TokenCategory::CommentPreproc).into(),
        RuleDef::token(r"\\(?:\r?\n|.)?", TokenCategory::CommentPreproc).into(),
        RuleDef::token(r"//[^\n]*", TokenCategory::CommentSingle).into(),
        RuleDef::token(r"/\*(?s:.)*?\*/", TokenCategory::CommentMultiline).into(),
        RuleDef::token(r"/", TokenCategory::CommentPreproc).into(),
        RuleDef::token(r"\n", TokenCategory::Whitespace).pop().into(),
    ]
}

fn string_state() -> Vec<crate::rules::StateEntry> {
    vec![
        RuleDef::token("\"", TokenCategory::String).pop().into(),
        RuleDef::token(
            r#"\\(?:[\\abfnrtv"'?]|x[0-9A-Fa-f]+|[0-7]{1,3}|u[0-9A-Fa-f]{4}|U[0-9A-Fa-f]{8}|\r?\n)"#,
            TokenCategory::StringEscape,
        )
        .into(),
        RuleDef::token(r#"[^\\"\n]+"#, TokenCategory::String).into(),
        RuleDef::token(r"\\", TokenCategory::String).into(),
        // an unterminated string ends at the line break
        RuleDef::token(r"\n", TokenCategory::Whitespace).pop().into(),
    ]
}

fn statements_state(dialect: Dialect, table: &Arc<KeywordTable>) -> Vec<crate::rules::StateEntry> {
    let mut entries = vec![include("whitespace")];

    if dialect == Dialect::Cpp {
        // no backreferences: a delimited raw string closes at the first `)delim"`
        entries.push(RuleDef::token(r#"(?:u8|u|U|L)?R"\((?s:.)*?\)""#, TokenCategory::String).into());
        entries.push(
            RuleDef::token(
                r#"(?:u8|u|U|L)?R"[^(\s\\"]{1,16}\((?s:.)*?\)[^)\s\\"]{1,16}""#,
                TokenCategory::String,
            )
            .into(),
        );
    }

    entries.extend([
        RuleDef::token(r#"(?:u8|u|U|L)?""#, TokenCategory::String)
            .push("string")
            .into(),
        RuleDef::token(
            r"(?:u8|u|U|L)?'(?:\\(?:x[0-9A-Fa-f]+|[0-7]{1,3}|[^\n])|[^\\'\n])+'",
            TokenCategory::StringChar,
        )
        .into(),
        RuleDef::token(r"0[xX][0-9A-Fa-f']+[uUlLzZ]*", TokenCategory::NumberHex).into(),
        RuleDef::token(r"0[bB][01']+[uUlLzZ]*", TokenCategory::NumberBin).into(),
        RuleDef::token(
            r"(?:(?:\d[\d']*)?\.\d[\d']*|\d[\d']*\.)(?:[eE][+-]?\d+)?[fFlL]?",
            TokenCategory::NumberFloat,
        )
        .into(),
        RuleDef::token(r"\d[\d']*[eE][+-]?\d+[fFlL]?", TokenCategory::NumberFloat).into(),
        RuleDef::token(r"0[0-7']+[uUlLzZ]*", TokenCategory::NumberOct).into(),
        RuleDef::token(r"\d[\d']*[uUlLzZ]*", TokenCategory::NumberInteger).into(),
        RuleDef::token(r"\*/", TokenCategory::Error).into(),
        RuleDef::token(OPERATORS, TokenCategory::Operator).into(),
        RuleDef::token(r"[()\[\]{},.;]", TokenCategory::Punctuation).into(),
    ]);

    if dialect == Dialect::Cpp {
        entries.push(
            RuleDef::groups(
                r"(enum)(\s+)(class|struct)(\s+)([A-Za-z_]\w*)",
                vec![
                    GroupAction::Token(TokenCategory::Keyword),
                    GroupAction::Token(TokenCategory::Whitespace),
                    GroupAction::Token(TokenCategory::Keyword),
                    GroupAction::Token(TokenCategory::Whitespace),
                    GroupAction::Token(TokenCategory::NameClass),
                ],
            )
            .into(),
        );
        entries.push(
            RuleDef::groups(
                r"(namespace)(\s+)([A-Za-z_][\w:]*)",
                vec![
                    GroupAction::Token(TokenCategory::Keyword),
                    GroupAction::Token(TokenCategory::Whitespace),
                    GroupAction::Token(TokenCategory::NameNamespace),
                ],
            )
            .into(),
        );
    }

    let declaration = match dialect {
        Dialect::C => r"(struct|union|enum)(\s+)([A-Za-z_]\w*)",
        Dialect::Cpp => r"(class|struct|union|enum)(\s+)([A-Za-z_]\w*)",
    };
    entries.push(
        RuleDef::groups(
            declaration,
            vec![
                GroupAction::Token(TokenCategory::Keyword),
                GroupAction::Token(TokenCategory::Whitespace),
                GroupAction::Token(TokenCategory::NameClass),
            ],
        )
        .into(),
    );

    entries.push(RuleDef::keywords(r"[A-Za-z_]\w*", Arc::clone(table)).into());
    entries
}

fn root_state(table: &Arc<KeywordTable>) -> Vec<crate::rules::StateEntry> {
    let function_names = Arc::new(table.with_fallback(TokenCategory::NameFunction));
    vec![
        include("whitespace"),
        RuleDef::groups(
            r"(?m)^((?:[A-Za-z_][\w:<>]*[ \t*&]+)+?)([A-Za-z_][\w:~]*)([ \t]*)(\()",
            vec![
                GroupAction::Lex("statements".to_string()),
                GroupAction::Keywords(function_names),
                GroupAction::Token(TokenCategory::Whitespace),
                GroupAction::Token(TokenCategory::Punctuation),
            ],
        )
        .into(),
        include("statements"),
    ]
}

fn grammar(name: &str, dialect: Dialect) -> GrammarBuilder {
    let table = Arc::new(keyword_table(dialect));
    GrammarBuilder::new(name)
        .state("whitespace", whitespace_state())
        .state("if_0", if_0_state())
        .state("macro", macro_state())
        .state("string", string_state())
        .state("statements", statements_state(dialect, &table))
        .state(ROOT_STATE, root_state(&table))
}

/// Uncompiled C grammar
pub fn c_grammar() -> GrammarBuilder {
    grammar(C_TAG, Dialect::C)
}

/// Uncompiled C++ grammar
pub fn cpp_grammar() -> GrammarBuilder {
    grammar(CPP_TAG, Dialect::Cpp)
}

pub fn c_lexer() -> Result<Lexer, GrammarError> {
    let info = LexerInfo::new(C_TAG, "C")
        .with_description("The C programming language")
        .with_filenames(&["*.c", "*.h", "*.idc"])
        .with_mimetypes(&["text/x-chdr", "text/x-csrc", "image/x-xbitmap"]);
    Lexer::new(info, c_grammar())
}

pub fn cpp_lexer() -> Result<Lexer, GrammarError> {
    let info = LexerInfo::new(CPP_TAG, "C++")
        .with_description("The C++ programming language")
        .with_aliases(&["c++"])
        .with_filenames(&[
            "*.cpp", "*.hpp", "*.c++", "*.h++", "*.cc", "*.hh", "*.cxx", "*.hxx", "*.pde",
            "*.ino", "*.tpp", "*.h", "*.inl", "*.ipp",
        ])
        .with_mimetypes(&["text/x-c++hdr", "text/x-c++src"]);
    Lexer::new(info, cpp_grammar())
}
