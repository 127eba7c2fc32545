//! Consolidated log codes and classification system
//!
//! Single source of truth for every code the workspace logs, together with its
//! behavioral metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const UNKNOWN_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Grammar construction error codes
pub mod grammar {
    use super::Code;

    pub const INVALID_PATTERN: Code = Code::new("E020");
    pub const ZERO_WIDTH_PATTERN: Code = Code::new("E021");
    pub const UNKNOWN_STATE: Code = Code::new("E022");
    pub const INCLUDE_CYCLE: Code = Code::new("E023");
    pub const EMPTY_VOCABULARY: Code = Code::new("E024");
    pub const MISSING_ROOT_STATE: Code = Code::new("E025");
    pub const VOCABULARY_TOO_LARGE: Code = Code::new("E026");
}

/// Scanning warning codes (scanning never fails; these mark degraded output)
pub mod lexical {
    use super::Code;

    pub const TOKEN_LIMIT_REACHED: Code = Code::new("W030");
    pub const STATE_DEPTH_EXCEEDED: Code = Code::new("W031");
    pub const UNMATCHED_INPUT: Code = Code::new("W032");
}

/// Extension loading error codes
pub mod extension {
    use super::Code;

    pub const PARSE_FAILURE: Code = Code::new("E040");
    pub const UNKNOWN_CATEGORY: Code = Code::new("E041");
    pub const UNKNOWN_BASE_LEXER: Code = Code::new("E042");
    pub const READ_FAILURE: Code = Code::new("E043");
}

/// Lexer registry codes
pub mod registry {
    use super::Code;

    pub const UNKNOWN_TAG: Code = Code::new("W050");
    pub const TAG_REPLACED: Code = Code::new("W051");
    pub const INVALID_FILENAME_PATTERN: Code = Code::new("W052");
}

/// Rendering error codes
pub mod render {
    use super::Code;

    pub const SERIALIZATION_FAILURE: Code = Code::new("E060");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const GRAMMAR_COMPILED: Code = Code::new("I021");
    pub const EXTENSION_APPLIED: Code = Code::new("I040");
    pub const LEXER_REGISTERED: Code = Code::new("I050");
    pub const RENDER_COMPLETE: Code = Code::new("I060");
    pub const DISCLOSURE_TOGGLED: Code = Code::new("I070");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the failing input",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failure",
                "Check configuration and environment variables",
            ),
            // File processing errors
            ErrorMetadata::new(
                "E005",
                "FileProcessing",
                Severity::High,
                true,
                false,
                "Source file not found",
                "Check the file path",
            ),
            ErrorMetadata::new(
                "E006",
                "FileProcessing",
                Severity::Low,
                true,
                false,
                "No registered lexer claims this file extension",
                "Pass --lang explicitly or register a lexer for the extension",
            ),
            ErrorMetadata::new(
                "E007",
                "FileProcessing",
                Severity::High,
                true,
                false,
                "Source file exceeds the compile-time size limit",
                "Split the file or rebuild with a larger limit profile",
            ),
            ErrorMetadata::new(
                "E008",
                "FileProcessing",
                Severity::Low,
                true,
                false,
                "Source file is empty",
                "Provide content in the source file",
            ),
            ErrorMetadata::new(
                "E009",
                "FileProcessing",
                Severity::High,
                true,
                false,
                "Permission denied while reading source file",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                "E010",
                "FileProcessing",
                Severity::Medium,
                true,
                false,
                "Source file is not valid UTF-8",
                "Convert the file to UTF-8",
            ),
            ErrorMetadata::new(
                "E011",
                "FileProcessing",
                Severity::High,
                true,
                false,
                "I/O error while reading source file",
                "Check the file system and retry",
            ),
            ErrorMetadata::new(
                "E012",
                "FileProcessing",
                Severity::Medium,
                true,
                false,
                "Invalid source path",
                "Provide a path to a regular file",
            ),
            // Grammar errors
            ErrorMetadata::new(
                "E020",
                "Grammar",
                Severity::High,
                false,
                true,
                "Rule pattern is not a valid regular expression",
                "Fix the pattern syntax",
            ),
            ErrorMetadata::new(
                "E021",
                "Grammar",
                Severity::High,
                false,
                true,
                "Rule pattern can match empty input",
                "Make the pattern consume at least one character",
            ),
            ErrorMetadata::new(
                "E022",
                "Grammar",
                Severity::High,
                false,
                true,
                "Rule refers to an undeclared state",
                "Declare the state or fix the state name",
            ),
            ErrorMetadata::new(
                "E023",
                "Grammar",
                Severity::High,
                false,
                true,
                "State includes form a cycle",
                "Remove the circular include",
            ),
            ErrorMetadata::new(
                "E024",
                "Grammar",
                Severity::Medium,
                false,
                true,
                "Vocabulary rule has no words",
                "List at least one word in the rule",
            ),
            ErrorMetadata::new(
                "E025",
                "Grammar",
                Severity::High,
                false,
                true,
                "Grammar has no root state",
                "Declare a root state",
            ),
            ErrorMetadata::new(
                "E026",
                "Grammar",
                Severity::Medium,
                false,
                true,
                "Vocabulary or pattern exceeds compile-time limits",
                "Split the vocabulary into several rules",
            ),
            // Scanning warnings
            ErrorMetadata::new(
                "W030",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Token limit reached; remaining input left unclassified",
                "Highlight smaller inputs or raise the token limit",
            ),
            ErrorMetadata::new(
                "W031",
                "Lexical",
                Severity::Low,
                true,
                false,
                "State stack depth limit reached; push ignored",
                "Check the grammar for unbalanced push rules",
            ),
            ErrorMetadata::new(
                "W032",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Input character matched no rule",
                "Add a rule covering the character if it should be classified",
            ),
            // Extension errors
            ErrorMetadata::new(
                "E040",
                "Extension",
                Severity::High,
                true,
                false,
                "Extension file is not valid TOML",
                "Fix the TOML syntax",
            ),
            ErrorMetadata::new(
                "E041",
                "Extension",
                Severity::Medium,
                true,
                false,
                "Extension names an unknown token category",
                "Use a qualified category such as Keyword.Type",
            ),
            ErrorMetadata::new(
                "E042",
                "Extension",
                Severity::Medium,
                true,
                false,
                "Extension names an unknown base lexer",
                "Use a registered lexer tag such as cpp",
            ),
            ErrorMetadata::new(
                "E043",
                "Extension",
                Severity::High,
                true,
                false,
                "Extension file could not be read",
                "Check the extension file path",
            ),
            // Registry warnings
            ErrorMetadata::new(
                "W050",
                "Registry",
                Severity::Low,
                true,
                false,
                "Requested language tag is not registered; plaintext used",
                "Register a lexer for the tag",
            ),
            ErrorMetadata::new(
                "W051",
                "Registry",
                Severity::Low,
                true,
                false,
                "Lexer tag re-registered; previous lexer replaced",
                "No action required when the override is intended",
            ),
            ErrorMetadata::new(
                "W052",
                "Registry",
                Severity::Low,
                true,
                false,
                "Filename glob does not compile; pattern ignored",
                "Fix the pattern in the lexer's filename list",
            ),
            // Render errors
            ErrorMetadata::new(
                "E060",
                "Render",
                Severity::Medium,
                true,
                false,
                "Token stream could not be serialized",
                "Report the failing input",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_constant_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_processing::FILE_NOT_FOUND,
            file_processing::UNKNOWN_EXTENSION,
            file_processing::FILE_TOO_LARGE,
            file_processing::EMPTY_FILE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            grammar::INVALID_PATTERN,
            grammar::ZERO_WIDTH_PATTERN,
            grammar::UNKNOWN_STATE,
            grammar::INCLUDE_CYCLE,
            grammar::EMPTY_VOCABULARY,
            grammar::MISSING_ROOT_STATE,
            grammar::VOCABULARY_TOO_LARGE,
            lexical::TOKEN_LIMIT_REACHED,
            lexical::STATE_DEPTH_EXCEEDED,
            lexical::UNMATCHED_INPUT,
            extension::PARSE_FAILURE,
            extension::UNKNOWN_CATEGORY,
            extension::UNKNOWN_BASE_LEXER,
            extension::READ_FAILURE,
            registry::UNKNOWN_TAG,
            registry::TAG_REPLACED,
            registry::INVALID_FILENAME_PATTERN,
            render::SERIALIZATION_FAILURE,
        ];

        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_category("E021"), "Grammar");
        assert!(requires_halt("E021"));
        assert!(is_recoverable("W050"));
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert_eq!(get_description("nope"), "Unknown error");
    }
}
