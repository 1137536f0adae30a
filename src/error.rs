// WHY: one error taxonomy shared by the engine, splitter, settings and CSV interchange
// Every variant is recoverable and carries a human message; callers branch on `kind()`

use thiserror::Error;

/// Stable classification of an [`Error`], suitable for exit codes and structured logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyInput,
    NoRules,
    InvalidRule,
    MalformedImportRow,
    DuplicateModeName,
    InvalidModeName,
    UnknownMode,
    RuleIndexOutOfRange,
    ProtectedMode,
    InvalidPartCount,
    InvalidHeadingPattern,
    UnrecognizedHeader,
    InvariantViolation,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::NoRules => "no_rules",
            ErrorKind::InvalidRule => "invalid_rule",
            ErrorKind::MalformedImportRow => "malformed_import_row",
            ErrorKind::DuplicateModeName => "duplicate_mode_name",
            ErrorKind::InvalidModeName => "invalid_mode_name",
            ErrorKind::UnknownMode => "unknown_mode",
            ErrorKind::RuleIndexOutOfRange => "rule_index_out_of_range",
            ErrorKind::ProtectedMode => "protected_mode",
            ErrorKind::InvalidPartCount => "invalid_part_count",
            ErrorKind::InvalidHeadingPattern => "invalid_heading_pattern",
            ErrorKind::UnrecognizedHeader => "unrecognized_header",
            ErrorKind::InvariantViolation => "invariant_violation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("input text is empty")]
    EmptyInput,

    #[error("mode '{mode}' has no usable rules")]
    NoRules { mode: String },

    #[error("rule with find '{find}' cannot be used: {reason}")]
    InvalidRule { find: String, reason: String },

    #[error("import row {line} skipped: {reason}")]
    MalformedImportRow { line: usize, reason: String },

    #[error("a mode named '{0}' already exists")]
    DuplicateModeName(String),

    #[error("'{0}' is not a valid mode name")]
    InvalidModeName(String),

    #[error("no mode named '{0}'")]
    UnknownMode(String),

    #[error("mode '{mode}' has no rule at index {index} ({len} rules)")]
    RuleIndexOutOfRange { mode: String, index: usize, len: usize },

    #[error("mode '{0}' cannot be renamed or deleted")]
    ProtectedMode(String),

    #[error("part count must be at least 1, got {0}")]
    InvalidPartCount(usize),

    #[error("chapter heading pattern failed to compile: {0}")]
    InvalidHeadingPattern(String),

    #[error("CSV header must contain 'find,replace,mode'")]
    UnrecognizedHeader,

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput => ErrorKind::EmptyInput,
            Error::NoRules { .. } => ErrorKind::NoRules,
            Error::InvalidRule { .. } => ErrorKind::InvalidRule,
            Error::MalformedImportRow { .. } => ErrorKind::MalformedImportRow,
            Error::DuplicateModeName(_) => ErrorKind::DuplicateModeName,
            Error::InvalidModeName(_) => ErrorKind::InvalidModeName,
            Error::UnknownMode(_) => ErrorKind::UnknownMode,
            Error::RuleIndexOutOfRange { .. } => ErrorKind::RuleIndexOutOfRange,
            Error::ProtectedMode(_) => ErrorKind::ProtectedMode,
            Error::InvalidPartCount(_) => ErrorKind::InvalidPartCount,
            Error::InvalidHeadingPattern(_) => ErrorKind::InvalidHeadingPattern,
            Error::UnrecognizedHeader => ErrorKind::UnrecognizedHeader,
            Error::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }

    /// Whether the batch that produced this error may continue with its next item
    pub fn is_skippable(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidRule | ErrorKind::MalformedImportRow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Error::EmptyInput.kind(), ErrorKind::EmptyInput);
        assert_eq!(
            Error::NoRules { mode: "default".into() }.kind(),
            ErrorKind::NoRules
        );
        assert_eq!(Error::DuplicateModeName("x".into()).kind().as_str(), "duplicate_mode_name");
        let out_of_range = Error::RuleIndexOutOfRange { mode: "m".into(), index: 3, len: 2 };
        assert_eq!(out_of_range.kind(), ErrorKind::RuleIndexOutOfRange);
        assert_eq!(out_of_range.to_string(), "mode 'm' has no rule at index 3 (2 rules)");
    }

    #[test]
    fn test_messages_are_human_readable() {
        let err = Error::MalformedImportRow { line: 4, reason: "expected 3 fields, found 2".into() };
        assert_eq!(err.to_string(), "import row 4 skipped: expected 3 fields, found 2");
        assert_eq!(Error::EmptyInput.to_string(), "input text is empty");
    }

    #[test]
    fn test_skippable_errors() {
        assert!(Error::InvalidRule { find: "x".into(), reason: "too big".into() }.is_skippable());
        assert!(!Error::EmptyInput.is_skippable());
        assert!(!Error::InvariantViolation("gap".into()).is_skippable());
    }
}
