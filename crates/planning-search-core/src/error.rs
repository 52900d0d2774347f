use std::fmt;

use thiserror::Error;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnknownField,
    InvalidFieldValue,
    ReadOnlyField,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownField => "E2001",
            Self::InvalidFieldValue => "E2002",
            Self::ReadOnlyField => "E2003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnknownField => "Unknown field path",
            Self::InvalidFieldValue => "Invalid value for field",
            Self::ReadOnlyField => "Field is read-only",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::UnknownField => {
                Some("Use a dotted path such as advancedSearch.slugline or spikeState.")
            }
            Self::InvalidFieldValue => Some("Pass the value as JSON matching the field's type."),
            Self::ReadOnlyField => {
                Some("Spike state cannot be changed while only posted items are shown.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while decoding edits at the field-path boundary.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("unknown field path '{0}'")]
    UnknownField(String),

    #[error("invalid value for '{path}': {source}")]
    InvalidValue {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("field '{0}' is read-only")]
    ReadOnly(String),
}

impl SearchError {
    /// The stable code this error surfaces as.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownField(_) => ErrorCode::UnknownField,
            Self::InvalidValue { .. } => ErrorCode::InvalidFieldValue,
            Self::ReadOnly(_) => ErrorCode::ReadOnlyField,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, SearchError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::UnknownField,
            ErrorCode::InvalidFieldValue,
            ErrorCode::ReadOnlyField,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::ReadOnlyField.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn search_errors_map_to_codes() {
        let err = SearchError::UnknownField("advancedSearch.bogus".to_string());
        assert_eq!(err.code(), ErrorCode::UnknownField);
        assert_eq!(err.to_string(), "unknown field path 'advancedSearch.bogus'");

        let err = SearchError::ReadOnly("spikeState".to_string());
        assert_eq!(err.code(), ErrorCode::ReadOnlyField);
        assert_eq!(err.code().message(), "Field is read-only");
    }
}
