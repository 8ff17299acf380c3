//! Station-save validation helpers
//!
//! Limits are chosen based on:
//! - ESC/POS 80mm printer line width: 48 chars
//! - Prefix/suffix decorations are short markers, not content

use thiserror::Error;

// ── Text length limits ──────────────────────────────────────────────

/// Station and element names
pub const MAX_NAME_LEN: usize = 200;

/// Anything that must fit on one 80mm ticket line
pub const MAX_TICKET_LINE_LEN: usize = 48;

/// Prefix / suffix decorations of an atomic print element
pub const MAX_AFFIX_LEN: usize = 16;

/// Paper width bounds in characters (58mm = 32, 80mm = 48, wide impact = 64)
pub const MIN_PAPER_WIDTH: usize = 16;
pub const MAX_PAPER_WIDTH: usize = 80;

/// Upper bound for a failover wait window
pub const MAX_FAILOVER_TIMEOUT_MS: u64 = 120_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(String),

    #[error("{field} is too long ({len} chars, max {max})")]
    TooLong { field: String, len: usize, max: usize },

    #[error("{field} is invalid: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{0} is required for this station type")]
    Missing(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    if value.chars().count() > max_len {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            len: value.chars().count(),
            max: max_len,
        });
    }
    Ok(())
}

/// Prefix/suffix may be empty but must stay short and free of control bytes
pub fn validate_affix(value: &str, field: &str) -> ValidationResult<()> {
    let len = value.chars().count();
    if len > MAX_AFFIX_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            len,
            max: MAX_AFFIX_LEN,
        });
    }
    if value.chars().any(char::is_control) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "control characters are not allowed".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Grill", "name", 10).is_ok());
        assert_eq!(
            validate_required_text("  ", "name", 10),
            Err(ValidationError::Empty("name".to_string()))
        );
        assert!(matches!(
            validate_required_text("abcdefghijk", "name", 10),
            Err(ValidationError::TooLong { len: 11, .. })
        ));
    }

    #[test]
    fn test_affix_rejects_escape_bytes() {
        assert!(validate_affix("", "p").is_ok());
        assert!(validate_affix(">> ", "p").is_ok());
        assert!(validate_affix("\x1b@", "p").is_err());
    }
}
