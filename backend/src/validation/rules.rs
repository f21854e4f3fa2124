//! Common validation rules shared across request payloads.

use validator::ValidationError;

const MAX_OPTIONS: usize = 26;
const MAX_OPTION_LENGTH: usize = 500;

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("must_not_be_blank"));
    }
    Ok(())
}

/// Validates the option list of a question.
///
/// Requirements:
/// - At most 26 options (one per letter)
/// - Every option non-blank and at most 500 characters
/// - No duplicate options
pub fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.len() > MAX_OPTIONS {
        return Err(ValidationError::new("too_many_options"));
    }

    let mut seen = std::collections::HashSet::new();
    for option in options {
        let trimmed = option.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("option_blank"));
        }
        if trimmed.chars().count() > MAX_OPTION_LENGTH {
            return Err(ValidationError::new("option_too_long"));
        }
        if !seen.insert(trimmed) {
            return Err(ValidationError::new("option_duplicate"));
        }
    }

    Ok(())
}
