//! Field-level validation for text records.

use crate::error::{PasteError, Result};

/// Validate a caller-supplied text identifier.
///
/// - Must contain at least one non-whitespace character
pub fn validate_text_id(text_id: &str) -> Result<()> {
    if text_id.trim().is_empty() {
        return Err(PasteError::Validation(
            "Text identifier cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate text content.
///
/// - Must contain at least one non-whitespace character
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(PasteError::Validation(
            "Text content cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Enforce a store-level content limit, counted in characters.
pub fn validate_content_length(content: &str, max_chars: usize) -> Result<()> {
    let length = content.chars().count();
    if length > max_chars {
        return Err(PasteError::Validation(format!(
            "Text content too long ({} characters, max {})",
            length, max_chars
        )));
    }
    Ok(())
}
