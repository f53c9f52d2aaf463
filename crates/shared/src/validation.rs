//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a template or folder name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Validates that a string contains at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("can't be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a string holds no NUL character. Postgres text and jsonb
/// columns cannot store one.
pub fn validate_no_nul(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        let mut err = ValidationError::new("null_byte");
        err.message = Some("contains a null character".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a name is not blank, storable, and fits the name length limit.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    validate_not_blank(value)?;
    validate_no_nul(value)?;
    if value.chars().count() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("too_long");
        err.message = Some(format!("is too long (maximum is {} characters)", MAX_NAME_LENGTH).into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a layout dimension is finite and non-negative.
pub fn validate_dimension(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("dimension_range");
        err.message = Some("must be greater than or equal to 0".into());
        Err(err)
    }
}

/// Validates that a zero-based page index is non-negative.
pub fn validate_page_index(page: i64) -> Result<(), ValidationError> {
    if page >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("page_range");
        err.message = Some("must be greater than or equal to 0".into());
        Err(err)
    }
}
