use std::borrow::Cow;
pub use validator::ValidationError;
use crate::constants::{EMPTY_LABEL_ERROR, MIN_EXCEEDS_MAX_ERROR, MIN_SELECTABLE_ZERO_ERROR};

/// A label counts as filled in once surrounding whitespace is stripped.
pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        let mut error = ValidationError::new("empty_label");
        error.message = Some(Cow::Borrowed(EMPTY_LABEL_ERROR));
        return Err(error);
    }
    Ok(())
}

pub fn validate_selectable_bounds(min: usize, max: usize) -> Result<(), ValidationError> {
    if min == 0 {
        let mut error = ValidationError::new("min_selectable_zero");
        error.message = Some(Cow::Borrowed(MIN_SELECTABLE_ZERO_ERROR));
        return Err(error);
    }
    if min > max {
        let mut error = ValidationError::new("min_exceeds_max");
        error.message = Some(Cow::Borrowed(MIN_EXCEEDS_MAX_ERROR));
        error.add_param(Cow::Borrowed("min"), &min);
        error.add_param(Cow::Borrowed("max"), &max);
        return Err(error);
    }
    Ok(())
}
