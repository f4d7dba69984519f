//! Input checks applied before anything is written.

use validator::ValidateEmail;

use crate::error::{UserError, UserResult};
use crate::models::{UserFields, UserForm};

/// Email syntax check.
///
/// HTML5 email grammar, and the domain must contain a dot.
pub fn is_valid_email(email: &str) -> bool {
    if !email.validate_email() {
        return false;
    }

    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'))
}

/// Validate a form and return the trimmed fields to store.
///
/// Emptiness is judged on the raw values, so whitespace-only input passes and
/// is stored as `""`. The email syntax is checked on the trimmed value.
pub fn validate_form(form: &UserForm) -> UserResult<UserFields> {
    if form.name.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Err(UserError::EmptyFields);
    }

    if !is_valid_email(form.email.trim()) {
        return Err(UserError::InvalidEmail);
    }

    Ok(UserFields::from(form))
}
