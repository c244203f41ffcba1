//! Local, synchronous validation
//!
//! Validation failures are resolved before any remote call is made;
//! they never reach the persistence layer.

use thiserror::Error;

/// Minimum username length
pub const USERNAME_MIN: usize = 3;
/// Maximum username length
pub const USERNAME_MAX: usize = 20;
/// Minimum password length
pub const PASSWORD_MIN: usize = 6;

/// A field failed local validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Username must be at most 20 characters")]
    UsernameTooLong,

    #[error("Username may only contain lowercase letters, digits, '_' and '-'")]
    UsernameCharset,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Normalize a username candidate the way the dashboard input does:
/// lowercase, with everything outside `[a-z0-9_-]` stripped.
pub fn sanitize_username(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// Validate a (already sanitized) username
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Required { field: "Username" });
    }
    if username.len() < USERNAME_MIN {
        return Err(ValidationError::UsernameTooShort);
    }
    if username.len() > USERNAME_MAX {
        return Err(ValidationError::UsernameTooLong);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(ValidationError::UsernameCharset);
    }
    Ok(())
}

/// Live password strength indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

/// Classify a password for the live strength indicator
pub fn password_strength(password: &str) -> PasswordStrength {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if password.len() >= 10 && has_upper && has_symbol {
        PasswordStrength::Strong
    } else if password.len() >= 8 {
        PasswordStrength::Medium
    } else {
        PasswordStrength::Weak
    }
}

/// A registration form as submitted
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Validate a registration form; all field errors are collected
pub fn validate_registration(form: &Registration) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push(ValidationError::Required { field: "Name" });
    }
    if let Err(e) = validate_username(&sanitize_username(&form.username)) {
        errors.push(e);
    }
    if form.email.trim().is_empty() {
        errors.push(ValidationError::Required { field: "Email" });
    }
    if form.password.len() < PASSWORD_MIN {
        errors.push(ValidationError::PasswordTooShort);
    }
    if form.password != form.confirm_password {
        errors.push(ValidationError::PasswordMismatch);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
