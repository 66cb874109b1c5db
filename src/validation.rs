//! Request Validation
//! Mission: Reject malformed input before it reaches business logic
//!
//! Field-level detail stays server-side (logged at debug); clients only ever
//! see a generic "Validation error" message.

use crate::models::Role;

/// A single failed validation rule.
///
/// The field/message pair is for logs and tests; it is never surfaced in an
/// API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// User display name: 2..=60 characters
pub fn validate_name(name: &str) -> ValidationResult {
    if name.chars().count() < 2 {
        return Err(ValidationError::new("name", "Name too short"));
    }
    if name.chars().count() > 60 {
        return Err(ValidationError::new("name", "Name too long"));
    }
    Ok(())
}

/// Store display name: 1..=60 characters
pub fn validate_store_name(name: &str) -> ValidationResult {
    if name.is_empty() {
        return Err(ValidationError::new("name", "Required"));
    }
    if name.chars().count() > 60 {
        return Err(ValidationError::new("name", "Name too long"));
    }
    Ok(())
}

/// Syntactic email check plus the 255-char column limit
pub fn validate_email(email: &str) -> ValidationResult {
    if email.len() > 255 {
        return Err(ValidationError::new("email", "Email too long"));
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    let well_formed = !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);

    if !well_formed {
        return Err(ValidationError::new("email", "Invalid email"));
    }
    Ok(())
}

/// Postal address: at most 400 characters
pub fn validate_address(address: &str) -> ValidationResult {
    if address.chars().count() > 400 {
        return Err(ValidationError::new("address", "Address too long"));
    }
    Ok(())
}

/// Password policy: 8..=16 chars, one uppercase, one special character
pub fn validate_password(password: &str) -> ValidationResult {
    let len = password.chars().count();
    if len < 8 {
        return Err(ValidationError::new("password", "Password too short"));
    }
    if len > 16 {
        return Err(ValidationError::new("password", "Password too long"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::new("password", "Need uppercase"));
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        return Err(ValidationError::new("password", "Need special char"));
    }
    Ok(())
}

/// Login password: presence only; the strength policy applies when a
/// password is set, not when it is presented
pub fn validate_login_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return Err(ValidationError::new("password", "Required"));
    }
    Ok(())
}

/// Rating value: integer in [1,5]
pub fn validate_rating(rating: i64) -> ValidationResult {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::new("rating", "Rating must be between 1 and 5"));
    }
    Ok(())
}

/// Role string from an admin create-user payload
pub fn validate_role(role: &str) -> Result<Role, ValidationError> {
    Role::from_str(role).ok_or_else(|| ValidationError::new("role", "Invalid role"))
}
