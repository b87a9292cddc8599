//! Client-side credential checks.
//!
//! These run before submit and never reach the asynchronous path; a
//! validation failure means no network race is started at all.

use std::sync::LazyLock;

use regex::Regex;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Ephemeral login/registration input. Never persisted by this layer.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Only present for registration.
    pub email: Option<String>,
}

impl Credentials {
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }

    pub fn register(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: Some(email.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Username must be {USERNAME_MIN}-{USERNAME_MAX} characters long")]
    UsernameLength,

    #[error("Username may only contain letters, digits and underscores")]
    UsernameCharacters,

    #[error("That doesn't look like an email address")]
    EmailFormat,

    #[error("Password cannot be empty")]
    PasswordEmpty,

    #[error("Passwords don't match")]
    PasswordMismatch,
}

/// State of the password-confirmation hint shown next to the confirm field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordHint {
    /// Both fields empty, nothing to say.
    Empty,
    /// Password typed, confirmation still empty.
    Prompt,
    /// Both non-empty and equal.
    Match,
    /// Both non-empty and different (or only the confirmation typed).
    Mismatch,
}

pub fn password_hint(password: &str, confirm: &str) -> PasswordHint {
    match (password.is_empty(), confirm.is_empty()) {
        (true, true) => PasswordHint::Empty,
        (false, true) => PasswordHint::Prompt,
        _ if password == confirm => PasswordHint::Match,
        _ => PasswordHint::Mismatch,
    }
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ValidationError::UsernameLength);
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::UsernameCharacters);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let looks_valid = EMAIL_PATTERN
        .as_ref()
        .map(|p| p.is_match(email))
        .unwrap_or(false);
    if looks_valid {
        Ok(())
    } else {
        Err(ValidationError::EmailFormat)
    }
}

/// Checks run before a login submit.
pub fn validate_login(credentials: &Credentials) -> Result<(), ValidationError> {
    validate_username(&credentials.username)?;
    if credentials.password.is_empty() {
        return Err(ValidationError::PasswordEmpty);
    }
    Ok(())
}

/// Checks run before a registration submit, including the confirm field.
pub fn validate_registration(
    credentials: &Credentials,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    validate_username(&credentials.username)?;
    if credentials.password.is_empty() {
        return Err(ValidationError::PasswordEmpty);
    }
    if credentials.password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    match &credentials.email {
        Some(email) => validate_email(email),
        None => Err(ValidationError::EmailFormat),
    }
}
