//! Account field policy shared by registration and profile edits.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{3,20}$").expect("valid username regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+@[a-zA-Z]+\.[a-zA-Z]+$").expect("valid email regex"));
static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{P}\p{S}]").expect("valid symbol regex"));

pub const MAX_EMAIL_LEN: usize = 252;

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ApiError::validation("Username must be 3-20 letters or digits"))
    }
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.len() > MAX_EMAIL_LEN {
        return Err(ApiError::validation(format!("Email must be at most {} characters", MAX_EMAIL_LEN)));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ApiError::validation("Email is not valid"));
    }
    Ok(())
}

/// 8-20 characters with an uppercase letter, a lowercase letter, a digit and a
/// Unicode punctuation or symbol character
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let len = password.chars().count();
    let ok = (8..=20).contains(&len)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && SYMBOL_RE.is_match(password);
    if ok {
        Ok(())
    } else {
        Err(ApiError::validation(
            "Password must be 8-20 characters with an uppercase letter, a lowercase letter, a number and a symbol",
        ))
    }
}
