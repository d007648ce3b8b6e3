use crate::error::{AppError, Result};
use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

fn username_pattern() -> &'static Regex {
    static USERNAME: OnceLock<Regex> = OnceLock::new();
    // Usernames are path segments in `/users/:username`.
    USERNAME.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid username regex"))
}

/// Character-set rule for usernames, used from `#[validate(custom)]`.
pub fn validate_username_chars(username: &str) -> std::result::Result<(), ValidationError> {
    if username_pattern().is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_chars");
        err.message = Some("Username may only contain letters, digits, '_', '.' and '-'".into());
        Err(err)
    }
}

/// Rejects values made only of whitespace.
pub fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Length check for limits that come from configuration rather than a
/// derive attribute.
pub fn validate_max_chars(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Escapes `LIKE` wildcards so a search term matches literally. Pair with
/// `ESCAPE '\'` in the query.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
