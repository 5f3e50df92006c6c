//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

fn char_count(value: &str) -> usize {
    value.chars().count()
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    validate_length("Name", name, 2, Some(50))
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Please provide a valid email".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_upper || !has_lower || !has_digit {
        return Err(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                .to_string(),
        );
    }

    Ok(())
}

/// Validate the trimmed length of a text field, in characters
pub fn validate_length(label: &str, value: &str, min: usize, max: Option<usize>) -> Result<(), String> {
    let len = char_count(value.trim());
    match max {
        Some(max) if len < min || len > max => Err(format!(
            "{label} must be between {min} and {max} characters"
        )),
        None if len < min => Err(format!("{label} must be at least {min} characters")),
        _ => Ok(()),
    }
}

/// Validate that a number lies within an inclusive range
pub fn validate_range<T>(label: &str, value: T, min: T, max: T) -> Result<(), String>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(format!("{label} must be between {min} and {max}"));
    }
    Ok(())
}

/// Validate an optional http(s) URL; empty strings count as absent
pub fn validate_url(label: &str, url: Option<&str>) -> Result<(), String> {
    let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
        return Ok(());
    };

    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = URL_REGEX.get_or_init(|| {
        Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("Failed to compile URL regex")
    });

    if !regex.is_match(url.trim()) {
        return Err(format!("Please provide a valid {label}"));
    }
    Ok(())
}

/// True when the subdomain only uses lowercase letters, digits and hyphens
pub fn is_subdomain_charset(subdomain: &str) -> bool {
    static SUBDOMAIN_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SUBDOMAIN_REGEX
        .get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("Failed to compile subdomain regex"));
    regex.is_match(subdomain)
}

/// Validate a user-supplied portfolio subdomain
pub fn validate_subdomain(subdomain: &str) -> Result<(), String> {
    if !is_subdomain_charset(subdomain) {
        return Err(
            "Subdomain can only contain lowercase letters, numbers, and hyphens".to_string(),
        );
    }
    validate_length("Subdomain", subdomain, 3, Some(30))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Jo").is_ok());
        assert!(validate_name("  J ").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane@example").is_err());
        assert!(validate_email("not an email").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Secret1").is_ok());
        assert!(validate_password("Sec1").is_err());
        assert!(validate_password("secret1").is_err());
        assert!(validate_password("SECRET1").is_err());
        assert!(validate_password("Secrets").is_err());
    }

    #[test]
    fn test_validate_length_counts_characters() {
        assert!(validate_length("Title", "héllo", 5, Some(5)).is_ok());
        assert_eq!(
            validate_length("Title", "ab", 3, Some(100)).unwrap_err(),
            "Title must be between 3 and 100 characters"
        );
        assert_eq!(
            validate_length("Content", "short", 100, None).unwrap_err(),
            "Content must be at least 100 characters"
        );
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("Percentage", 100, 0, 100).is_ok());
        assert!(validate_range("Percentage", 101, 0, 100).is_err());
        assert!(validate_range("GPA", -0.1, 0.0, 4.0).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("GitHub URL", None).is_ok());
        assert!(validate_url("GitHub URL", Some("")).is_ok());
        assert!(validate_url("GitHub URL", Some("https://github.com/jane")).is_ok());
        assert!(validate_url("GitHub URL", Some("github.com/jane")).is_err());
    }

    #[test]
    fn test_validate_subdomain() {
        assert!(validate_subdomain("jane-doe").is_ok());
        assert!(validate_subdomain("ab").is_err());
        assert!(validate_subdomain("Jane").is_err());
        assert!(validate_subdomain(&"a".repeat(31)).is_err());
    }
}
