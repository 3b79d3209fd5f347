//! Recipient address utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Bare phone number after stripping formatting: 6-15 digits
static PHONE_DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{6,15}$").expect("static regex")
});

/// Reasons a recipient cannot be canonicalised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientError {
    /// No usable characters were supplied
    Missing,
    /// The number has too few or too many digits
    InvalidNumber(String),
}

impl std::fmt::Display for RecipientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipientError::Missing => write!(f, "recipient is required"),
            RecipientError::InvalidNumber(n) => write!(f, "invalid recipient number: {}", n),
        }
    }
}

impl std::error::Error for RecipientError {}

/// Strip everything except ASCII digits
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Turn user input into the transport's canonical address.
///
/// Anything already carrying a domain part (`@`) is passed through trimmed;
/// bare numbers lose their formatting and get `suffix` appended.
pub fn canonical_recipient(input: &str, suffix: &str) -> Result<String, RecipientError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RecipientError::Missing);
    }
    if trimmed.contains('@') {
        return Ok(trimmed.to_string());
    }

    let digits = digits_only(trimmed);
    if digits.is_empty() {
        return Err(RecipientError::Missing);
    }
    if !PHONE_DIGITS_REGEX.is_match(&digits) {
        return Err(RecipientError::InvalidNumber(mask_recipient(&digits)));
    }
    Ok(format!("{}{}", digits, suffix))
}

/// Mask a recipient for logs (e.g. 155****4567@c.us)
pub fn mask_recipient(recipient: &str) -> String {
    let (local, domain) = match recipient.split_once('@') {
        Some((local, domain)) => (local, Some(domain)),
        None => (recipient, None),
    };

    let chars: Vec<char> = local.chars().collect();
    let masked = if chars.len() >= 7 {
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    } else {
        "****".to_string()
    };

    match domain {
        Some(domain) => format!("{}@{}", masked, domain),
        None => masked,
    }
}
