//! Text normalization before similarity scoring, plus display-only contact hints.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\-.,()@#%&+]").unwrap());
static EMAIL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?[1-9]?[0-9]{7,15}").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z|]{2,}\b").unwrap()
});

/// Collapses whitespace, strips unusual punctuation, redacts e-mail addresses
/// and phone-like digit runs, then lower-cases.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = WHITESPACE.replace_all(text, " ");
    let text = DISALLOWED.replace_all(&text, "");
    let text = EMAIL_TOKEN.replace_all(&text, "");
    let text = PHONE.replace_all(&text, "");
    text.to_lowercase().trim().to_string()
}

/// First e-mail and phone number found in a document. Never used for scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactHints {
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub fn extract_contact_hints(text: &str) -> ContactHints {
    ContactHints {
        email: EMAIL.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE.find(text).map(|m| m.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_lowercases() {
        assert_eq!(clean_text("  Senior   Marketing\n\tManager  "), "senior marketing manager");
    }

    #[test]
    fn test_strips_disallowed_punctuation() {
        assert_eq!(clean_text("SEO/SEM: 100% *growth*!"), "seosem 100% growth");
    }

    #[test]
    fn test_redacts_email_and_phone() {
        let cleaned = clean_text("Reach me at jane.doe@example.com or +14155550123 today");
        assert!(!cleaned.contains('@'));
        assert!(!cleaned.contains("4155550123"));
        assert!(cleaned.starts_with("reach me at"));
        assert!(cleaned.ends_with("today"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_contact_hints_take_first_match() {
        let hints = extract_contact_hints("Jane <jane@example.com>, alt: j@work.io, 5551234567");
        assert_eq!(hints.email.as_deref(), Some("jane@example.com"));
        assert_eq!(hints.phone.as_deref(), Some("5551234567"));
    }

    #[test]
    fn test_contact_hints_absent() {
        assert_eq!(extract_contact_hints("no contact here"), ContactHints::default());
    }
}
