//! Entity Extraction
//!
//! Pulls the two entities the dialogue engine understands out of free text:
//! - Customer name from an introduction ("my name is sam", "call me alex")
//! - Order number from an order reference ("order #123456", "ORD-55555")
//!
//! Patterns are tried in order and the first match wins; captures from
//! later patterns are never merged in.

use once_cell::sync::Lazy;
use regex::Regex;

/// Introduction phrases, applied to lower-cased text
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"my name is (\w+)",
        r"i am (\w+)",
        r"i'm (\w+)",
        r"call me (\w+)",
        r"this is (\w+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Order references; five or more digits so short numbers don't match
static ORDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)order\s*#?\s*(\d{5,})",
        r"#(\d{5,})",
        r"(?i)ord-?(\d{5,})",
        r"(?i)tracking\s*#?\s*(\d{5,})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract a customer name from an introduction
///
/// Returns the single-word capture of the first matching phrase, capitalized.
pub fn extract_name(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();

    NAME_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(&lowered)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|token| !token.is_empty())
            .map(capitalize)
    })
}

/// Extract the digits of an order reference
pub fn extract_order_number(text: &str) -> Option<String> {
    ORDER_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Upper-case the first character, lower-case the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
