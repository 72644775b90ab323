// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{Result, XchembkuError};
use regex::Regex;
use std::net::SocketAddr;

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(XchembkuError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_bind_address(bind: &str) -> Result<SocketAddr> {
        bind.parse::<SocketAddr>().map_err(|e| {
            XchembkuError::Validation(format!("Invalid bind address {}: {}", bind, e))
        })
    }

    pub fn validate_not_empty(what: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(XchembkuError::Validation(format!("{} is empty", what)));
        }
        Ok(())
    }

    /// Direction is 1 (ascending) or -1 (descending); absent means ascending.
    pub fn validate_direction(direction: Option<i32>) -> Result<()> {
        match direction {
            None | Some(1) | Some(-1) => Ok(()),
            Some(other) => Err(XchembkuError::Validation(format!(
                "direction must be 1 or -1, got {}",
                other
            ))),
        }
    }

    /// Translates a filename glob (`*`, `?`) into an anchored regex.
    pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
        let mut expression = String::with_capacity(pattern.len() + 8);
        expression.push('^');

        for c in pattern.chars() {
            match c {
                '*' => expression.push_str(".*"),
                '?' => expression.push('.'),
                other => expression.push_str(&regex::escape(&other.to_string())),
            }
        }

        expression.push('$');

        Regex::new(&expression).map_err(|e| {
            XchembkuError::Validation(format!("Invalid filename pattern {}: {}", pattern, e))
        })
    }

    pub fn truncate_text(text: &str, max_length: usize) -> String {
        match text.char_indices().nth(max_length) {
            None => text.to_string(),
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://example.com").is_ok());
        assert!(Validator::validate_url("http://127.0.0.1:27821").is_ok());
        assert!(Validator::validate_url("example.com").is_err());
        assert!(Validator::validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_bind_address() {
        let addr = Validator::validate_bind_address("127.0.0.1:0").unwrap();
        assert_eq!(addr.port(), 0);
        assert!(Validator::validate_bind_address("localhost").is_err());
    }

    #[test]
    fn test_validate_direction() {
        assert!(Validator::validate_direction(None).is_ok());
        assert!(Validator::validate_direction(Some(1)).is_ok());
        assert!(Validator::validate_direction(Some(-1)).is_ok());
        assert!(Validator::validate_direction(Some(0)).is_err());
    }

    #[test]
    fn test_glob_to_regex() {
        let regex = Validator::glob_to_regex("*a.jpg").unwrap();
        assert!(regex.is_match("001a.jpg"));
        assert!(!regex.is_match("004b.jpg"));
        assert!(!regex.is_match("001a.jpg.bak"));

        let regex = Validator::glob_to_regex("0?1a.jpg").unwrap();
        assert!(regex.is_match("001a.jpg"));
        assert!(!regex.is_match("0001a.jpg"));
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        let regex = Validator::glob_to_regex("well(1)+.jpg").unwrap();
        assert!(regex.is_match("well(1)+.jpg"));
        assert!(!regex.is_match("well1.jpg"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
    }
}
