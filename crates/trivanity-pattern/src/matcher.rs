//! Pattern matching implementation

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern contains invalid character '{0}' (valid: {1})")]
    InvalidCharacter(char, String),
    #[error("Pattern too long: {len} characters, address body holds at most {max}")]
    PatternTooLong { len: usize, max: usize },
}

/// Prefix and/or suffix an address must carry.
///
/// Empty strings leave that end unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VanityPattern {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl VanityPattern {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            case_sensitive,
        }
    }

    /// Create a prefix-only pattern
    pub fn prefix(value: impl Into<String>) -> Self {
        Self::new(value, "", false)
    }

    /// Create a suffix-only pattern
    pub fn suffix(value: impl Into<String>) -> Self {
        Self::new("", value, false)
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Characters both ends pin down
    pub fn constrained_len(&self) -> usize {
        self.prefix.chars().count() + self.suffix.chars().count()
    }

    /// Check that some address body could satisfy this pattern.
    ///
    /// `valid_chars` is the alphabet of the address body, `lead_chars` the
    /// subset that can open it and `max_len` its longest length.
    pub fn validate(
        &self,
        valid_chars: &str,
        lead_chars: &str,
        max_len: usize,
    ) -> Result<(), PatternError> {
        let len = self.constrained_len();
        if len > max_len {
            return Err(PatternError::PatternTooLong { len, max: max_len });
        }

        // A suffix spanning the whole body also starts it
        let lead = match self.prefix.chars().next() {
            Some(c) => Some(c),
            None if self.suffix.chars().count() == max_len => self.suffix.chars().next(),
            None => None,
        };
        if let Some(c) = lead {
            if !contains_char(lead_chars, c, self.case_sensitive) {
                return Err(PatternError::InvalidCharacter(c, lead_chars.to_string()));
            }
        }

        for c in self.prefix.chars().chain(self.suffix.chars()) {
            if !contains_char(valid_chars, c, self.case_sensitive) {
                return Err(PatternError::InvalidCharacter(c, valid_chars.to_string()));
            }
        }

        Ok(())
    }
}

fn contains_char(set: &str, c: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        set.contains(c)
    } else {
        set.chars().any(|v| v.eq_ignore_ascii_case(&c))
    }
}

/// Decide whether `address` satisfies `pattern`, comparing the whole address.
pub fn matches(address: &str, pattern: &VanityPattern) -> bool {
    PatternMatcher::new(pattern).matches(address)
}

/// A pattern compiled for the hot loop: case folding is done once up front
/// and matching never allocates.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    prefix: String,
    suffix: String,
    case_sensitive: bool,
    marker: Option<char>,
}

impl PatternMatcher {
    pub fn new(pattern: &VanityPattern) -> Self {
        let fold = |s: &str| {
            if pattern.case_sensitive {
                s.to_string()
            } else {
                s.to_ascii_lowercase()
            }
        };

        Self {
            prefix: fold(&pattern.prefix),
            suffix: fold(&pattern.suffix),
            case_sensitive: pattern.case_sensitive,
            marker: None,
        }
    }

    /// Skip a leading chain marker before checking prefix and suffix
    pub fn with_marker(mut self, marker: Option<char>) -> Self {
        self.marker = marker;
        self
    }

    /// The part of the address that carries the vanity pattern
    pub fn body<'a>(&self, address: &'a str) -> &'a str {
        match self.marker {
            Some(m) => address.strip_prefix(m).unwrap_or(address),
            None => address,
        }
    }

    #[inline]
    pub fn matches(&self, address: &str) -> bool {
        let body = self.body(address).as_bytes();
        let (prefix, suffix) = (self.prefix.as_bytes(), self.suffix.as_bytes());

        if prefix.len() > body.len() || suffix.len() > body.len() {
            return false;
        }

        let head = &body[..prefix.len()];
        let tail = &body[body.len() - suffix.len()..];

        if self.case_sensitive {
            head == prefix && tail == suffix
        } else {
            head.eq_ignore_ascii_case(prefix) && tail.eq_ignore_ascii_case(suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_matches_everything() {
        let any = VanityPattern::default();
        for addr in ["", "7e5f4552091a69125d5dfcb7b8c2659029395bdf", "T9yD14Nj9j7x"] {
            assert!(matches(addr, &any));
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches("AbC123", &VanityPattern::prefix("abc")));
        assert!(!matches("AbC123", &VanityPattern::prefix("abc").case_sensitive()));
        assert!(matches("AbC123", &VanityPattern::prefix("AbC").case_sensitive()));
    }

    #[test]
    fn test_prefix_and_suffix_compose() {
        assert!(matches("ab1234cd", &VanityPattern::new("ab", "cd", false)));
        assert!(!matches("ab1234cd", &VanityPattern::new("xb", "cd", false)));
        assert!(!matches("ab1234cd", &VanityPattern::new("ab", "cx", false)));
    }

    #[test]
    fn test_suffix_only() {
        assert!(matches("0000dead", &VanityPattern::suffix("DEAD")));
        assert!(!matches("0000beef", &VanityPattern::suffix("dead")));
    }

    #[test]
    fn test_pattern_longer_than_address() {
        assert!(!matches("ab", &VanityPattern::prefix("abc")));
        assert!(!matches("ab", &VanityPattern::suffix("cab")));
    }

    #[test]
    fn test_marker_is_not_part_of_body() {
        let addr = format!("T{}", "x".repeat(33));

        let x = PatternMatcher::new(&VanityPattern::prefix("x")).with_marker(Some('T'));
        assert!(x.matches(&addr));

        let t = PatternMatcher::new(&VanityPattern::prefix("T").case_sensitive())
            .with_marker(Some('T'));
        assert!(!t.matches(&addr));

        // doubled marker: the body itself starts with T
        let doubled = format!("TT{}", "x".repeat(32));
        assert!(t.matches(&doubled));
    }

    #[test]
    fn test_marker_suffix_uses_body() {
        let m = PatternMatcher::new(&VanityPattern::suffix("T")).with_marker(Some('T'));
        // the body is empty, so even a suffix of T cannot land on the marker
        assert!(!m.matches("T"));
    }

    #[test]
    fn test_validate_length() {
        let p = VanityPattern::new("aaaa", "bbbb", false);
        assert!(p.validate("ab", "ab", 8).is_ok());
        assert_eq!(
            p.validate("ab", "ab", 7),
            Err(PatternError::PatternTooLong { len: 8, max: 7 })
        );
    }

    #[test]
    fn test_validate_alphabet() {
        let hex = "0123456789abcdef";
        assert!(VanityPattern::prefix("DEAD").validate(hex, hex, 40).is_ok());
        assert!(matches!(
            VanityPattern::prefix("DEAD").case_sensitive().validate(hex, hex, 40),
            Err(PatternError::InvalidCharacter('D', _))
        ));
        assert!(VanityPattern::prefix("ghij").validate(hex, hex, 40).is_err());
    }

    #[test]
    fn test_validate_lead_character() {
        let alphabet = "123ABCabc";
        let lead = "AB";

        assert!(VanityPattern::prefix("a1").validate(alphabet, lead, 4).is_ok());
        assert_eq!(
            VanityPattern::prefix("a1").case_sensitive().validate(alphabet, lead, 4),
            Err(PatternError::InvalidCharacter('a', lead.to_string()))
        );
        assert!(matches!(
            VanityPattern::prefix("1").validate(alphabet, lead, 4),
            Err(PatternError::InvalidCharacter('1', _))
        ));

        // only the first body position is restricted
        assert!(VanityPattern::suffix("1").validate(alphabet, lead, 4).is_ok());
        assert!(VanityPattern::suffix("1111").validate(alphabet, lead, 4).is_err());
        assert!(VanityPattern::suffix("A111").validate(alphabet, lead, 4).is_ok());
    }
}
