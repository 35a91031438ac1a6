use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating username fields
    /// Letters, digits and `@ . + - _`, 1 to 150 characters
    /// - Valid: "john_doe", "user123", "siti.rahma", "warga+rw05", "a@b"
    /// - Invalid: "user name", "user#1", "", "üser"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9@.+\-_]{1,150}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_regex_valid() {
        assert!(USERNAME_REGEX.is_match("john_doe"));
        assert!(USERNAME_REGEX.is_match("user123"));
        assert!(USERNAME_REGEX.is_match("siti.rahma"));
        assert!(USERNAME_REGEX.is_match("warga+rw05"));
        assert!(USERNAME_REGEX.is_match("a@b"));
        assert!(USERNAME_REGEX.is_match("-dash-"));
    }

    #[test]
    fn test_username_regex_invalid() {
        assert!(!USERNAME_REGEX.is_match("")); // empty
        assert!(!USERNAME_REGEX.is_match("user name")); // space
        assert!(!USERNAME_REGEX.is_match("user#1")); // symbol
        assert!(!USERNAME_REGEX.is_match("üser")); // non-ascii
        assert!(!USERNAME_REGEX.is_match(&"a".repeat(151))); // too long
    }
}
