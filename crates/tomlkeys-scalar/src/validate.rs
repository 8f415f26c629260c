//! Character-level checks on scalar text.

/// String value marking an explicit null (binary key without payload).
pub const NULL_MARKER: &str = "@NULL";

/// Prefix of base64-encoded binary values.
pub const BASE64_PREFIX: &str = "@BASE64";

/// Whether `text` may appear unquoted as a key segment.
///
/// Bare keys are non-empty and consist of ASCII letters, digits, `_` and `-`.
pub fn is_valid_bare_string(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Whether `text` is the null marker.
pub fn is_null_string(text: &str) -> bool {
    text == NULL_MARKER
}

/// Whether `text` carries base64-encoded binary data.
pub fn is_base64_string(text: &str) -> bool {
    text.starts_with(BASE64_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_bare_strings() {
        assert!(is_valid_bare_string("key"));
        assert!(is_valid_bare_string("bare_key-2"));
        assert!(is_valid_bare_string("1234"));
        assert!(is_valid_bare_string("-inf"));
        assert!(!is_valid_bare_string(""));
        assert!(!is_valid_bare_string("with space"));
        assert!(!is_valid_bare_string("+1"));
        assert!(!is_valid_bare_string("ünïcode"));
        assert!(!is_valid_bare_string("a.b"));
    }

    #[test]
    fn test_special_strings() {
        assert!(is_null_string("@NULL"));
        assert!(!is_null_string("@NULLX"));
        assert!(is_base64_string("@BASE64aGVsbG8="));
        assert!(is_base64_string("@BASE64"));
        assert!(!is_base64_string("BASE64"));
    }
}
