//! Artifact name rules and name-to-key mapping.

use crate::error::NameError;
use unicode_general_category::{GeneralCategory, get_general_category};

/// Suffix appended to artifact keys unless configured otherwise.
pub const DEFAULT_KEY_SUFFIX: &str = ".class";

/// Whether `c` may start an identifier.
///
/// Accepts letters, letter numbers, currency symbols (`$`, `฿`, ...) and
/// connector punctuation (`_`, `‿`, ...).
pub fn is_identifier_start(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::LetterNumber
            | GeneralCategory::CurrencySymbol
            | GeneralCategory::ConnectorPunctuation
    )
}

/// Check that `name` can be resolved as an artifact.
pub fn validate_artifact_name(name: &str) -> Result<(), NameError> {
    match name.chars().next() {
        None => Err(NameError::Empty),
        Some(first) if !is_identifier_start(first) => Err(NameError::InvalidStart(first)),
        Some(_) => Ok(()),
    }
}

/// Map a dotted artifact name to an object key.
///
/// `com.example.Foo` with suffix `.class` becomes `com/example/Foo.class`.
pub fn to_object_key(name: &str, suffix: &str) -> String {
    let mut key = name.replace('.', "/");
    key.push_str(suffix);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("com.example.Foo")]
    #[case("Foo")]
    #[case("_internal.Bar")]
    #[case("$Proxy12")]
    #[case("éclair.Tarte")]
    #[case("\u{0E3F}baht")]
    #[case("\u{203F}undertie")]
    #[case("\u{2160}roman")]
    fn test_valid_names(#[case] name: &str) {
        assert_eq!(validate_artifact_name(name), Ok(()));
    }

    #[rstest]
    #[case("", NameError::Empty)]
    #[case("1abc", NameError::InvalidStart('1'))]
    #[case(".hidden", NameError::InvalidStart('.'))]
    #[case("/com/example/Foo", NameError::InvalidStart('/'))]
    #[case(" Foo", NameError::InvalidStart(' '))]
    #[case("\u{0903}visarga", NameError::InvalidStart('\u{0903}'))]
    #[case("-x", NameError::InvalidStart('-'))]
    #[case("+x", NameError::InvalidStart('+'))]
    fn test_invalid_names(#[case] name: &str, #[case] expected: NameError) {
        assert_eq!(validate_artifact_name(name), Err(expected));
    }

    #[test]
    fn test_object_key() {
        assert_eq!(
            to_object_key("com.example.Foo", DEFAULT_KEY_SUFFIX),
            "com/example/Foo.class"
        );
        assert_eq!(to_object_key("Foo", ""), "Foo");
        assert_eq!(to_object_key("a.b$Inner", ".bin"), "a/b$Inner.bin");
    }
}
