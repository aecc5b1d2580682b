//! Feature extraction - reduces a password to the record the models consume.

use secrecy::{ExposeSecret, SecretString};
use unicode_general_category::{GeneralCategory, get_general_category};

/// Number of values in a feature vector.
pub const FEATURE_COUNT: usize = 4;

/// Character-class summary of a password.
///
/// Field order matches the column order the models were trained on:
/// lowercase, uppercase, special, length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordFeatures {
    pub has_lowercase: bool,
    pub has_uppercase: bool,
    pub has_special: bool,
    /// Length in characters (code points), not bytes.
    pub length: usize,
}

impl PasswordFeatures {
    /// Numeric vector fed to the classifiers. Booleans become `0.0`/`1.0`.
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(u8::from(self.has_lowercase)),
            f64::from(u8::from(self.has_uppercase)),
            f64::from(u8::from(self.has_special)),
            self.length as f64,
        ]
    }
}

/// Letter (`L*`) or number (`N*`) general category.
///
/// Narrower than [`char::is_alphanumeric`], which also accepts the
/// `Other_Alphabetic` combining marks; the models were trained with marks
/// counted as special characters.
fn is_letter_or_number(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
    )
}

/// Extracts the feature record from a password.
///
/// Total over all inputs: the empty string yields all flags `false` and
/// length `0`. Lowercase and uppercase use the Unicode `Lowercase` and
/// `Uppercase` properties; special means neither letter nor number.
pub fn extract(password: &SecretString) -> PasswordFeatures {
    let pwd = password.expose_secret();
    PasswordFeatures {
        has_lowercase: pwd.chars().any(|c| c.is_lowercase()),
        has_uppercase: pwd.chars().any(|c| c.is_uppercase()),
        has_special: pwd.chars().any(|c| !is_letter_or_number(c)),
        length: pwd.chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[test]
    fn test_extract_empty_password() {
        let features = extract(&secret(""));
        assert_eq!(features, PasswordFeatures::default());
        assert_eq!(features.length, 0);
    }

    #[test]
    fn test_extract_lowercase_only() {
        let features = extract(&secret("abc"));
        assert_eq!(
            features,
            PasswordFeatures {
                has_lowercase: true,
                has_uppercase: false,
                has_special: false,
                length: 3,
            }
        );
    }

    #[test]
    fn test_extract_uppercase_only() {
        let features = extract(&secret("ABC"));
        assert!(!features.has_lowercase);
        assert!(features.has_uppercase);
        assert!(!features.has_special);
        assert_eq!(features.length, 3);
    }

    #[test]
    fn test_extract_digit_is_not_special() {
        let features = extract(&secret("a1!"));
        assert!(features.has_lowercase);
        assert!(!features.has_uppercase);
        assert!(features.has_special);
        assert_eq!(features.length, 3);

        assert!(!extract(&secret("1234")).has_special);
    }

    #[test]
    fn test_extract_counts_code_points() {
        // "é" is two bytes in UTF-8
        let features = extract(&secret("café"));
        assert_eq!(features.length, 4);
        assert!(features.has_lowercase);
        assert!(!features.has_special);
    }

    #[test]
    fn test_extract_whitespace_is_special() {
        assert!(extract(&secret("two words")).has_special);
    }

    #[test]
    fn test_extract_combining_mark_is_special() {
        // U+093E DEVANAGARI VOWEL SIGN AA is Other_Alphabetic but category Mc
        let features = extract(&secret("\u{93e}"));
        assert!(features.has_special);
        assert_eq!(features.length, 1);

        // U+0301 COMBINING ACUTE ACCENT (Mn) after a plain letter
        assert!(extract(&secret("e\u{301}")).has_special);
    }

    #[test]
    fn test_extract_non_latin_letters_and_numbers() {
        let features = extract(&secret("пароль"));
        assert!(features.has_lowercase);
        assert!(!features.has_special);

        // U+00BD VULGAR FRACTION ONE HALF (No) and U+0967 DEVANAGARI DIGIT ONE (Nd)
        assert!(!extract(&secret("\u{bd}\u{967}")).has_special);
    }

    #[test]
    fn test_to_vector_order() {
        let features = extract(&secret("Sunshine2024!"));
        assert_eq!(features.to_vector(), [1.0, 1.0, 1.0, 13.0]);
        assert_eq!(PasswordFeatures::default().to_vector(), [0.0, 0.0, 0.0, 0.0]);
    }
}
