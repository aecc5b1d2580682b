//! Length heuristic - buckets a password by length alone.

use std::fmt;

/// Below this many characters the short-password advisory is raised.
pub const MIN_ADVISED_LENGTH: usize = 6;

/// Shortest length classified as [`StrengthBucket::Medium`].
const MEDIUM_MIN_LENGTH: usize = 9;

/// Shortest length classified as [`StrengthBucket::Strong`].
const STRONG_MIN_LENGTH: usize = 13;

/// General advice shown alongside every result.
pub const PASSWORD_TIPS: [&str; 4] = [
    "Use a mix of lowercase and uppercase letters.",
    "Include special characters like @, #, or $.",
    "Make your password at least 12 characters.",
    "Try a memorable passphrase instead of one word.",
];

/// Qualitative strength, ordered `Weak < Medium < Strong`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrengthBucket {
    Weak,
    Medium,
    Strong,
}

/// Display color attached to a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketColor {
    Red,
    Orange,
    Green,
}

impl BucketColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketColor::Red => "red",
            BucketColor::Orange => "orange",
            BucketColor::Green => "green",
        }
    }
}

impl StrengthBucket {
    /// Short label, also the label the models are trained to emit.
    pub fn label(&self) -> &'static str {
        match self {
            StrengthBucket::Weak => "Weak",
            StrengthBucket::Medium => "Medium",
            StrengthBucket::Strong => "Strong",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrengthBucket::Weak => "Weak password",
            StrengthBucket::Medium => "Moderate password",
            StrengthBucket::Strong => "Strong password",
        }
    }

    pub fn color(&self) -> BucketColor {
        match self {
            StrengthBucket::Weak => BucketColor::Red,
            StrengthBucket::Medium => BucketColor::Orange,
            StrengthBucket::Strong => BucketColor::Green,
        }
    }

    /// Maps a decoded model label back to a bucket, if it names one.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Weak" => Some(StrengthBucket::Weak),
            "Medium" => Some(StrengthBucket::Medium),
            "Strong" => Some(StrengthBucket::Strong),
            _ => None,
        }
    }
}

impl fmt::Display for StrengthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buckets a password length.
///
/// - `length <= 8` => Weak
/// - `9..=12` => Medium
/// - `length >= 13` => Strong
pub fn classify_by_length(length: usize) -> StrengthBucket {
    if length >= STRONG_MIN_LENGTH {
        StrengthBucket::Strong
    } else if length >= MEDIUM_MIN_LENGTH {
        StrengthBucket::Medium
    } else {
        StrengthBucket::Weak
    }
}

/// Returns the short-password advisory when `length` is under
/// [`MIN_ADVISED_LENGTH`]. Independent of the bucket.
pub fn short_password_advisory(length: usize) -> Option<String> {
    if length < MIN_ADVISED_LENGTH {
        return Some(format!(
            "Your password is very short. Use at least {} characters.",
            MIN_ADVISED_LENGTH
        ));
    }
    None
}
