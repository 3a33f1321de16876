use confstr_core::ParseError;
use serde::Serialize;
use thiserror::Error;

/// First violated constraint found in a config string.
///
/// Key and value fields borrow from the original inputs, so the caller can
/// point at the offense without any copying.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError<'a> {
    /// A key token that is neither an identifier nor a quoted string.
    #[error("invalid configuration key found: '{key}'")]
    MalformedKey { key: &'a str },
    /// A key with no entry in the check string.
    #[error("unknown configuration key found: '{key}'")]
    UnknownKey { key: &'a str },
    /// A value whose kind disagrees with the declared type.
    #[error("invalid value type for key '{key}': expected a {expected}")]
    TypeMismatch {
        key: &'a str,
        expected: &'a str,
        value: &'a str,
    },
    /// A numeric value below the declared minimum.
    #[error("value too small for key '{key}': the minimum is {min}")]
    BelowMinimum { key: &'a str, value: i64, min: i64 },
    /// A numeric value above the declared maximum.
    #[error("value too large for key '{key}': the maximum is {max}")]
    AboveMaximum { key: &'a str, value: i64, max: i64 },
    /// A value, or an element of a list value, outside the permitted set.
    #[error("value '{value}' not a permitted choice for key '{key}'")]
    InvalidChoice { key: &'a str, value: &'a str },
    /// Malformed syntax in the config or check string, passed through
    /// verbatim from the scanner.
    #[error("config syntax error: {0}")]
    Syntax(#[from] ParseError),
}

/// Owned, serializable form of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub code: &'static str,
    pub key: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl ValidationError<'_> {
    /// Convert to an owned issue for reporting beyond the inputs' lifetimes.
    pub fn to_issue(&self) -> Issue {
        let (code, key, value) = match *self {
            Self::MalformedKey { key } => ("malformed_key", Some(key.to_string()), None),
            Self::UnknownKey { key } => ("unknown_key", Some(key.to_string()), None),
            Self::TypeMismatch { key, value, .. } => {
                ("type_mismatch", Some(key.to_string()), Some(value.to_string()))
            }
            Self::BelowMinimum { key, value, .. } => {
                ("below_minimum", Some(key.to_string()), Some(value.to_string()))
            }
            Self::AboveMaximum { key, value, .. } => {
                ("above_maximum", Some(key.to_string()), Some(value.to_string()))
            }
            Self::InvalidChoice { key, value } => {
                ("invalid_choice", Some(key.to_string()), Some(value.to_string()))
            }
            Self::Syntax(_) => ("syntax", None, None),
        };

        Issue {
            code,
            key,
            value,
            message: self.to_string(),
        }
    }
}
