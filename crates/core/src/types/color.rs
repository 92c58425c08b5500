//! Hex color code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ColorHex`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorHexError {
    /// The input string is empty.
    #[error("color code cannot be empty")]
    Empty,
    /// The input does not start with `#`.
    #[error("color code must start with #")]
    MissingHash,
    /// The input has the wrong number of digits.
    #[error("color code must have 3 or 6 hex digits, got {0}")]
    BadLength(usize),
    /// The input contains a non-hex digit.
    #[error("color code contains non-hex digit {0:?}")]
    InvalidDigit(char),
}

/// A CSS-style hex color code such as `#1e3a8a`.
///
/// ## Constraints
///
/// - Starts with `#`
/// - Followed by exactly 3 or 6 ASCII hex digits
/// - Stored lowercase, so `#FFFFFF` and `#ffffff` compare equal
///
/// ## Examples
///
/// ```
/// use atelier_core::ColorHex;
///
/// assert!(ColorHex::parse("#1e3a8a").is_ok());
/// assert!(ColorHex::parse("#FFF").is_ok());
///
/// assert!(ColorHex::parse("").is_err());        // empty
/// assert!(ColorHex::parse("1e3a8a").is_err());  // missing #
/// assert!(ColorHex::parse("#12345").is_err());  // wrong length
/// assert!(ColorHex::parse("#ggg").is_err());    // not hex
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ColorHex(String);

impl ColorHex {
    /// Parse a `ColorHex` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, lacks the leading `#`,
    /// has a digit count other than 3 or 6, or contains a non-hex digit.
    pub fn parse(s: &str) -> Result<Self, ColorHexError> {
        if s.is_empty() {
            return Err(ColorHexError::Empty);
        }

        let digits = s.strip_prefix('#').ok_or(ColorHexError::MissingHash)?;

        let len = digits.chars().count();
        if len != 3 && len != 6 {
            return Err(ColorHexError::BadLength(len));
        }

        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorHexError::InvalidDigit(bad));
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Black, used when a color option carries no code.
    #[must_use]
    pub fn black() -> Self {
        Self("#000000".to_owned())
    }

    /// Returns the color code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ColorHex {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for ColorHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ColorHex {
    type Err = ColorHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColorHex {
    type Error = ColorHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColorHex> for String {
    fn from(color: ColorHex) -> Self {
        color.0
    }
}

impl AsRef<str> for ColorHex {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
