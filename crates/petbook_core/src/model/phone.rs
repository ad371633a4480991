//! Canonical 10-digit phone number value object.
//!
//! # Responsibility
//! - Reduce human-entered US phone numbers to one canonical form.
//! - Render the canonical form as `AAA-BBB-CCCC` for display.
//!
//! # Invariants
//! - The stored value is always exactly 10 decimal digits, no separators.
//! - The invariant is established solely at parse time; display never
//!   re-validates.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PHONE_DIGITS: usize = 10;

pub type PhoneResult<T> = Result<T, PhoneNumberError>;

/// Validation error raised when normalizing a phone number input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// Digit count after separator stripping is not exactly 10.
    WrongLength { digits: usize },
    /// Input contains a character that is neither digit, hyphen nor space.
    InvalidCharacter { found: char },
}

impl Display for PhoneNumberError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongLength { digits } => {
                write!(f, "phone number not 10 digits (got {digits})")
            }
            Self::InvalidCharacter { found } => {
                write!(f, "phone number contains invalid character `{found}`")
            }
        }
    }
}

impl Error for PhoneNumberError {}

/// Normalized US-style phone number.
///
/// Holds exactly 10 ASCII digits. Construction goes through [`parse`],
/// which is the only write path; everything downstream relies on the
/// canonical shape without checking it again.
///
/// [`parse`]: PhoneNumber::parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalizes a human-entered phone number.
    ///
    /// Hyphens and spaces are stripped as separators; every remaining
    /// character must be a decimal digit and exactly 10 must remain.
    ///
    /// # Errors
    /// - [`PhoneNumberError::InvalidCharacter`] on any other character.
    /// - [`PhoneNumberError::WrongLength`] when the digit count is not 10.
    pub fn parse(input: &str) -> PhoneResult<Self> {
        let mut digits = String::with_capacity(PHONE_DIGITS);
        for ch in input.chars() {
            match ch {
                '-' | ' ' => continue,
                '0'..='9' => digits.push(ch),
                other => return Err(PhoneNumberError::InvalidCharacter { found: other }),
            }
        }

        if digits.len() != PHONE_DIGITS {
            return Err(PhoneNumberError::WrongLength {
                digits: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the canonical 10-digit form without separators.
    pub fn as_digits(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    /// Renders `AAA-BBB-CCCC` by splitting at fixed offsets 3 and 6.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", &self.0[0..3], &self.0[3..6], &self.0[6..10])
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_digits())
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(DeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{PhoneNumber, PhoneNumberError};

    #[test]
    fn parse_strips_hyphens_and_spaces() {
        for input in ["555-555-5555", "555 555 5555", "5555555555", "555-555 5555"] {
            let phone = PhoneNumber::parse(input).unwrap();
            assert_eq!(phone.as_digits(), "5555555555");
        }
    }

    #[test]
    fn display_uses_fixed_3_3_4_grouping() {
        let phone = PhoneNumber::parse("555 243 9988").unwrap();
        assert_eq!(phone.to_string(), "555-243-9988");
    }

    #[test]
    fn parse_rejects_wrong_digit_counts() {
        assert_eq!(
            PhoneNumber::parse("555-555-555").unwrap_err(),
            PhoneNumberError::WrongLength { digits: 9 }
        );
        assert_eq!(
            PhoneNumber::parse("555-555-55555").unwrap_err(),
            PhoneNumberError::WrongLength { digits: 11 }
        );
        assert_eq!(
            PhoneNumber::parse("").unwrap_err(),
            PhoneNumberError::WrongLength { digits: 0 }
        );
    }

    #[test]
    fn parse_rejects_non_digit_characters() {
        assert_eq!(
            PhoneNumber::parse("(555) 555-5555").unwrap_err(),
            PhoneNumberError::InvalidCharacter { found: '(' }
        );
        assert_eq!(
            PhoneNumber::parse("555.555.5555").unwrap_err(),
            PhoneNumberError::InvalidCharacter { found: '.' }
        );
    }
}
