//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits at all.
    #[error("phone number cannot be empty")]
    Empty,
    /// Too few digits after stripping separators.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum digit count.
        min: u8,
    },
    /// Too many digits after stripping separators.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum digit count.
        max: u8,
    },
}

/// Inclusive digit-count bounds for phone validation.
///
/// The bounds are configuration, not a constant: deployments targeting a
/// single country can tighten them (e.g. 10..=13 for India with country
/// code) while the default accepts any plausible international number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneLimits {
    /// Minimum number of digits (inclusive).
    pub min_digits: u8,
    /// Maximum number of digits (inclusive).
    pub max_digits: u8,
}

impl Default for PhoneLimits {
    fn default() -> Self {
        Self {
            min_digits: 6,
            max_digits: 13,
        }
    }
}

/// A buyer phone number, stored as bare digits.
///
/// Parsing strips every non-digit character (`+`, spaces, dashes,
/// parentheses, ...) and validates the remaining digit count against
/// [`PhoneLimits`]. The normalized digit string is what gets sent to the
/// backend and prefilled into checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from free-form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits or the digit count
    /// falls outside `limits`.
    pub fn parse(s: &str, limits: PhoneLimits) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }
        if digits.len() < usize::from(limits.min_digits) {
            return Err(PhoneError::TooShort {
                min: limits.min_digits,
            });
        }
        if digits.len() > usize::from(limits.max_digits) {
            return Err(PhoneError::TooLong {
                max: limits.max_digits,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the normalized digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner digit string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_non_digits() {
        let phone = Phone::parse("+91 (98765) 432-10", PhoneLimits::default()).unwrap();
        assert_eq!(phone.as_str(), "919876543210");
    }

    #[test]
    fn test_default_bounds_are_inclusive() {
        let limits = PhoneLimits::default();
        // 6 and 13 digits are both accepted exactly at the bounds.
        assert!(Phone::parse("123456", limits).is_ok());
        assert!(Phone::parse("1234567890123", limits).is_ok());
        // 5 and 14 digits are rejected.
        assert!(matches!(
            Phone::parse("12345", limits),
            Err(PhoneError::TooShort { min: 6 })
        ));
        assert!(matches!(
            Phone::parse("12345678901234", limits),
            Err(PhoneError::TooLong { max: 13 })
        ));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            Phone::parse("", PhoneLimits::default()),
            Err(PhoneError::Empty)
        ));
        assert!(matches!(
            Phone::parse("+- ()", PhoneLimits::default()),
            Err(PhoneError::Empty)
        ));
    }

    #[test]
    fn test_custom_limits() {
        let limits = PhoneLimits {
            min_digits: 10,
            max_digits: 13,
        };
        assert!(Phone::parse("987654321", limits).is_err()); // 9 digits
        assert!(Phone::parse("9876543210", limits).is_ok()); // 10 digits
    }
}
