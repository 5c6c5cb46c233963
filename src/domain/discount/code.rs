//! Discount code value object and generator.
//!
//! Format: `HAIR-XXXXXX` where the suffix is drawn from an alphabet without
//! visually ambiguous characters (`0`, `O`, `1`, `I`).
//!
//! # Validation Rules
//!
//! - Input is trimmed and normalized to uppercase
//! - Prefix: exactly `HAIR`
//! - Suffix: exactly 6 characters from [`CODE_ALPHABET`]

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Constant prefix shared by every issued code.
pub const CODE_PREFIX: &str = "HAIR";

/// Number of random characters after the prefix.
pub const CODE_SUFFIX_LEN: usize = 6;

/// 32 unambiguous symbols: A-Z without I and O, digits 2-9.
pub const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

const SEPARATOR: char = '-';

/// A discount code string in canonical (uppercase) form.
///
/// Generated codes carry no uniqueness guarantee on their own; the
/// issuing flow checks the store and retries on collision.
///
/// # Example
///
/// ```
/// use consultation_discounts::domain::discount::DiscountCode;
///
/// let code = DiscountCode::parse("  hair-ab23cd ").unwrap();
/// assert_eq!(code.as_str(), "HAIR-AB23CD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountCode(String);

impl DiscountCode {
    /// Generates a fresh code from the thread-local CSPRNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generates a code from the supplied random source.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix: String = (0..CODE_SUFFIX_LEN)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        Self(format!("{}{}{}", CODE_PREFIX, SEPARATOR, suffix))
    }

    /// Parses user input into a canonical code.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - Input is empty after trimming
    /// - Prefix or separator is wrong
    /// - Suffix length differs from [`CODE_SUFFIX_LEN`]
    /// - Suffix contains characters outside [`CODE_ALPHABET`]
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }

        let (prefix, suffix) = normalized.split_once(SEPARATOR).ok_or_else(|| {
            ValidationError::invalid_format(
                "code",
                format!("expected format {}-XXXXXX, got '{}'", CODE_PREFIX, normalized),
            )
        })?;

        if prefix != CODE_PREFIX {
            return Err(ValidationError::invalid_format(
                "code_prefix",
                format!("expected '{}'", CODE_PREFIX),
            ));
        }

        if suffix.len() != CODE_SUFFIX_LEN {
            return Err(ValidationError::out_of_range(
                "code_suffix_length",
                CODE_SUFFIX_LEN as i32,
                CODE_SUFFIX_LEN as i32,
                suffix.len() as i32,
            ));
        }

        if !suffix.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            return Err(ValidationError::invalid_format(
                "code_suffix",
                "contains characters outside the code alphabet",
            ));
        }

        Ok(Self(normalized))
    }

    /// Wraps a code read back from storage.
    ///
    /// Stored codes were validated when issued, so no format check runs here.
    pub fn from_persisted(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the full code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the random suffix after the separator.
    pub fn suffix(&self) -> &str {
        self.0
            .split_once(SEPARATOR)
            .map(|(_, suffix)| suffix)
            .unwrap_or(&self.0)
    }
}

impl std::fmt::Display for DiscountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for DiscountCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
