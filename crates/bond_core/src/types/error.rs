//! Error types for structured error handling.
//!
//! This module provides:
//! - `PriceFormatError`: errors from decoding 32nds fractional prices
//! - `SideParseError`: unrecognised side or direction code
//!
//! Reference-data misses deliberately have no error type: lookups resolve to
//! sentinel values instead.

use thiserror::Error;

/// Failure to decode a fractional price such as `99-16+`.
///
/// # Examples
/// ```
/// use bond_core::types::PriceFormatError;
///
/// let err = PriceFormatError::MissingSeparator("9916".to_string());
/// assert_eq!(format!("{}", err), "Missing '-' separator in price '9916'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceFormatError {
    /// No hyphen between whole points and 32nds.
    #[error("Missing '-' separator in price '{0}'")]
    MissingSeparator(String),

    /// Whole-point part is not an integer.
    #[error("Invalid whole part in price '{0}'")]
    InvalidWhole(String),

    /// 32nds part is not two digits in 00..=31.
    #[error("Invalid 32nds in price '{0}'")]
    InvalidThirtySeconds(String),

    /// Eighths part is not a digit in 0..=7 or `+`.
    #[error("Invalid eighths in price '{0}'")]
    InvalidEighths(String),
}

/// Unrecognised side code in a feed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown side '{0}'")]
pub struct SideParseError(pub String);
