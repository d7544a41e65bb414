//! US Treasury fractional price codec.
//!
//! Treasuries quote in whole points, 32nds of a point, and eighths of a
//! 32nd: `99-16+` is 99 + 16/32 + 4/256. The smallest tick is 1/256.
//!
//! Format: `<whole>-<32nds, two digits><eighths>`, where an eighths value of
//! exactly 4 is written `+`.
//!
//! ```
//! use bond_core::price::{from_fractional, to_fractional};
//!
//! assert_eq!(to_fractional(100.140625), "100-04+");
//! assert_eq!(to_fractional(99.0), "99-000");
//! assert_eq!(from_fractional("99-317").unwrap(), 99.0 + 31.0 / 32.0 + 7.0 / 256.0);
//! ```

use crate::types::PriceFormatError;

/// Number of price ticks per point.
pub const TICKS_PER_POINT: i64 = 256;

/// Value of one tick (1/256 of a point).
pub const TICK: f64 = 1.0 / TICKS_PER_POINT as f64;

/// Encodes a decimal price in 32nds notation.
///
/// The fractional part is rounded to the nearest 1/256. Prices must be
/// finite and non-negative; other input trips a debug assertion and renders
/// as `0-000` in release builds.
pub fn to_fractional(price: f64) -> String {
    debug_assert!(
        price.is_finite() && price >= 0.0,
        "price {price} cannot be written in 32nds"
    );
    let price = if price.is_finite() { price.max(0.0) } else { 0.0 };
    let mut whole = price.trunc() as i64;
    let mut ticks = ((price - whole as f64) * TICKS_PER_POINT as f64).round() as i64;
    if ticks >= TICKS_PER_POINT {
        whole += 1;
        ticks -= TICKS_PER_POINT;
    }

    let thirty_seconds = ticks / 8;
    let eighths = ticks % 8;
    if eighths == 4 {
        format!("{whole}-{thirty_seconds:02}+")
    } else {
        format!("{whole}-{thirty_seconds:02}{eighths}")
    }
}

/// Decodes a 32nds price such as `99-16+` into a decimal price.
///
/// Surrounding whitespace is ignored. Anything after the eighths character
/// is rejected.
pub fn from_fractional(text: &str) -> Result<f64, PriceFormatError> {
    let text = text.trim();
    let (whole, fraction) = text
        .split_once('-')
        .ok_or_else(|| PriceFormatError::MissingSeparator(text.to_string()))?;

    let whole: u32 = whole
        .parse()
        .map_err(|_| PriceFormatError::InvalidWhole(text.to_string()))?;

    let thirty_seconds = fraction
        .get(..2)
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|n| *n < 32)
        .ok_or_else(|| PriceFormatError::InvalidThirtySeconds(text.to_string()))?;

    let eighths = match fraction.get(2..) {
        Some("+") => 4,
        Some(s) if s.len() == 1 => s
            .parse::<u32>()
            .ok()
            .filter(|n| *n < 8)
            .ok_or_else(|| PriceFormatError::InvalidEighths(text.to_string()))?,
        _ => return Err(PriceFormatError::InvalidEighths(text.to_string())),
    };

    Ok(f64::from(whole) + f64::from(thirty_seconds) / 32.0 + f64::from(eighths) / 256.0)
}

/// Rounds a decimal price to the nearest 1/256 tick.
pub fn round_to_tick(price: f64) -> f64 {
    (price * TICKS_PER_POINT as f64).round() / TICKS_PER_POINT as f64
}
