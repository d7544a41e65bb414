//! Product, side, and error types shared by every desk layer.
//!
//! This module provides:
//! - `bond`: US Treasury product type with its identifier scheme
//! - `side`: order-book side (`PricingSide`) and trade direction (`Side`)
//! - `error`: structured error types for price and side parsing
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level.

pub mod bond;
pub mod error;
pub mod side;

pub use bond::{Bond, BondIdType};
pub use error::{PriceFormatError, SideParseError};
pub use side::{PricingSide, Side};
