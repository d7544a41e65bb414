//! # bond_core: Foundation Layer for the Bond Trading Desk
//!
//! ## Layer 1 (Foundation) Role
//!
//! bond_core is the bottom layer of the desk workspace, providing:
//! - Product and side types: `Bond`, `BondIdType`, `PricingSide`, `Side` (`types`)
//! - Static US Treasury reference data: `get_bond`, `get_pv01_value` (`reference`)
//! - The 32nds fractional price codec: `to_fractional`, `from_fractional` (`price`)
//! - A reproducible uniform sequence generator: `UniformGenerator` (`rng`)
//! - Random order/trade identifiers: `IdGenerator`, `generate_id` (`id`)
//! - Millisecond wall-clock timestamps: `timestamp` (`time`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other desk crates. External dependencies:
//! - chrono: dates and local wall-clock time
//! - rand: entropy source for identifiers
//! - thiserror: error enums
//! - serde: serialisation support (opt-in `serde` feature)
//!
//! ## Usage Examples
//!
//! ```rust
//! use bond_core::price::{from_fractional, to_fractional};
//! use bond_core::reference::{get_bond, get_pv01_value};
//!
//! let bond = get_bond("9128283H1");
//! assert_eq!(bond.ticker(), "US2Y");
//! assert_eq!(get_pv01_value("UNKNOWN"), 0.0);
//!
//! assert_eq!(to_fractional(100.140625), "100-04+");
//! assert_eq!(from_fractional("100-04+").unwrap(), 100.140625);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod id;
pub mod price;
pub mod reference;
pub mod rng;
pub mod time;
pub mod types;

pub use types::{Bond, BondIdType, PriceFormatError, PricingSide, Side, SideParseError};
