//! # Trading Desk Demo Driver
//!
//! Runs the bond trading desk end to end: sample feeds from `desk_inputs`
//! go through the `bond_services` pipeline and historical records are
//! appended to files in the output directory.
//!
//! ## Commands
//!
//! - `trading-desk generate`: write the four sample input feeds
//! - `trading-desk run`: process prices, trades, market data, then inquiries

pub mod commands;
pub mod config;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigError, DeskConfig, FeedNames, GeneratorConfig, GuiConfig};
    pub use crate::error::DeskError;
}
