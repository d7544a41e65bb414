//! # Desk Inputs
//!
//! Sample input feeds for the trading desk demo.
//!
//! Generates the four line-oriented feeds the desk ingests (prices, trades,
//! market data, inquiries) from the static Treasury reference data. Output
//! is reproducible for a given seed.
//!
//! ## Modules
//!
//! - [`file_source`]: one generator per feed plus [`file_source::write_all`]

pub mod file_source;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::file_source::{
        write_all, FeedGenerator, GeneratorSettings, InquiryGenerator, MarketDataGenerator,
        PriceGenerator, TradeGenerator,
    };
}
