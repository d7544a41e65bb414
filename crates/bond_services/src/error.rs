//! Error types for feed ingestion and historical persistence.
//!
//! Neither type crosses a listener callback: feed errors are returned from
//! `subscribe` (or logged and counted when they concern a single line), and
//! sink errors are logged by the historical service that hit them.

use std::path::PathBuf;

use bond_core::{PriceFormatError, SideParseError};
use thiserror::Error;

/// Failure while reading or parsing an input feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Feed file could not be opened.
    #[error("Cannot open feed '{}': {source}", path.display())]
    Open {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Reading the source failed part-way; aborts the feed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Line-level CSV decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Line has fewer fields than the grammar requires.
    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    /// Price in neither 32nds nor decimal notation.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceFormatError),

    /// Unparseable or negative decimal price.
    #[error("Invalid decimal price '{0}'")]
    DecimalPrice(String),

    /// Quantity is not a non-negative integer.
    #[error("Invalid quantity '{0}'")]
    Quantity(String),

    /// Unknown side code.
    #[error("Invalid side: {0}")]
    Side(#[from] SideParseError),

    /// Unknown inquiry state.
    #[error("Invalid inquiry state '{0}'")]
    InquiryState(String),
}

impl FeedError {
    /// True for errors that make the rest of the source unreadable.
    pub fn is_fatal(&self) -> bool {
        match self {
            FeedError::Open { .. } | FeedError::Io(_) => true,
            FeedError::Csv(e) => e.is_io_error(),
            _ => false,
        }
    }
}

/// Failure to append a historical record.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Output file could not be opened or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
