//! Error types for the trading desk demo.

use thiserror::Error;

/// Desk driver error type
#[derive(Debug, Error)]
pub enum DeskError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Feed ingestion error
    #[error("Feed error: {0}")]
    Feed(#[from] bond_services::FeedError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
