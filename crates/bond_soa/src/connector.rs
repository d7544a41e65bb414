//! Directional adapters between a service and the outside world.
//!
//! An inbound connector reads a line-oriented source, parses each line into
//! a record and pushes it into its service with `on_message`. An outbound
//! connector receives records from a service and publishes them somewhere
//! else. A few connectors do both.

use std::io::BufRead;

/// Counts reported by an inbound connector after draining a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Non-empty lines read.
    pub lines_read: usize,
    /// Records pushed into the service.
    pub records: usize,
    /// Lines that could not be parsed and were skipped.
    pub skipped: usize,
}

impl IngestSummary {
    /// Adds another summary's counts to this one.
    pub fn merge(&mut self, other: IngestSummary) {
        self.lines_read += other.lines_read;
        self.records += other.records;
        self.skipped += other.skipped;
    }
}

/// Subscribe-only adapter: reads a feed into a service.
pub trait InboundConnector {
    /// Error raised when the source itself cannot be read.
    type Error;

    /// Consumes `source` to exhaustion, feeding every parsed record into
    /// the owning service. Malformed lines are skipped and counted, not
    /// returned as errors.
    fn subscribe<R: BufRead>(&self, source: R) -> Result<IngestSummary, Self::Error>;
}

/// Publish-only adapter: receives records from a service.
pub trait OutboundConnector<V> {
    /// Delivers `data` to the outside world. Delivery failures are logged by
    /// the implementation; the caller is never interrupted.
    fn publish(&self, data: &V);
}

/// Bidirectional adapter.
pub trait Connector<V>: InboundConnector + OutboundConnector<V> {}

impl<V, T> Connector<V> for T where T: InboundConnector + OutboundConnector<V> {}
