//! # bond_services: Processing Stages of the Bond Trading Desk
//!
//! ## Layer 3 (Application) Role
//!
//! Concrete services built on `bond_soa`, their connectors, the historical
//! sinks and the assembled [`TradingDesk`] pipeline.
//!
//! ## Architecture
//!
//! ```text
//! prices ──▶ Pricing ──┬─▶ AlgoStreaming ──▶ Streaming ──▶ Hist(STREAMING)
//!                      └─▶ GUI
//! market data ──▶ MarketData ──▶ AlgoExecution ──▶ Execution ──┬─▶ Hist(EXECUTION)
//!                                                              └─▶ TradeBooking
//! trades ──────────────────────────────────────────────────────────▶ TradeBooking
//! TradeBooking ──▶ Position ──┬─▶ Risk ──▶ Hist(RISK)
//!                             └─▶ Hist(POSITION)
//! inquiries ──▶ Inquiry ◀──▶ InquiryConnector
//!                  └─▶ Hist(INQUIRY)
//! ```
//!
//! ## Usage Examples
//!
//! ```rust
//! use bond_services::prelude::*;
//! use std::io::Cursor;
//!
//! let sinks = MemorySink::new();
//! let desk = TradingDesk::in_memory(DeskOptions::default(), &sinks);
//!
//! desk.process_trades(Cursor::new("9128283H1,T1,99-000,TRSY1,1000000,BUY\n"))
//!     .unwrap();
//!
//! assert_eq!(sinks.count(ServiceType::Position), 1);
//! assert_eq!(sinks.count(ServiceType::Risk), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod macros;

pub mod algo_execution;
pub mod algo_streaming;
pub mod error;
pub mod execution;
pub mod feed;
pub mod gui;
pub mod historical;
pub mod inquiry;
pub mod market_data;
pub mod pipeline;
pub mod position;
pub mod pricing;
pub mod risk;
pub mod streaming;
pub mod trade_booking;

pub use algo_execution::{AlgoExecution, AlgoExecutionService, ExecutionOrder, OrderType};
pub use algo_streaming::{AlgoStream, AlgoStreamingService, PriceStream, PriceStreamOrder};
pub use error::{FeedError, SinkError};
pub use execution::{ExchangeConnector, ExecutionService, Market};
pub use gui::{GuiConnector, GuiService, GuiUpdate};
pub use historical::{
    CsvFileSink, HistoricalConnector, HistoricalDataService, HistoricalRecord, MemorySink,
    Persistable, RecordSink, ServiceType,
};
pub use inquiry::{Inquiry, InquiryConnector, InquiryService, InquiryState};
pub use market_data::{BidOffer, MarketDataConnector, MarketDataService, Order, OrderBook};
pub use pipeline::{DeskOptions, FeedFiles, RunSummary, TradingDesk};
pub use position::{Position, PositionService};
pub use pricing::{Price, PricingConnector, PricingService};
pub use risk::{BucketedSector, Pv01, RiskService};
pub use streaming::{QuoteConnector, StreamingService};
pub use trade_booking::{Trade, TradeBookingConnector, TradeBookingService};

/// Commonly used types for driving the desk.
pub mod prelude {
    pub use crate::historical::{CsvFileSink, MemorySink, RecordSink, ServiceType};
    pub use crate::pipeline::{DeskOptions, FeedFiles, RunSummary, TradingDesk};
    pub use crate::{FeedError, SinkError};
    pub use bond_soa::{InboundConnector, IngestSummary, Service, ServiceListener};
}
