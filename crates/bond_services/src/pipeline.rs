//! Assembly of the desk: every service, its connectors and the fixed
//! listener topology.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bond_core::id::IdGenerator;
use bond_soa::{InboundConnector, IngestSummary, Service};
use tracing::{info, warn};

use crate::algo_execution::{AlgoExecutionService, ExecutionOrder};
use crate::algo_streaming::{AlgoStreamingService, PriceStream};
use crate::error::FeedError;
use crate::execution::ExecutionService;
use crate::feed::open_feed;
use crate::gui::{GuiConnector, GuiService, DEFAULT_MAX_UPDATES, DEFAULT_THROTTLE_MS};
use crate::historical::{HistoricalDataService, MemorySink, RecordSink, ServiceType};
use crate::inquiry::{Inquiry, InquiryService};
use crate::market_data::{MarketDataService, DEFAULT_BOOK_DEPTH};
use crate::position::{Position, PositionService};
use crate::pricing::PricingService;
use crate::risk::{Pv01, RiskService};
use crate::streaming::StreamingService;
use crate::trade_booking::TradeBookingService;

/// Tunables of the assembled desk.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskOptions {
    /// Levels per side in a market data order book
    pub book_depth: usize,
    /// Minimum interval between GUI updates
    pub gui_throttle_ms: u64,
    /// Cap on GUI updates per run
    pub gui_max_updates: usize,
    /// File the GUI connector appends to, if any
    pub gui_output: Option<PathBuf>,
    /// Seed for execution order ids; entropy when `None`
    pub id_seed: Option<u64>,
}

impl Default for DeskOptions {
    fn default() -> Self {
        Self {
            book_depth: DEFAULT_BOOK_DEPTH,
            gui_throttle_ms: DEFAULT_THROTTLE_MS,
            gui_max_updates: DEFAULT_MAX_UPDATES,
            gui_output: None,
            id_seed: None,
        }
    }
}

/// Locations of the four input feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFiles {
    /// Price feed
    pub prices: PathBuf,
    /// Trade feed
    pub trades: PathBuf,
    /// Market data feed
    pub market_data: PathBuf,
    /// Inquiry feed
    pub inquiries: PathBuf,
}

impl FeedFiles {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            prices: dir.join("prices.txt"),
            trades: dir.join("trades.txt"),
            market_data: dir.join("marketdata.txt"),
            inquiries: dir.join("inquiries.txt"),
        }
    }
}

/// Outcome of [`TradingDesk::run_feeds`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Price feed ingestion
    pub prices: IngestSummary,
    /// Trade feed ingestion
    pub trades: IngestSummary,
    /// Market data feed ingestion
    pub market_data: IngestSummary,
    /// Inquiry feed ingestion
    pub inquiries: IngestSummary,
    /// Records persisted per category
    pub persisted: BTreeMap<ServiceType, usize>,
    /// Records the sinks rejected, all categories
    pub sink_failures: usize,
    /// `(sector, pv01 risk)` for the standard sectors
    pub sector_risk: Vec<(String, f64)>,
}

impl RunSummary {
    /// Lines ingested across all feeds.
    pub fn total_ingested(&self) -> IngestSummary {
        let mut total = self.prices;
        total.merge(self.trades);
        total.merge(self.market_data);
        total.merge(self.inquiries);
        total
    }
}

/// The assembled desk.
pub struct TradingDesk {
    pricing: Rc<PricingService>,
    algo_streaming: Rc<AlgoStreamingService>,
    streaming: Rc<StreamingService>,
    gui: Rc<GuiService>,
    market_data: Rc<MarketDataService>,
    algo_execution: Rc<AlgoExecutionService>,
    execution: Rc<ExecutionService>,
    trade_booking: Rc<TradeBookingService>,
    position: Rc<PositionService>,
    risk: Rc<RiskService>,
    inquiry: Rc<InquiryService>,
    streaming_history: Rc<HistoricalDataService<PriceStream>>,
    execution_history: Rc<HistoricalDataService<ExecutionOrder>>,
    position_history: Rc<HistoricalDataService<Position>>,
    risk_history: Rc<HistoricalDataService<Pv01>>,
    inquiry_history: Rc<HistoricalDataService<Inquiry>>,
}

impl TradingDesk {
    /// Builds every service and wires the topology. `sinks` is called once
    /// per historical category.
    pub fn new<F>(options: DeskOptions, mut sinks: F) -> Self
    where
        F: FnMut(ServiceType) -> Box<dyn RecordSink>,
    {
        let gui_connector = match &options.gui_output {
            Some(path) => GuiConnector::with_output(path.clone()),
            None => GuiConnector::default(),
        };
        let ids = match options.id_seed {
            Some(seed) => IdGenerator::from_seed(seed),
            None => IdGenerator::new(),
        };

        let desk = Self {
            pricing: PricingService::new(),
            algo_streaming: AlgoStreamingService::new(),
            streaming: StreamingService::new(),
            gui: GuiService::new(options.gui_throttle_ms, options.gui_max_updates, gui_connector),
            market_data: MarketDataService::new(options.book_depth),
            algo_execution: AlgoExecutionService::with_ids(ids),
            execution: ExecutionService::new(),
            trade_booking: TradeBookingService::new(),
            position: PositionService::new(),
            risk: RiskService::new(),
            inquiry: InquiryService::new(),
            streaming_history: Rc::new(HistoricalDataService::new(
                ServiceType::Streaming,
                sinks(ServiceType::Streaming),
            )),
            execution_history: Rc::new(HistoricalDataService::new(
                ServiceType::Execution,
                sinks(ServiceType::Execution),
            )),
            position_history: Rc::new(HistoricalDataService::new(
                ServiceType::Position,
                sinks(ServiceType::Position),
            )),
            risk_history: Rc::new(HistoricalDataService::new(
                ServiceType::Risk,
                sinks(ServiceType::Risk),
            )),
            inquiry_history: Rc::new(HistoricalDataService::new(
                ServiceType::Inquiry,
                sinks(ServiceType::Inquiry),
            )),
        };
        desk.wire();
        info!(book_depth = desk.market_data.book_depth(), "Trading desk assembled");
        desk
    }

    /// Desk persisting every category into one shared memory sink.
    pub fn in_memory(options: DeskOptions, sink: &MemorySink) -> Self {
        Self::new(options, |_| Box::new(sink.clone()) as Box<dyn RecordSink>)
    }

    fn wire(&self) {
        self.pricing.add_listener(self.algo_streaming.get_listener());
        self.pricing.add_listener(self.gui.get_listener());
        self.algo_streaming.add_listener(self.streaming.get_listener());
        self.streaming.add_listener(self.streaming_history.clone());

        self.market_data.add_listener(self.algo_execution.get_listener());
        self.algo_execution.add_listener(self.execution.get_listener());
        self.execution.add_listener(self.trade_booking.get_listener());
        self.execution.add_listener(self.execution_history.clone());

        self.trade_booking.add_listener(self.position.get_listener());
        self.position.add_listener(self.risk.get_listener());
        self.position.add_listener(self.position_history.clone());
        self.risk.add_listener(self.risk_history.clone());

        self.inquiry.add_listener(self.inquiry_history.clone());
    }

    /// Feeds `cusip,bid,offer` lines into pricing.
    pub fn process_prices<R: BufRead>(&self, source: R) -> Result<IngestSummary, FeedError> {
        self.pricing.connector().subscribe(source)
    }

    /// Feeds `cusip,trade_id,price,book,quantity,side` lines into trade booking.
    pub fn process_trades<R: BufRead>(&self, source: R) -> Result<IngestSummary, FeedError> {
        self.trade_booking.connector().subscribe(source)
    }

    /// Feeds `cusip,price,quantity,side` lines into market data.
    pub fn process_market_data<R: BufRead>(&self, source: R) -> Result<IngestSummary, FeedError> {
        self.market_data.connector().subscribe(source)
    }

    /// Feeds `inquiry_id,cusip,side,quantity,price,state` lines into inquiries.
    pub fn process_inquiries<R: BufRead>(&self, source: R) -> Result<IngestSummary, FeedError> {
        self.inquiry.connector().subscribe(source)
    }

    /// Processes prices, trades, market data, then inquiries, each to
    /// completion before the next.
    pub fn run_feeds(&self, files: &FeedFiles) -> Result<RunSummary, FeedError> {
        let mut summary = RunSummary {
            prices: self.process_prices(open_feed(&files.prices)?)?,
            ..RunSummary::default()
        };
        log_phase("prices", &summary.prices);

        summary.trades = self.process_trades(open_feed(&files.trades)?)?;
        log_phase("trades", &summary.trades);

        summary.market_data = self.process_market_data(open_feed(&files.market_data)?)?;
        log_phase("marketdata", &summary.market_data);

        summary.inquiries = self.process_inquiries(open_feed(&files.inquiries)?)?;
        log_phase("inquiries", &summary.inquiries);

        summary.persisted = self.persisted();
        summary.sink_failures = self.sink_failures();
        summary.sector_risk = self.risk.sector_report();
        if summary.sink_failures > 0 {
            warn!(failures = summary.sink_failures, "Some historical records were not persisted");
        }
        Ok(summary)
    }

    /// Records persisted so far, per category.
    pub fn persisted(&self) -> BTreeMap<ServiceType, usize> {
        BTreeMap::from([
            (ServiceType::Position, self.position_history.persisted()),
            (ServiceType::Risk, self.risk_history.persisted()),
            (ServiceType::Execution, self.execution_history.persisted()),
            (ServiceType::Streaming, self.streaming_history.persisted()),
            (ServiceType::Inquiry, self.inquiry_history.persisted()),
        ])
    }

    /// Records rejected by the sinks so far.
    pub fn sink_failures(&self) -> usize {
        self.position_history.failures()
            + self.risk_history.failures()
            + self.execution_history.failures()
            + self.streaming_history.failures()
            + self.inquiry_history.failures()
    }

    /// Pricing service.
    pub fn pricing(&self) -> &Rc<PricingService> {
        &self.pricing
    }

    /// Algo streaming service.
    pub fn algo_streaming(&self) -> &Rc<AlgoStreamingService> {
        &self.algo_streaming
    }

    /// Streaming service.
    pub fn streaming(&self) -> &Rc<StreamingService> {
        &self.streaming
    }

    /// GUI service.
    pub fn gui(&self) -> &Rc<GuiService> {
        &self.gui
    }

    /// Market data service.
    pub fn market_data(&self) -> &Rc<MarketDataService> {
        &self.market_data
    }

    /// Algo execution service.
    pub fn algo_execution(&self) -> &Rc<AlgoExecutionService> {
        &self.algo_execution
    }

    /// Execution service.
    pub fn execution(&self) -> &Rc<ExecutionService> {
        &self.execution
    }

    /// Trade booking service.
    pub fn trade_booking(&self) -> &Rc<TradeBookingService> {
        &self.trade_booking
    }

    /// Position service.
    pub fn position(&self) -> &Rc<PositionService> {
        &self.position
    }

    /// Risk service.
    pub fn risk(&self) -> &Rc<RiskService> {
        &self.risk
    }

    /// Inquiry service.
    pub fn inquiry(&self) -> &Rc<InquiryService> {
        &self.inquiry
    }
}

fn log_phase(feed: &str, summary: &IngestSummary) {
    info!(
        feed,
        lines = summary.lines_read,
        records = summary.records,
        skipped = summary.skipped,
        "Feed processed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn desk() -> (TradingDesk, MemorySink) {
        let sink = MemorySink::new();
        let options = DeskOptions {
            id_seed: Some(7),
            ..DeskOptions::default()
        };
        (TradingDesk::in_memory(options, &sink), sink)
    }

    #[test]
    fn test_topology_listener_counts() {
        let (desk, _) = desk();
        assert_eq!(desk.pricing().listeners().len(), 2);
        assert_eq!(desk.algo_streaming().listeners().len(), 1);
        assert_eq!(desk.streaming().listeners().len(), 1);
        assert_eq!(desk.gui().listeners().len(), 0);
        assert_eq!(desk.market_data().listeners().len(), 1);
        assert_eq!(desk.algo_execution().listeners().len(), 1);
        assert_eq!(desk.execution().listeners().len(), 2);
        assert_eq!(desk.trade_booking().listeners().len(), 1);
        assert_eq!(desk.position().listeners().len(), 2);
        assert_eq!(desk.risk().listeners().len(), 1);
        assert_eq!(desk.inquiry().listeners().len(), 1);
    }

    #[test]
    fn test_one_price_reaches_streaming_only() {
        let (desk, sink) = desk();
        desk.process_prices(Cursor::new("9128283H1,99-000,99-002\n"))
            .unwrap();

        assert_eq!(sink.count(ServiceType::Streaming), 1);
        assert_eq!(sink.count(ServiceType::Position), 0);
        assert_eq!(sink.len(), 1);
        assert_eq!(desk.gui().accepted(), 1);
    }

    #[test]
    fn test_persisted_counts() {
        let (desk, _) = desk();
        desk.process_trades(Cursor::new(
            "9128283H1,T1,99-000,TRSY1,1000000,BUY\n9128283H1,T2,99-000,TRSY2,1000000,SELL\n",
        ))
        .unwrap();

        let persisted = desk.persisted();
        assert_eq!(persisted[&ServiceType::Position], 2);
        assert_eq!(persisted[&ServiceType::Risk], 2);
        assert_eq!(persisted[&ServiceType::Execution], 0);
        assert_eq!(desk.sink_failures(), 0);
    }

    #[test]
    fn test_run_feeds_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (desk, _) = desk();
        let err = desk.run_feeds(&FeedFiles::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, FeedError::Open { .. }));
    }
}
