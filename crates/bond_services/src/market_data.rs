//! Order-book market data.
//!
//! Feed line: `cusip,price,quantity,side` with side `BID` or `OFFER`. Every
//! `2 * book_depth` consecutive lines of one CUSIP form a book. A group cut
//! short by a malformed line, a change of CUSIP, or the end of the feed is
//! dropped and its lines are counted as skipped.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::rc::Rc;

use bond_core::price::TICKS_PER_POINT;
use bond_core::PricingSide;
use bond_soa::{InboundConnector, IngestSummary, Keyed, KeyedStore};
use csv::StringRecord;
use tracing::{debug, warn};

use crate::error::FeedError;
use crate::feed::{field, ingest, parse_price, parse_quantity, resolve_bond};
use crate::macros::keyed_service;

/// Default number of levels per side.
pub const DEFAULT_BOOK_DEPTH: usize = 5;

/// A single resting order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order {
    /// Price level
    pub price: f64,
    /// Size at the level
    pub quantity: i64,
    /// Bid or offer
    pub side: PricingSide,
}

impl Order {
    /// New order.
    pub fn new(price: f64, quantity: i64, side: PricingSide) -> Self {
        Self {
            price,
            quantity,
            side,
        }
    }
}

/// Best bid and best offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BidOffer {
    /// Highest bid
    pub bid_order: Order,
    /// Lowest offer
    pub offer_order: Order,
}

impl BidOffer {
    /// Offer price minus bid price.
    pub fn spread(&self) -> f64 {
        self.offer_order.price - self.bid_order.price
    }
}

/// Bid and offer stacks for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBook {
    /// CUSIP
    pub product_id: String,
    /// Bid levels
    pub bid_stack: Vec<Order>,
    /// Offer levels
    pub offer_stack: Vec<Order>,
}

impl OrderBook {
    /// New book.
    pub fn new(product_id: impl Into<String>, bid_stack: Vec<Order>, offer_stack: Vec<Order>) -> Self {
        Self {
            product_id: product_id.into(),
            bid_stack,
            offer_stack,
        }
    }

    /// Highest bid and lowest offer, `None` if either stack is empty.
    pub fn bid_offer(&self) -> Option<BidOffer> {
        let bid_order = self
            .bid_stack
            .iter()
            .copied()
            .max_by(|a, b| a.price.total_cmp(&b.price))?;
        let offer_order = self
            .offer_stack
            .iter()
            .copied()
            .min_by(|a, b| a.price.total_cmp(&b.price))?;
        Some(BidOffer {
            bid_order,
            offer_order,
        })
    }

    /// Book with quantities summed per price level; bids best (highest)
    /// first, offers best (lowest) first.
    pub fn aggregated(&self) -> OrderBook {
        let mut bid_stack = aggregate_levels(&self.bid_stack, PricingSide::Bid);
        bid_stack.reverse();
        let offer_stack = aggregate_levels(&self.offer_stack, PricingSide::Offer);
        OrderBook::new(self.product_id.clone(), bid_stack, offer_stack)
    }
}

/// Sums quantities per 1/256 tick, ascending by price.
fn aggregate_levels(orders: &[Order], side: PricingSide) -> Vec<Order> {
    let mut levels: BTreeMap<i64, (f64, i64)> = BTreeMap::new();
    for order in orders {
        let tick = (order.price * TICKS_PER_POINT as f64).round() as i64;
        let level = levels.entry(tick).or_insert((order.price, 0));
        level.1 = level.1.saturating_add(order.quantity);
    }
    levels
        .into_values()
        .map(|(price, quantity)| Order::new(price, quantity, side))
        .collect()
}

impl Keyed for OrderBook {
    type Key = String;

    fn key(&self) -> String {
        self.product_id.clone()
    }
}

/// Entry-point service for order books.
#[derive(Debug)]
pub struct MarketDataService {
    store: KeyedStore<OrderBook>,
    book_depth: usize,
}

impl MarketDataService {
    /// Service expecting `book_depth` levels per side (at least 1).
    pub fn new(book_depth: usize) -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("market_data"),
            book_depth: book_depth.max(1),
        })
    }

    /// Feed connector bound to this service.
    pub fn connector(self: &Rc<Self>) -> MarketDataConnector {
        MarketDataConnector {
            service: Rc::clone(self),
        }
    }

    /// Levels per side.
    pub fn book_depth(&self) -> usize {
        self.book_depth
    }

    /// Best bid and offer for `product_id`.
    pub fn best_bid_offer(&self, product_id: &str) -> Option<BidOffer> {
        self.store.get(&product_id.to_string())?.bid_offer()
    }

    /// Book for `product_id` with quantities aggregated per price level.
    pub fn aggregate_depth(&self, product_id: &str) -> Option<OrderBook> {
        self.store
            .get(&product_id.to_string())
            .map(|book| book.aggregated())
    }
}

keyed_service!(MarketDataService, OrderBook);

/// Subscribe-only connector reading the market data feed.
pub struct MarketDataConnector {
    service: Rc<MarketDataService>,
}

impl InboundConnector for MarketDataConnector {
    type Error = FeedError;

    fn subscribe<R: BufRead>(&self, source: R) -> Result<IngestSummary, FeedError> {
        let mut group = BookGroup::new(self.service.book_depth);
        let mut discarded = 0usize;

        let mut summary = ingest("marketdata", source, |record| {
            let (product_id, order) = match parse_order(record) {
                Ok(parsed) => parsed,
                Err(e) => {
                    discarded += group.discard("malformed line inside order book");
                    return Err(e);
                }
            };
            if group.product_id.as_deref().is_some_and(|id| id != product_id) {
                discarded += group.discard("order book interrupted by another CUSIP");
            }

            if let Some(book) = group.push(product_id, order) {
                debug!(cusip = %book.product_id, "Order book");
                bond_soa::Service::on_message(self.service.as_ref(), book);
            }
            Ok(())
        })?;

        discarded += group.discard("incomplete trailing order book");
        summary.skipped += discarded;
        summary.records -= discarded;
        Ok(summary)
    }
}

/// Lines collected so far for the book being read.
struct BookGroup {
    size: usize,
    product_id: Option<String>,
    bid_stack: Vec<Order>,
    offer_stack: Vec<Order>,
}

impl BookGroup {
    fn new(book_depth: usize) -> Self {
        Self {
            size: book_depth * 2,
            product_id: None,
            bid_stack: Vec::with_capacity(book_depth),
            offer_stack: Vec::with_capacity(book_depth),
        }
    }

    fn len(&self) -> usize {
        self.bid_stack.len() + self.offer_stack.len()
    }

    /// Adds a line, returning the book once the group is full.
    fn push(&mut self, product_id: &str, order: Order) -> Option<OrderBook> {
        if self.product_id.is_none() {
            self.product_id = Some(product_id.to_string());
            resolve_bond("marketdata", product_id);
        }
        match order.side {
            PricingSide::Bid => self.bid_stack.push(order),
            PricingSide::Offer => self.offer_stack.push(order),
        }
        if self.len() < self.size {
            return None;
        }
        let product_id = self.product_id.take().unwrap_or_default();
        Some(OrderBook::new(
            product_id,
            std::mem::take(&mut self.bid_stack),
            std::mem::take(&mut self.offer_stack),
        ))
    }

    /// Drops a partial group, returning how many lines it held.
    fn discard(&mut self, reason: &'static str) -> usize {
        let lines = self.len();
        if lines > 0 {
            warn!(cusip = ?self.product_id, lines, reason, "Discarding partial order book");
        }
        self.product_id = None;
        self.bid_stack.clear();
        self.offer_stack.clear();
        lines
    }
}

fn parse_order(record: &StringRecord) -> Result<(&str, Order), FeedError> {
    let product_id = field(record, 0, "cusip")?;
    let price = parse_price(field(record, 1, "price")?)?;
    let quantity = parse_quantity(field(record, 2, "quantity")?)?;
    let side: PricingSide = field(record, 3, "side")?.parse()?;
    Ok((product_id, Order::new(price, quantity, side)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_soa::Service;
    use std::io::Cursor;

    const BOOK: &str = "\
9128283H1,99-000,1000000,BID
9128283H1,99-002,1000000,OFFER
9128283H1,98-316,2000000,BID
9128283H1,99-004,2000000,OFFER
";

    #[test]
    fn test_groups_lines_into_books() {
        let service = MarketDataService::new(2);
        let summary = service.connector().subscribe(Cursor::new(BOOK)).unwrap();
        assert_eq!(summary.records, 4);

        let book = service.get_data(&"9128283H1".to_string()).unwrap();
        assert_eq!(book.bid_stack.len(), 2);
        assert_eq!(book.offer_stack.len(), 2);

        let best = service.best_bid_offer("9128283H1").unwrap();
        assert_eq!(best.bid_order.price, 99.0);
        assert_eq!(best.offer_order.price, 99.0 + 2.0 / 256.0);
        assert_eq!(best.spread(), 1.0 / 128.0);
    }

    #[test]
    fn test_incomplete_trailing_group_is_discarded() {
        let feed = format!("{BOOK}912810RZ3,100-000,1000000,BID\n");
        let service = MarketDataService::new(2);
        let summary = service.connector().subscribe(Cursor::new(feed)).unwrap();
        assert_eq!(summary.records, 4);
        assert_eq!(summary.skipped, 1);
        assert!(service.get_data(&"912810RZ3".to_string()).is_none());
    }

    #[test]
    fn test_malformed_line_does_not_count_towards_group() {
        let feed = format!("9128283H1,99-000,lots,BID\n{BOOK}");
        let service = MarketDataService::new(2);
        let summary = service.connector().subscribe(Cursor::new(feed)).unwrap();
        assert_eq!(summary.skipped, 1);
        assert!(service.best_bid_offer("9128283H1").is_some());
    }

    #[test]
    fn test_bad_line_only_loses_its_own_book() {
        let feed = "\
9128283H1,99-000,1000000,BID
9128283H1,bad,1000000,OFFER
912810RZ3,100-000,1000000,BID
912810RZ3,100-002,1000000,OFFER
912828M80,98-000,1000000,BID
912828M80,98-002,1000000,OFFER
";
        let service = MarketDataService::new(1);
        let summary = service.connector().subscribe(Cursor::new(feed)).unwrap();

        assert!(service.get_data(&"9128283H1".to_string()).is_none());
        let rz3 = service.best_bid_offer("912810RZ3").unwrap();
        assert_eq!(rz3.bid_order.price, 100.0);
        assert_eq!(rz3.offer_order.price, 100.0 + 2.0 / 256.0);
        let m80 = service.get_data(&"912828M80".to_string()).unwrap();
        assert!(m80.bid_stack.iter().chain(&m80.offer_stack).all(|o| o.price < 99.0));
        assert_eq!(summary.lines_read, 6);
        assert_eq!(summary.records, 4);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn test_change_of_cusip_starts_a_new_book() {
        let feed = format!("912810RZ3,100-000,1000000,BID\n{BOOK}");
        let service = MarketDataService::new(2);
        let summary = service.connector().subscribe(Cursor::new(feed)).unwrap();

        assert!(service.get_data(&"912810RZ3".to_string()).is_none());
        let book = service.get_data(&"9128283H1".to_string()).unwrap();
        assert_eq!(book.bid_stack.len(), 2);
        assert_eq!(book.offer_stack.len(), 2);
        assert_eq!(summary.records, 4);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_aggregate_depth() {
        let service = MarketDataService::new(3);
        service.on_message(OrderBook::new(
            "912828M80",
            vec![
                Order::new(99.0, 1_000_000, PricingSide::Bid),
                Order::new(98.5, 3_000_000, PricingSide::Bid),
                Order::new(99.0, 2_000_000, PricingSide::Bid),
            ],
            vec![
                Order::new(99.5, 1_000_000, PricingSide::Offer),
                Order::new(99.25, 4_000_000, PricingSide::Offer),
                Order::new(99.5, 5_000_000, PricingSide::Offer),
            ],
        ));

        let depth = service.aggregate_depth("912828M80").unwrap();
        assert_eq!(
            depth.bid_stack,
            vec![
                Order::new(99.0, 3_000_000, PricingSide::Bid),
                Order::new(98.5, 3_000_000, PricingSide::Bid),
            ]
        );
        assert_eq!(
            depth.offer_stack,
            vec![
                Order::new(99.25, 4_000_000, PricingSide::Offer),
                Order::new(99.5, 6_000_000, PricingSide::Offer),
            ]
        );
        assert!(service.aggregate_depth("UNKNOWN").is_none());
    }

    #[test]
    fn test_one_sided_book_has_no_bid_offer() {
        let book = OrderBook::new("x", vec![Order::new(99.0, 1, PricingSide::Bid)], vec![]);
        assert!(book.bid_offer().is_none());
    }
}
