//! Trade booking from the trade feed and from executions.
//!
//! Feed line: `cusip,trade_id,price,book,quantity,side` with side `BUY` or
//! `SELL`. Executions are booked as well: hitting the bid is a sale, lifting
//! the offer a purchase. Execution bookings rotate through [`BOOKS`].

use std::cell::Cell;
use std::io::BufRead;
use std::rc::Rc;

use bond_core::{PricingSide, Side};
use bond_soa::{InboundConnector, IngestSummary, Keyed, KeyedStore, ListenerRef, ServiceListener};
use tracing::debug;

use crate::algo_execution::ExecutionOrder;
use crate::error::FeedError;
use crate::feed::{field, ingest, parse_price, parse_quantity, resolve_bond};
use crate::macros::keyed_service;

/// Books executions are allocated to, in rotation.
pub const BOOKS: [&str; 3] = ["TRSY1", "TRSY2", "TRSY3"];

/// A booked trade.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    /// CUSIP
    pub product_id: String,
    /// Unique trade id
    pub trade_id: String,
    /// Trade price
    pub price: f64,
    /// Book the trade belongs to
    pub book: String,
    /// Face amount
    pub quantity: i64,
    /// Our direction
    pub side: Side,
}

impl Keyed for Trade {
    type Key = String;

    fn key(&self) -> String {
        self.trade_id.clone()
    }
}

/// Books trades and fans them out to positions.
#[derive(Debug)]
pub struct TradeBookingService {
    store: KeyedStore<Trade>,
    allocations: Cell<usize>,
}

impl TradeBookingService {
    /// Empty service.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("trade_booking"),
            allocations: Cell::new(0),
        })
    }

    /// Feed connector bound to this service.
    pub fn connector(self: &Rc<Self>) -> TradeBookingConnector {
        TradeBookingConnector {
            service: Rc::clone(self),
        }
    }

    /// Listener to register on the execution service.
    pub fn get_listener(self: &Rc<Self>) -> ListenerRef<ExecutionOrder> {
        self.clone()
    }

    /// Books a trade and fans it out.
    pub fn book_trade(&self, trade: Trade) {
        debug!(
            cusip = %trade.product_id,
            trade_id = %trade.trade_id,
            book = %trade.book,
            side = %trade.side,
            quantity = trade.quantity,
            "Booking trade"
        );
        self.store.publish(trade);
    }

    /// Trade for an execution, allocated to the next book in rotation.
    pub fn trade_from_execution(&self, order: &ExecutionOrder) -> Trade {
        let slot = self.allocations.get();
        self.allocations.set(slot + 1);
        Trade {
            product_id: order.product_id.clone(),
            trade_id: order.order_id.clone(),
            price: order.price,
            book: BOOKS[slot % BOOKS.len()].to_string(),
            quantity: order.total_quantity(),
            side: match order.side {
                PricingSide::Bid => Side::Sell,
                PricingSide::Offer => Side::Buy,
            },
        }
    }
}

keyed_service!(TradeBookingService, Trade => book_trade);

impl ServiceListener<ExecutionOrder> for TradeBookingService {
    fn process_add(&self, data: &ExecutionOrder) {
        let trade = self.trade_from_execution(data);
        self.book_trade(trade);
    }
}

/// Subscribe-only connector reading the trade feed.
pub struct TradeBookingConnector {
    service: Rc<TradeBookingService>,
}

impl InboundConnector for TradeBookingConnector {
    type Error = FeedError;

    fn subscribe<R: BufRead>(&self, source: R) -> Result<IngestSummary, FeedError> {
        ingest("trades", source, |record| {
            let trade = Trade {
                product_id: field(record, 0, "cusip")?.to_string(),
                trade_id: field(record, 1, "trade_id")?.to_string(),
                price: parse_price(field(record, 2, "price")?)?,
                book: field(record, 3, "book")?.to_string(),
                quantity: parse_quantity(field(record, 4, "quantity")?)?,
                side: field(record, 5, "side")?.parse()?,
            };
            resolve_bond("trades", &trade.product_id);
            self.service.book_trade(trade);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo_execution::OrderType;
    use bond_soa::Service;
    use std::io::Cursor;

    #[test]
    fn test_trade_feed() {
        let service = TradeBookingService::new();
        let summary = service
            .connector()
            .subscribe(Cursor::new(
                "9128283H1,T1,99-000,TRSY1,1000000,BUY\n\
                 9128283L2,T2,100.0,TRSY2,2000000,SELL\n\
                 9128283L2,T3,100.0,TRSY2,2000000,HOLD\n",
            ))
            .unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.skipped, 1);

        let t2 = service.get_data(&"T2".to_string()).unwrap();
        assert_eq!(t2.side, Side::Sell);
        assert_eq!(t2.price, 100.0);
        assert_eq!(t2.book, "TRSY2");
        assert_eq!(t2.quantity, 2_000_000);
    }

    #[test]
    fn test_executions_are_booked() {
        let service = TradeBookingService::new();
        let mut order = ExecutionOrder {
            product_id: "912810RZ3".into(),
            side: PricingSide::Bid,
            order_id: "ORDER0000001".into(),
            order_type: OrderType::Market,
            price: 100.0,
            visible_quantity: 1_000_000,
            hidden_quantity: 500_000,
            parent_order_id: String::new(),
            is_child_order: false,
        };
        service.process_add(&order);
        order.side = PricingSide::Offer;
        order.order_id = "ORDER0000002".into();
        service.process_add(&order);

        let first = service.get_data(&"ORDER0000001".to_string()).unwrap();
        assert_eq!(first.side, Side::Sell);
        assert_eq!(first.book, "TRSY1");
        assert_eq!(first.quantity, 1_500_000);

        let second = service.get_data(&"ORDER0000002".to_string()).unwrap();
        assert_eq!(second.side, Side::Buy);
        assert_eq!(second.book, "TRSY2");
    }
}
