//! Spread-crossing execution algorithm.
//!
//! When the top of a book is at most 1/128 wide, the algo crosses it,
//! alternating between hitting the bid and lifting the offer, with a market
//! order for the full size at the best level.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use bond_core::id::IdGenerator;
use bond_core::price::to_fractional;
use bond_core::PricingSide;
use bond_soa::{Keyed, KeyedStore, ListenerRef, ServiceListener};
use tracing::{debug, trace};

use crate::historical::Persistable;
use crate::macros::keyed_service;
use crate::market_data::OrderBook;

/// Widest top-of-book spread the algo will cross.
pub const CROSSING_SPREAD: f64 = 1.0 / 128.0;

/// Exchange order types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// Fill or kill
    Fok,
    /// Immediate or cancel
    Ioc,
    /// Market
    Market,
    /// Limit
    Limit,
    /// Stop
    Stop,
}

impl OrderType {
    /// Upper-case code.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Fok => "FOK",
            OrderType::Ioc => "IOC",
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Stop => "STOP",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order that can be placed on an exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOrder {
    /// CUSIP
    pub product_id: String,
    /// Side of the book taken
    pub side: PricingSide,
    /// 12-character order id
    pub order_id: String,
    /// Order type
    pub order_type: OrderType,
    /// Limit or fill price
    pub price: f64,
    /// Displayed size
    pub visible_quantity: i64,
    /// Reserve size
    pub hidden_quantity: i64,
    /// Parent order, empty for a parent
    pub parent_order_id: String,
    /// Whether this is a child order
    pub is_child_order: bool,
}

impl ExecutionOrder {
    /// Displayed plus reserve size.
    pub fn total_quantity(&self) -> i64 {
        self.visible_quantity.saturating_add(self.hidden_quantity)
    }
}

impl Keyed for ExecutionOrder {
    type Key = String;

    fn key(&self) -> String {
        self.product_id.clone()
    }
}

impl Persistable for ExecutionOrder {
    fn persist_fields(&self) -> Vec<String> {
        vec![
            self.product_id.clone(),
            self.side.to_string(),
            self.order_id.clone(),
            self.order_type.to_string(),
            to_fractional(self.price),
            self.visible_quantity.to_string(),
            self.hidden_quantity.to_string(),
            self.parent_order_id.clone(),
            if self.is_child_order { "YES" } else { "NO" }.to_string(),
        ]
    }
}

/// Algo wrapper around an execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgoExecution {
    /// The order to execute
    pub execution_order: ExecutionOrder,
}

impl Keyed for AlgoExecution {
    type Key = String;

    fn key(&self) -> String {
        self.execution_order.product_id.clone()
    }
}

/// Decides when and how to cross the spread.
pub struct AlgoExecutionService {
    store: KeyedStore<AlgoExecution>,
    spread: f64,
    crossed: Cell<u64>,
    ids: RefCell<IdGenerator>,
}

impl AlgoExecutionService {
    /// Service with entropy-seeded order ids.
    pub fn new() -> Rc<Self> {
        Self::with_ids(IdGenerator::new())
    }

    /// Service drawing order ids from `ids`.
    pub fn with_ids(ids: IdGenerator) -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("algo_execution"),
            spread: CROSSING_SPREAD,
            crossed: Cell::new(0),
            ids: RefCell::new(ids),
        })
    }

    /// Listener to register on the market data service.
    pub fn get_listener(self: &Rc<Self>) -> ListenerRef<OrderBook> {
        self.clone()
    }

    /// Orders generated so far.
    pub fn crossed(&self) -> u64 {
        self.crossed.get()
    }

    /// Crosses the spread of `book` if it is tight enough.
    pub fn algo_execute_order(&self, book: &OrderBook) {
        let Some(top) = book.bid_offer() else {
            trace!(cusip = %book.product_id, "One-sided book");
            return;
        };
        if top.spread() > self.spread {
            return;
        }

        let count = self.crossed.get();
        let taken = if count % 2 == 0 {
            top.bid_order
        } else {
            top.offer_order
        };
        self.crossed.set(count + 1);

        let order = ExecutionOrder {
            product_id: book.product_id.clone(),
            side: taken.side,
            order_id: self.ids.borrow_mut().next_id(),
            order_type: OrderType::Market,
            price: taken.price,
            visible_quantity: taken.quantity,
            hidden_quantity: 0,
            parent_order_id: String::new(),
            is_child_order: false,
        };
        debug!(
            cusip = %order.product_id,
            side = %order.side,
            order_id = %order.order_id,
            "Crossing spread"
        );
        self.store.publish(AlgoExecution {
            execution_order: order,
        });
    }
}

keyed_service!(AlgoExecutionService, AlgoExecution);

impl ServiceListener<OrderBook> for AlgoExecutionService {
    fn process_add(&self, data: &OrderBook) {
        self.algo_execute_order(data);
    }
}
