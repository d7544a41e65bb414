//! Routing of execution orders to exchanges.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use bond_soa::{KeyedStore, ListenerRef, OutboundConnector, ServiceListener};
use tracing::debug;

use crate::algo_execution::{AlgoExecution, ExecutionOrder};
use crate::macros::keyed_service;

/// Trading venues, in routing rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Market {
    /// BrokerTec
    BrokerTec,
    /// eSpeed
    ESpeed,
    /// CME
    Cme,
}

impl Market {
    /// Rotation order.
    pub const ROTATION: [Market; 3] = [Market::BrokerTec, Market::ESpeed, Market::Cme];

    /// Upper-case venue code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::BrokerTec => "BROKERTEC",
            Market::ESpeed => "ESPEED",
            Market::Cme => "CME",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emit-only connector sending orders to venues round-robin.
#[derive(Debug, Default)]
pub struct ExchangeConnector {
    sent: Cell<usize>,
    routes: RefCell<Vec<(Market, String)>>,
}

impl ExchangeConnector {
    /// `(venue, order id)` for every order sent, in order.
    pub fn routes(&self) -> Vec<(Market, String)> {
        self.routes.borrow().clone()
    }

    /// Venue the next order will go to.
    pub fn next_market(&self) -> Market {
        Market::ROTATION[self.sent.get() % Market::ROTATION.len()]
    }
}

impl OutboundConnector<ExecutionOrder> for ExchangeConnector {
    fn publish(&self, data: &ExecutionOrder) {
        let market = self.next_market();
        self.sent.set(self.sent.get() + 1);
        debug!(
            market = %market,
            cusip = %data.product_id,
            side = %data.side,
            order_id = %data.order_id,
            "Order executed"
        );
        self.routes.borrow_mut().push((market, data.order_id.clone()));
    }
}

/// Stores, executes and fans out execution orders.
#[derive(Debug)]
pub struct ExecutionService {
    store: KeyedStore<ExecutionOrder>,
    connector: ExchangeConnector,
}

impl ExecutionService {
    /// Empty service.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("execution"),
            connector: ExchangeConnector::default(),
        })
    }

    /// Listener to register on the algo execution service.
    pub fn get_listener(self: &Rc<Self>) -> ListenerRef<AlgoExecution> {
        self.clone()
    }

    /// The outbound exchange connector.
    pub fn connector(&self) -> &ExchangeConnector {
        &self.connector
    }

    /// Stores the order, sends it to a venue, then fans it out.
    pub fn execute_order(&self, order: ExecutionOrder) {
        let previous = self.store.insert(order.clone());
        self.connector.publish(&order);
        self.store.notify(previous.as_ref(), &order);
    }
}

keyed_service!(ExecutionService, ExecutionOrder => execute_order);

impl ServiceListener<AlgoExecution> for ExecutionService {
    fn process_add(&self, data: &AlgoExecution) {
        self.execute_order(data.execution_order.clone());
    }
}
