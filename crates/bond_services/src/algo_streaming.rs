//! Algorithmic two-way quote generation from internal prices.
//!
//! For every price, quotes bid at `mid - spread/2` and offer at
//! `mid + spread/2`. Visible size alternates between 10MM and 20MM across
//! successive streams; hidden size is twice the visible size.

use std::cell::Cell;
use std::rc::Rc;

use bond_core::price::to_fractional;
use bond_core::PricingSide;
use bond_soa::{Keyed, KeyedStore, ListenerRef, ServiceListener};
use tracing::debug;

use crate::historical::Persistable;
use crate::macros::keyed_service;
use crate::pricing::Price;

/// Smallest visible size streamed.
pub const BASE_VISIBLE_QUANTITY: i64 = 10_000_000;

/// One side of a two-way quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStreamOrder {
    /// Quoted price
    pub price: f64,
    /// Displayed size
    pub visible_quantity: i64,
    /// Reserve size
    pub hidden_quantity: i64,
    /// Bid or offer
    pub side: PricingSide,
}

impl PriceStreamOrder {
    /// New order.
    pub fn new(price: f64, visible_quantity: i64, hidden_quantity: i64, side: PricingSide) -> Self {
        Self {
            price,
            visible_quantity,
            hidden_quantity,
            side,
        }
    }

    fn fields(&self) -> [String; 4] {
        [
            to_fractional(self.price),
            self.visible_quantity.to_string(),
            self.hidden_quantity.to_string(),
            self.side.to_string(),
        ]
    }
}

/// Two-way market for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceStream {
    /// CUSIP
    pub product_id: String,
    /// Bid side
    pub bid_order: PriceStreamOrder,
    /// Offer side
    pub offer_order: PriceStreamOrder,
}

impl PriceStream {
    /// New stream.
    pub fn new(
        product_id: impl Into<String>,
        bid_order: PriceStreamOrder,
        offer_order: PriceStreamOrder,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            bid_order,
            offer_order,
        }
    }
}

impl Keyed for PriceStream {
    type Key = String;

    fn key(&self) -> String {
        self.product_id.clone()
    }
}

impl Persistable for PriceStream {
    fn persist_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(9);
        fields.push(self.product_id.clone());
        fields.extend(self.bid_order.fields());
        fields.extend(self.offer_order.fields());
        fields
    }
}

/// Algo wrapper around a price stream.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgoStream {
    /// The stream to publish
    pub price_stream: PriceStream,
}

impl Keyed for AlgoStream {
    type Key = String;

    fn key(&self) -> String {
        self.price_stream.product_id.clone()
    }
}

/// Builds two-way streams from prices.
#[derive(Debug)]
pub struct AlgoStreamingService {
    store: KeyedStore<AlgoStream>,
    published: Cell<u64>,
}

impl AlgoStreamingService {
    /// Empty service.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("algo_streaming"),
            published: Cell::new(0),
        })
    }

    /// Listener to register on the pricing service.
    pub fn get_listener(self: &Rc<Self>) -> ListenerRef<Price> {
        self.clone()
    }

    /// Streams published so far.
    pub fn published(&self) -> u64 {
        self.published.get()
    }

    /// Quotes `price` two-way and publishes the stream.
    pub fn algo_publish_price(&self, price: &Price) {
        let count = self.published.get();
        let visible = (count % 2 + 1) as i64 * BASE_VISIBLE_QUANTITY;
        let hidden = visible * 2;
        self.published.set(count + 1);

        let stream = PriceStream::new(
            price.product_id.clone(),
            PriceStreamOrder::new(price.bid(), visible, hidden, PricingSide::Bid),
            PriceStreamOrder::new(price.offer(), visible, hidden, PricingSide::Offer),
        );
        debug!(cusip = %price.product_id, visible, "Algo stream");
        self.store.publish(AlgoStream {
            price_stream: stream,
        });
    }
}

keyed_service!(AlgoStreamingService, AlgoStream);

impl ServiceListener<Price> for AlgoStreamingService {
    fn process_add(&self, data: &Price) {
        self.algo_publish_price(data);
    }
}
