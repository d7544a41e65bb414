//! Publication of two-way price streams.

use std::cell::Cell;
use std::rc::Rc;

use bond_soa::{KeyedStore, ListenerRef, OutboundConnector, ServiceListener};
use tracing::debug;

use crate::algo_streaming::{AlgoStream, PriceStream};
use crate::macros::keyed_service;

/// Emit-only connector publishing quotes to the street.
#[derive(Debug, Default)]
pub struct QuoteConnector {
    published: Cell<usize>,
}

impl QuoteConnector {
    /// Quotes published so far.
    pub fn published(&self) -> usize {
        self.published.get()
    }
}

impl OutboundConnector<PriceStream> for QuoteConnector {
    fn publish(&self, data: &PriceStream) {
        self.published.set(self.published.get() + 1);
        debug!(
            cusip = %data.product_id,
            bid = data.bid_order.price,
            offer = data.offer_order.price,
            "Quote published"
        );
    }
}

/// Stores and publishes the latest stream per product.
#[derive(Debug)]
pub struct StreamingService {
    store: KeyedStore<PriceStream>,
    connector: QuoteConnector,
}

impl StreamingService {
    /// Empty service.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("streaming"),
            connector: QuoteConnector::default(),
        })
    }

    /// Listener to register on the algo streaming service.
    pub fn get_listener(self: &Rc<Self>) -> ListenerRef<AlgoStream> {
        self.clone()
    }

    /// The outbound quote connector.
    pub fn connector(&self) -> &QuoteConnector {
        &self.connector
    }

    /// Stores the stream, sends it out, then fans it out downstream.
    pub fn publish_price(&self, stream: PriceStream) {
        let previous = self.store.insert(stream.clone());
        self.connector.publish(&stream);
        self.store.notify(previous.as_ref(), &stream);
    }
}

keyed_service!(StreamingService, PriceStream => publish_price);

impl ServiceListener<AlgoStream> for StreamingService {
    fn process_add(&self, data: &AlgoStream) {
        self.publish_price(data.price_stream.clone());
    }
}
