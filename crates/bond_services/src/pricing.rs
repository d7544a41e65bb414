//! Internal mid prices, ingested from the price feed.
//!
//! Feed line: `cusip,bid,offer` with prices in 32nds notation. The stored
//! record carries the decimal mid and bid/offer spread.

use std::io::BufRead;
use std::rc::Rc;

use bond_core::price::to_fractional;
use bond_soa::{InboundConnector, IngestSummary, Keyed, KeyedStore};
use tracing::debug;

use crate::error::FeedError;
use crate::feed::{field, ingest, parse_price, resolve_bond};
use crate::macros::keyed_service;

/// Mid price and bid/offer spread for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    /// CUSIP
    pub product_id: String,
    /// Mid price
    pub mid: f64,
    /// Offer minus bid
    pub bid_offer_spread: f64,
}

impl Price {
    /// New price.
    pub fn new(product_id: impl Into<String>, mid: f64, bid_offer_spread: f64) -> Self {
        Self {
            product_id: product_id.into(),
            mid,
            bid_offer_spread,
        }
    }

    /// Price from a two-sided quote.
    pub fn from_bid_offer(product_id: impl Into<String>, bid: f64, offer: f64) -> Self {
        Self::new(product_id, (bid + offer) / 2.0, offer - bid)
    }

    /// Bid implied by mid and spread.
    pub fn bid(&self) -> f64 {
        self.mid - self.bid_offer_spread / 2.0
    }

    /// Offer implied by mid and spread.
    pub fn offer(&self) -> f64 {
        self.mid + self.bid_offer_spread / 2.0
    }

    /// Product, mid and spread, prices in 32nds.
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.product_id.clone(),
            to_fractional(self.mid),
            to_fractional(self.bid_offer_spread),
        ]
    }
}

impl Keyed for Price {
    type Key = String;

    fn key(&self) -> String {
        self.product_id.clone()
    }
}

/// Entry-point service for internal prices.
#[derive(Debug)]
pub struct PricingService {
    store: KeyedStore<Price>,
}

impl PricingService {
    /// Empty service.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("pricing"),
        })
    }

    /// Feed connector bound to this service.
    pub fn connector(self: &Rc<Self>) -> PricingConnector {
        PricingConnector {
            service: Rc::clone(self),
        }
    }

    /// Number of products priced.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when no price has arrived.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

keyed_service!(PricingService, Price);

/// Subscribe-only connector reading the price feed.
pub struct PricingConnector {
    service: Rc<PricingService>,
}

impl InboundConnector for PricingConnector {
    type Error = FeedError;

    fn subscribe<R: BufRead>(&self, source: R) -> Result<IngestSummary, FeedError> {
        ingest("prices", source, |record| {
            let product_id = field(record, 0, "cusip")?;
            let bid = parse_price(field(record, 1, "bid")?)?;
            let offer = parse_price(field(record, 2, "offer")?)?;
            let bond = resolve_bond("prices", product_id);
            let price = Price::from_bid_offer(product_id, bid, offer);
            debug!(cusip = product_id, ticker = bond.ticker(), mid = price.mid, "Price");
            bond_soa::Service::on_message(self.service.as_ref(), price);
            Ok(())
        })
    }
}
