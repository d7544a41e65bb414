//! Client inquiries and their quote lifecycle.
//!
//! Feed line: `inquiry_id,cusip,side,quantity,price,state`. Inquiries are
//! keyed by inquiry id: two inquiries on the same bond are distinct records.
//!
//! Lifecycle: a RECEIVED inquiry is stored and handed to the bidirectional
//! [`InquiryConnector`], which quotes it and feeds it back as QUOTED. A
//! QUOTED inquiry is completed to DONE, stored and fanned out.

use std::cell::Cell;
use std::fmt;
use std::io::BufRead;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use bond_core::price::to_fractional;
use bond_core::Side;
use bond_soa::{InboundConnector, IngestSummary, Keyed, KeyedStore, OutboundConnector};
use tracing::{debug, warn};

use crate::error::FeedError;
use crate::feed::{field, ingest, parse_price, parse_quantity, resolve_bond};
use crate::historical::Persistable;
use crate::macros::keyed_service;

/// Inquiry lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InquiryState {
    /// New from the client
    Received,
    /// Quoted back
    Quoted,
    /// Completed
    Done,
    /// Rejected by the desk
    Rejected,
    /// Rejected by the client
    CustomerRejected,
}

impl InquiryState {
    /// Upper-case code.
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryState::Received => "RECEIVED",
            InquiryState::Quoted => "QUOTED",
            InquiryState::Done => "DONE",
            InquiryState::Rejected => "REJECTED",
            InquiryState::CustomerRejected => "CUSTOMER_REJECTED",
        }
    }
}

impl fmt::Display for InquiryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryState {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RECEIVED" => Ok(InquiryState::Received),
            "QUOTED" => Ok(InquiryState::Quoted),
            "DONE" => Ok(InquiryState::Done),
            "REJECTED" => Ok(InquiryState::Rejected),
            "CUSTOMER_REJECTED" => Ok(InquiryState::CustomerRejected),
            other => Err(FeedError::InquiryState(other.to_string())),
        }
    }
}

/// A client request for a quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Inquiry {
    /// Unique inquiry id
    pub inquiry_id: String,
    /// CUSIP
    pub product_id: String,
    /// Client direction
    pub side: Side,
    /// Face amount
    pub quantity: i64,
    /// Quoted price
    pub price: f64,
    /// Lifecycle state
    pub state: InquiryState,
}

impl Keyed for Inquiry {
    type Key = String;

    fn key(&self) -> String {
        self.inquiry_id.clone()
    }
}

impl Persistable for Inquiry {
    fn persist_fields(&self) -> Vec<String> {
        vec![
            self.inquiry_id.clone(),
            self.product_id.clone(),
            self.side.to_string(),
            self.quantity.to_string(),
            to_fractional(self.price),
            self.state.to_string(),
        ]
    }
}

/// Stores inquiries and drives them through the quote lifecycle.
#[derive(Debug)]
pub struct InquiryService {
    store: KeyedStore<Inquiry>,
    connector: InquiryConnector,
}

impl InquiryService {
    /// Service with its connector wired back to it.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|service| Self {
            store: KeyedStore::new("inquiry"),
            connector: InquiryConnector {
                service: service.clone(),
                quoted: Cell::new(0),
            },
        })
    }

    /// The bidirectional connector.
    pub fn connector(&self) -> &InquiryConnector {
        &self.connector
    }

    /// Ingestion path; behaviour depends on the inquiry's state.
    pub fn process_inquiry(&self, mut inquiry: Inquiry) {
        match inquiry.state {
            InquiryState::Received => {
                self.store.insert(inquiry.clone());
                self.connector.publish(&inquiry);
            }
            InquiryState::Quoted => {
                inquiry.state = InquiryState::Done;
                debug!(inquiry_id = %inquiry.inquiry_id, "Inquiry done");
                self.store.publish(inquiry);
            }
            state => {
                debug!(inquiry_id = %inquiry.inquiry_id, state = %state, "Inquiry stored");
                self.store.insert(inquiry);
            }
        }
    }

    /// Sets the price on a stored inquiry and re-publishes it.
    ///
    /// Returns `false` if the inquiry is unknown or the price is negative
    /// or not finite.
    pub fn send_quote(&self, inquiry_id: &str, price: f64) -> bool {
        if !price.is_finite() || price < 0.0 {
            warn!(inquiry_id, price, "Rejecting invalid quote price");
            return false;
        }
        let Some(mut inquiry) = self.store.get(&inquiry_id.to_string()) else {
            warn!(inquiry_id, "Quote for unknown inquiry");
            return false;
        };
        inquiry.price = price;
        self.store.publish(inquiry);
        true
    }

    /// Marks a stored inquiry REJECTED without fanning out.
    ///
    /// Returns `false` if the inquiry is unknown.
    pub fn reject_inquiry(&self, inquiry_id: &str) -> bool {
        let Some(mut inquiry) = self.store.get(&inquiry_id.to_string()) else {
            warn!(inquiry_id, "Rejecting unknown inquiry");
            return false;
        };
        inquiry.state = InquiryState::Rejected;
        self.store.insert(inquiry);
        true
    }
}

keyed_service!(InquiryService, Inquiry => process_inquiry);

/// Bidirectional connector: reads the inquiry feed and quotes inquiries
/// back into the service.
pub struct InquiryConnector {
    service: Weak<InquiryService>,
    quoted: Cell<usize>,
}

impl InquiryConnector {
    /// Inquiries quoted so far.
    pub fn quoted(&self) -> usize {
        self.quoted.get()
    }

    fn feed_back(&self, inquiry: Inquiry) {
        match self.service.upgrade() {
            Some(service) => service.process_inquiry(inquiry),
            None => warn!(inquiry_id = %inquiry.inquiry_id, "Inquiry service dropped"),
        }
    }
}

impl fmt::Debug for InquiryConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InquiryConnector")
            .field("quoted", &self.quoted.get())
            .finish_non_exhaustive()
    }
}

impl OutboundConnector<Inquiry> for InquiryConnector {
    fn publish(&self, data: &Inquiry) {
        if data.state != InquiryState::Received {
            return;
        }
        let mut quoted = data.clone();
        quoted.state = InquiryState::Quoted;
        self.quoted.set(self.quoted.get() + 1);
        self.feed_back(quoted);
    }
}

impl InboundConnector for InquiryConnector {
    type Error = FeedError;

    fn subscribe<R: BufRead>(&self, source: R) -> Result<IngestSummary, FeedError> {
        ingest("inquiries", source, |record| {
            let inquiry = Inquiry {
                inquiry_id: field(record, 0, "inquiry_id")?.to_string(),
                product_id: field(record, 1, "cusip")?.to_string(),
                side: field(record, 2, "side")?.parse()?,
                quantity: parse_quantity(field(record, 3, "quantity")?)?,
                price: parse_price(field(record, 4, "price")?)?,
                state: field(record, 5, "state")?.parse()?,
            };
            resolve_bond("inquiries", &inquiry.product_id);
            self.feed_back(inquiry);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_soa::{Connector, Service, ServiceListener};
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct Tape(RefCell<Vec<(String, InquiryState, f64)>>);

    impl ServiceListener<Inquiry> for Tape {
        fn process_add(&self, data: &Inquiry) {
            self.0
                .borrow_mut()
                .push((data.inquiry_id.clone(), data.state, data.price));
        }
    }

    fn wired() -> (Rc<InquiryService>, Rc<Tape>) {
        let service = InquiryService::new();
        let tape = Rc::new(Tape::default());
        service.add_listener(tape.clone());
        (service, tape)
    }

    fn assert_bidirectional<C: Connector<Inquiry>>(_: &C) {}

    #[test]
    fn test_received_inquiries_complete() {
        let (service, tape) = wired();
        assert_bidirectional(service.connector());

        let summary = service
            .connector()
            .subscribe(Cursor::new(
                "INQ1,9128283H1,BUY,1000000,99-16+,RECEIVED\n\
                 INQ2,9128283H1,SELL,2000000,99-160,RECEIVED\n",
            ))
            .unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(service.connector().quoted(), 2);

        let events = tape.0.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "INQ1");
        assert_eq!(events[0].1, InquiryState::Done);
        assert_eq!(events[1].0, "INQ2");
        assert_eq!(
            service.get_data(&"INQ2".to_string()).unwrap().state,
            InquiryState::Done
        );
    }

    #[test]
    fn test_other_states_are_stored_silently() {
        let (service, tape) = wired();
        service
            .connector()
            .subscribe(Cursor::new("INQ9,912810RZ3,BUY,1000000,100-000,REJECTED\n"))
            .unwrap();
        assert!(tape.0.borrow().is_empty());
        assert_eq!(
            service.get_data(&"INQ9".to_string()).unwrap().state,
            InquiryState::Rejected
        );
    }

    #[test]
    fn test_send_quote_and_reject() {
        let (service, tape) = wired();
        service.on_message(Inquiry {
            inquiry_id: "INQ1".into(),
            product_id: "9128283H1".into(),
            side: Side::Buy,
            quantity: 1_000_000,
            price: 99.0,
            state: InquiryState::Received,
        });

        assert!(service.send_quote("INQ1", 99.5));
        assert_eq!(tape.0.borrow().last().unwrap().2, 99.5);

        assert!(service.reject_inquiry("INQ1"));
        assert_eq!(
            service.get_data(&"INQ1".to_string()).unwrap().state,
            InquiryState::Rejected
        );
        assert_eq!(tape.0.borrow().len(), 2);

        assert!(!service.send_quote("NOPE", 1.0));
        assert!(!service.send_quote("INQ1", -99.5));
        assert!(!service.send_quote("INQ1", f64::NAN));
        assert_eq!(tape.0.borrow().len(), 2);
        assert!(!service.reject_inquiry("NOPE"));
    }

    #[test]
    fn test_bad_state_is_skipped() {
        let (service, _) = wired();
        let summary = service
            .connector()
            .subscribe(Cursor::new("INQ1,9128283H1,BUY,1000000,99-000,PENDING\n"))
            .unwrap();
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_persist_fields() {
        let inquiry = Inquiry {
            inquiry_id: "INQ1".into(),
            product_id: "9128283H1".into(),
            side: Side::Sell,
            quantity: 5,
            price: 100.140625,
            state: InquiryState::Done,
        };
        assert_eq!(
            inquiry.persist_fields(),
            vec!["INQ1", "9128283H1", "SELL", "5", "100-04+", "DONE"]
        );
    }
}
