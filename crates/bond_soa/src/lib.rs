//! # bond_soa: Service-Oriented Framework for the Bond Trading Desk
//!
//! ## Layer 2 (Framework) Role
//!
//! Every processing stage of the desk is a keyed store of records of one
//! type that fans each mutation out to the stages registered downstream of
//! it. This crate provides the generic pieces:
//!
//! - [`Keyed`]: records that carry their own natural key
//! - [`ServiceListener`]: add / update / remove callbacks
//! - [`Service`] and [`KeyedStore`]: ingestion entry point plus ordered,
//!   synchronous fan-out
//! - [`InboundConnector`], [`OutboundConnector`], [`Connector`]: directional
//!   adapters between a service and the outside world
//!
//! ## Execution Model
//!
//! Single-threaded and synchronous. `on_message` returns only after every
//! listener, and everything those listeners trigger, has run. Listeners are
//! invoked in registration order. Shared ownership is `Rc`, mutation is
//! interior (`RefCell`/`Cell`); nothing here is `Send`.
//!
//! ## Usage Examples
//!
//! ```rust
//! use bond_soa::{Keyed, KeyedStore, Service, ServiceListener};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! #[derive(Clone)]
//! struct Quote { cusip: String, mid: f64 }
//!
//! impl Keyed for Quote {
//!     type Key = String;
//!     fn key(&self) -> String { self.cusip.clone() }
//! }
//!
//! #[derive(Default)]
//! struct Tape(RefCell<Vec<f64>>);
//!
//! impl ServiceListener<Quote> for Tape {
//!     fn process_add(&self, data: &Quote) {
//!         self.0.borrow_mut().push(data.mid);
//!     }
//! }
//!
//! let store = KeyedStore::<Quote>::new("quotes");
//! let tape = Rc::new(Tape::default());
//! store.add_listener(tape.clone());
//!
//! store.on_message(Quote { cusip: "912810RZ3".into(), mid: 99.5 });
//! store.on_message(Quote { cusip: "912810RZ3".into(), mid: 99.75 });
//!
//! assert_eq!(*tape.0.borrow(), vec![99.5, 99.75]);
//! assert_eq!(store.get_data(&"912810RZ3".to_string()).unwrap().mid, 99.75);
//! ```

#![deny(missing_docs)]

pub mod connector;
pub mod listener;
pub mod service;

pub use connector::{Connector, InboundConnector, IngestSummary, OutboundConnector};
pub use listener::{ListenerRef, ServiceListener};
pub use service::{Keyed, KeyedStore, Service};
