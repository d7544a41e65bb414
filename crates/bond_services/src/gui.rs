//! Throttled price snapshots for a trader GUI.
//!
//! A price is accepted only when at least `throttle_ms` has passed since the
//! previously accepted one and fewer than `max_updates` have been accepted.
//! Accepted prices are stamped and handed to the [`GuiConnector`], which can
//! also append them to a file (`gui.txt`).

use std::cell::{Cell, RefCell};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bond_core::time::{millis_now, timestamp};
use bond_soa::{KeyedStore, ListenerRef, OutboundConnector, ServiceListener};
use tracing::{debug, error};

use crate::error::SinkError;
use crate::macros::keyed_service;
use crate::pricing::Price;

/// Default minimum gap between accepted updates.
pub const DEFAULT_THROTTLE_MS: u64 = 300;
/// Default cap on accepted updates.
pub const DEFAULT_MAX_UPDATES: usize = 100;

/// A price as shown on the GUI.
#[derive(Debug, Clone, PartialEq)]
pub struct GuiUpdate {
    /// Local time of acceptance
    pub timestamp: String,
    /// The accepted price
    pub price: Price,
}

/// Emit-only connector to the GUI.
#[derive(Debug, Default)]
pub struct GuiConnector {
    output: Option<PathBuf>,
    updates: RefCell<Vec<GuiUpdate>>,
}

impl GuiConnector {
    /// Connector that also appends every update to `output`.
    pub fn with_output(output: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(output.into()),
            updates: RefCell::new(Vec::new()),
        }
    }

    /// Updates published so far.
    pub fn updates(&self) -> Vec<GuiUpdate> {
        self.updates.borrow().clone()
    }

    fn append(path: &Path, update: &GuiUpdate) -> Result<(), SinkError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        let mut line = vec![update.timestamp.clone()];
        line.extend(update.price.to_fields());
        writer.write_record(&line)?;
        writer.flush()?;
        Ok(())
    }
}

impl OutboundConnector<Price> for GuiConnector {
    fn publish(&self, data: &Price) {
        let update = GuiUpdate {
            timestamp: timestamp(),
            price: data.clone(),
        };
        if let Some(path) = &self.output {
            if let Err(e) = Self::append(path, &update) {
                error!(path = %path.display(), error = %e, "Failed to write GUI update");
            }
        }
        self.updates.borrow_mut().push(update);
    }
}

/// Throttled view of the pricing service.
pub struct GuiService {
    store: KeyedStore<Price>,
    connector: GuiConnector,
    throttle_ms: i64,
    max_updates: usize,
    accepted: Cell<usize>,
    last_accepted_ms: Cell<Option<i64>>,
    clock: Box<dyn Fn() -> i64>,
}

impl GuiService {
    /// GUI service reading the wall clock.
    pub fn new(throttle_ms: u64, max_updates: usize, connector: GuiConnector) -> Rc<Self> {
        Self::with_clock(throttle_ms, max_updates, connector, millis_now)
    }

    /// GUI service reading time, in epoch milliseconds, from `clock`.
    pub fn with_clock(
        throttle_ms: u64,
        max_updates: usize,
        connector: GuiConnector,
        clock: impl Fn() -> i64 + 'static,
    ) -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("gui"),
            connector,
            throttle_ms: i64::try_from(throttle_ms).unwrap_or(i64::MAX),
            max_updates,
            accepted: Cell::new(0),
            last_accepted_ms: Cell::new(None),
            clock: Box::new(clock),
        })
    }

    /// Listener to register on the pricing service.
    pub fn get_listener(self: &Rc<Self>) -> ListenerRef<Price> {
        self.clone()
    }

    /// The outbound GUI connector.
    pub fn connector(&self) -> &GuiConnector {
        &self.connector
    }

    /// Updates accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted.get()
    }

    /// Applies the throttle; returns whether `price` was shown.
    pub fn process_price(&self, price: Price) -> bool {
        if self.accepted.get() >= self.max_updates {
            return false;
        }
        let now = (self.clock)();
        if let Some(last) = self.last_accepted_ms.get() {
            if now - last < self.throttle_ms {
                return false;
            }
        }

        self.last_accepted_ms.set(Some(now));
        self.accepted.set(self.accepted.get() + 1);
        debug!(cusip = %price.product_id, update = self.accepted.get(), "GUI update");
        self.connector.publish(&price);
        self.store.publish(price);
        true
    }
}

keyed_service!(GuiService, Price => process_price);

impl ServiceListener<Price> for GuiService {
    fn process_add(&self, data: &Price) {
        self.process_price(data.clone());
    }
}
