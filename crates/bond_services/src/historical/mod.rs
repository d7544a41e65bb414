//! Historical data: terminal stages that persist timestamped snapshots.
//!
//! One [`HistoricalDataService`] exists per [`ServiceType`]. Each is
//! registered downstream of exactly one stage and, on every add or update,
//! stamps the record with the current time and appends it through its
//! [`HistoricalConnector`] to a [`RecordSink`]. It fans out to nobody:
//! listeners offered to it are dropped.

mod sink;

pub use sink::{CsvFileSink, MemorySink, RecordSink};

use std::cell::Cell;
use std::fmt;

use bond_core::time::timestamp;
use bond_soa::{Keyed, KeyedStore, ListenerRef, OutboundConnector, Service, ServiceListener};
use tracing::{debug, error, warn};

/// Category of persisted data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceType {
    /// Book positions
    Position,
    /// PV01 risk
    Risk,
    /// Execution orders
    Execution,
    /// Two-way price streams
    Streaming,
    /// Completed client inquiries
    Inquiry,
}

impl ServiceType {
    /// Every category, in persistence-file order.
    pub const ALL: [ServiceType; 5] = [
        ServiceType::Position,
        ServiceType::Risk,
        ServiceType::Execution,
        ServiceType::Streaming,
        ServiceType::Inquiry,
    ];

    /// Standard output file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            ServiceType::Position => "positions.txt",
            ServiceType::Risk => "risk.txt",
            ServiceType::Execution => "executions.txt",
            ServiceType::Streaming => "streaming.txt",
            ServiceType::Inquiry => "allinquiries.txt",
        }
    }

    /// Upper-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Position => "POSITION",
            ServiceType::Risk => "RISK",
            ServiceType::Execution => "EXECUTION",
            ServiceType::Streaming => "STREAMING",
            ServiceType::Inquiry => "INQUIRY",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records that can be flattened into persisted text fields.
pub trait Persistable {
    /// Field values, in output column order. Prices use 32nds notation.
    fn persist_fields(&self) -> Vec<String>;
}

/// One persisted snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    /// Category of the sink that produced it
    pub category: ServiceType,
    /// Key of the snapshotted record
    pub persist_key: String,
    /// Local time of persistence, millisecond precision
    pub timestamp: String,
    /// Flattened record
    pub fields: Vec<String>,
}

/// Emit-only connector from a historical service to its sink.
pub struct HistoricalConnector {
    category: ServiceType,
    sink: Box<dyn RecordSink>,
    written: Cell<usize>,
    failed: Cell<usize>,
}

impl HistoricalConnector {
    /// Connector for `category` writing to `sink`.
    pub fn new(category: ServiceType, sink: Box<dyn RecordSink>) -> Self {
        Self {
            category,
            sink,
            written: Cell::new(0),
            failed: Cell::new(0),
        }
    }

    /// Records successfully appended.
    pub fn written(&self) -> usize {
        self.written.get()
    }

    /// Records the sink rejected.
    pub fn failed(&self) -> usize {
        self.failed.get()
    }
}

impl OutboundConnector<HistoricalRecord> for HistoricalConnector {
    fn publish(&self, data: &HistoricalRecord) {
        match self.sink.append(data) {
            Ok(()) => self.written.set(self.written.get() + 1),
            Err(e) => {
                self.failed.set(self.failed.get() + 1);
                error!(
                    category = %self.category,
                    key = %data.persist_key,
                    error = %e,
                    "Failed to persist historical record"
                );
            }
        }
    }
}

/// Terminal service persisting every record it receives.
pub struct HistoricalDataService<V: Keyed<Key = String>> {
    category: ServiceType,
    store: KeyedStore<V>,
    connector: HistoricalConnector,
}

impl<V> HistoricalDataService<V>
where
    V: Keyed<Key = String> + Clone + Persistable,
{
    /// Service for `category` persisting through `sink`.
    pub fn new(category: ServiceType, sink: Box<dyn RecordSink>) -> Self {
        Self {
            category,
            store: KeyedStore::new(category.as_str()),
            connector: HistoricalConnector::new(category, sink),
        }
    }

    /// Category tag.
    pub fn service_type(&self) -> ServiceType {
        self.category
    }

    /// Persists a timestamped snapshot of `data` under `persist_key`.
    pub fn persist_data(&self, persist_key: &str, data: &V) {
        let record = HistoricalRecord {
            category: self.category,
            persist_key: persist_key.to_string(),
            timestamp: timestamp(),
            fields: data.persist_fields(),
        };
        debug!(category = %self.category, key = persist_key, "Persisting");
        self.connector.publish(&record);
    }

    /// Records successfully persisted.
    pub fn persisted(&self) -> usize {
        self.connector.written()
    }

    /// Records the sink rejected.
    pub fn failures(&self) -> usize {
        self.connector.failed()
    }
}

impl<V> Service for HistoricalDataService<V>
where
    V: Keyed<Key = String> + Clone + Persistable,
{
    type Key = String;
    type Value = V;

    fn get_data(&self, key: &String) -> Option<V> {
        self.store.get(key)
    }

    /// Stores `data` and persists a timestamped snapshot of it.
    fn on_message(&self, data: V) {
        let key = data.key();
        self.persist_data(&key, &data);
        self.store.insert(data);
    }

    fn add_listener(&self, _listener: ListenerRef<V>) {
        warn!(category = %self.category, "Historical services are terminal; listener ignored");
    }

    fn listeners(&self) -> Vec<ListenerRef<V>> {
        Vec::new()
    }
}

impl<V> ServiceListener<V> for HistoricalDataService<V>
where
    V: Keyed<Key = String> + Clone + Persistable,
{
    fn process_add(&self, data: &V) {
        self.on_message(data.clone());
    }
}
