//! Keyed services and their synchronous fan-out.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::listener::{ListenerRef, ServiceListener};

/// A record that knows its own natural key.
///
/// For most desk records the key is the product CUSIP, stable for the life
/// of the record.
pub trait Keyed {
    /// Key type.
    type Key: Ord + Clone + fmt::Debug;

    /// The record's key.
    fn key(&self) -> Self::Key;
}

/// A keyed data store with an ingestion entry point and downstream
/// listeners.
pub trait Service {
    /// Key type of the store.
    type Key;
    /// Record type held and fanned out.
    type Value;

    /// Current record for `key`, `None` if never set.
    fn get_data(&self, key: &Self::Key) -> Option<Self::Value>;

    /// Stores `data` under its key, then notifies every listener in
    /// registration order. Returns after the whole downstream cascade.
    fn on_message(&self, data: Self::Value);

    /// Registers a downstream listener. No de-duplication: registering the
    /// same listener twice yields two callbacks per event.
    fn add_listener(&self, listener: ListenerRef<Self::Value>);

    /// Registered listeners, in registration order.
    fn listeners(&self) -> Vec<ListenerRef<Self::Value>>;
}

/// The concrete store behind every desk service.
///
/// Holds at most one value per key; a later record for a key supersedes the
/// earlier one and is reported to listeners as an update carrying both
/// values.
pub struct KeyedStore<V: Keyed> {
    name: &'static str,
    records: RefCell<BTreeMap<V::Key, V>>,
    listeners: RefCell<Vec<ListenerRef<V>>>,
}

impl<V: Keyed + Clone> KeyedStore<V> {
    /// Creates an empty store. `name` is used in log events.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            records: RefCell::new(BTreeMap::new()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Name given at construction.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Copy of the record under `key`.
    pub fn get(&self, key: &V::Key) -> Option<V> {
        self.records.borrow().get(key).cloned()
    }

    /// Whether a record exists under `key`.
    pub fn contains(&self, key: &V::Key) -> bool {
        self.records.borrow().contains_key(key)
    }

    /// Number of distinct keys held.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Copies of all records in key order.
    pub fn values(&self) -> Vec<V> {
        self.records.borrow().values().cloned().collect()
    }

    /// Stores without notifying anyone. Returns the superseded value.
    pub fn insert(&self, data: V) -> Option<V> {
        self.records.borrow_mut().insert(data.key(), data)
    }

    /// Stores and fans out: add for a new key, update for an existing one.
    pub fn publish(&self, data: V) {
        let previous = self.insert(data.clone());
        self.notify(previous.as_ref(), &data);
    }

    /// Fans out an already-stored record.
    ///
    /// The listener list is snapshotted first, so listeners may register
    /// further listeners or re-enter this store without a borrow conflict.
    pub fn notify(&self, previous: Option<&V>, current: &V) {
        let listeners = self.listeners.borrow().clone();
        trace!(
            service = self.name,
            key = ?current.key(),
            listeners = listeners.len(),
            update = previous.is_some(),
            "fan-out"
        );
        for listener in &listeners {
            match previous {
                Some(previous) => listener.process_update(previous, current),
                None => listener.process_add(current),
            }
        }
    }

    /// Removes the record under `key` and reports it to listeners.
    pub fn remove(&self, key: &V::Key) -> Option<V> {
        let removed = self.records.borrow_mut().remove(key)?;
        let listeners = self.listeners.borrow().clone();
        for listener in &listeners {
            listener.process_remove(&removed);
        }
        Some(removed)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<V: Keyed + Clone> Service for KeyedStore<V> {
    type Key = V::Key;
    type Value = V;

    fn get_data(&self, key: &V::Key) -> Option<V> {
        self.get(key)
    }

    fn on_message(&self, data: V) {
        self.publish(data);
    }

    fn add_listener(&self, listener: ListenerRef<V>) {
        self.listeners.borrow_mut().push(listener);
    }

    fn listeners(&self) -> Vec<ListenerRef<V>> {
        self.listeners.borrow().clone()
    }
}

/// A store is itself a listener for its own record type: registering an
/// `Rc<KeyedStore<V>>` downstream of another service relays every record
/// into this store's `on_message`.
impl<V: Keyed + Clone> ServiceListener<V> for KeyedStore<V> {
    fn process_add(&self, data: &V) {
        self.publish(data.clone());
    }
}

impl<V: Keyed> fmt::Debug for KeyedStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedStore")
            .field("name", &self.name)
            .field("records", &self.records.borrow().len())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
