//! Listener capability a service fans out to.

use std::rc::Rc;

/// Callbacks a service invokes on its registered listeners.
///
/// A stage implements this for the record type of the stage upstream of it:
/// it performs its own computation and pushes a derived record into its own
/// store, or, for a terminal sink, persists the value. Data is passed by
/// reference to a copy owned by the notifying service; a listener that
/// wants to keep it must clone.
pub trait ServiceListener<V> {
    /// A record was stored under a key that had no value.
    fn process_add(&self, data: &V);

    /// A record was removed.
    fn process_remove(&self, _data: &V) {}

    /// A record replaced the previous value under the same key.
    ///
    /// Defaults to treating the new value like an add, which is what every
    /// processing stage of the desk wants.
    fn process_update(&self, _previous: &V, current: &V) {
        self.process_add(current);
    }
}

/// Shared handle to a registered listener.
pub type ListenerRef<V> = Rc<dyn ServiceListener<V>>;
