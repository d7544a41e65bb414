//! Service trait delegation for stages backed by a `store: KeyedStore<V>`.

/// Implements `bond_soa::Service` for a stage whose records live in a
/// `store` field keyed by `String`.
///
/// `on_message` publishes straight into the store unless a stage method is
/// named with `=> method`, in which case that method is the ingestion path.
macro_rules! keyed_service {
    ($service:ty, $value:ty) => {
        keyed_service!(@impl $service, $value, |this: &$service, data: $value| this
            .store
            .publish(data));
    };
    ($service:ty, $value:ty => $ingest:ident) => {
        keyed_service!(@impl $service, $value, |this: &$service, data: $value| this
            .$ingest(data));
    };
    (@impl $service:ty, $value:ty, $on_message:expr) => {
        impl bond_soa::Service for $service {
            type Key = String;
            type Value = $value;

            fn get_data(&self, key: &String) -> Option<$value> {
                self.store.get(key)
            }

            fn on_message(&self, data: $value) {
                ($on_message)(self, data);
            }

            fn add_listener(&self, listener: bond_soa::ListenerRef<$value>) {
                bond_soa::Service::add_listener(&self.store, listener)
            }

            fn listeners(&self) -> Vec<bond_soa::ListenerRef<$value>> {
                bond_soa::Service::listeners(&self.store)
            }
        }
    };
}

pub(crate) use keyed_service;
