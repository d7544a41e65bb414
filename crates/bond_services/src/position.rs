//! Positions per product across books.

use std::collections::BTreeMap;
use std::rc::Rc;

use bond_soa::{Keyed, KeyedStore, ListenerRef, ServiceListener};
use tracing::debug;

use crate::historical::Persistable;
use crate::macros::keyed_service;
use crate::trade_booking::Trade;

/// Quantity held per book for one product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    /// CUSIP
    pub product_id: String,
    positions: BTreeMap<String, i64>,
}

impl Position {
    /// Flat position.
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            positions: BTreeMap::new(),
        }
    }

    /// Quantity in `book`, 0 if never traded.
    pub fn position(&self, book: &str) -> i64 {
        self.positions.get(book).copied().unwrap_or(0)
    }

    /// Quantities by book.
    pub fn positions(&self) -> &BTreeMap<String, i64> {
        &self.positions
    }

    /// Adds a signed quantity to `book`, saturating at the `i64` bounds.
    pub fn add_position(&mut self, book: &str, quantity: i64) {
        let held = self.positions.entry(book.to_string()).or_insert(0);
        *held = held.saturating_add(quantity);
    }

    /// Sum over all books, saturating at the `i64` bounds.
    pub fn aggregate_position(&self) -> i64 {
        self.positions
            .values()
            .fold(0i64, |total, quantity| total.saturating_add(*quantity))
    }
}

impl Keyed for Position {
    type Key = String;

    fn key(&self) -> String {
        self.product_id.clone()
    }
}

impl Persistable for Position {
    fn persist_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(1 + 2 * self.positions.len());
        fields.push(self.product_id.clone());
        for (book, quantity) in &self.positions {
            fields.push(book.clone());
            fields.push(quantity.to_string());
        }
        fields
    }
}

/// Keeps positions up to date with booked trades.
#[derive(Debug)]
pub struct PositionService {
    store: KeyedStore<Position>,
}

impl PositionService {
    /// Empty service.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("position"),
        })
    }

    /// Listener to register on the trade booking service.
    pub fn get_listener(self: &Rc<Self>) -> ListenerRef<Trade> {
        self.clone()
    }

    /// Applies `trade` and publishes the product's updated position.
    pub fn add_trade(&self, trade: &Trade) {
        let mut position = self
            .store
            .get(&trade.product_id)
            .unwrap_or_else(|| Position::new(trade.product_id.clone()));
        position.add_position(&trade.book, trade.quantity.saturating_mul(trade.side.sign()));
        debug!(
            cusip = %trade.product_id,
            aggregate = position.aggregate_position(),
            "Position"
        );
        self.store.publish(position);
    }
}

keyed_service!(PositionService, Position);

impl ServiceListener<Trade> for PositionService {
    fn process_add(&self, data: &Trade) {
        self.add_trade(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_core::Side;
    use bond_soa::Service;

    fn trade(id: &str, book: &str, quantity: i64, side: Side) -> Trade {
        Trade {
            product_id: "9128283J7".into(),
            trade_id: id.into(),
            price: 99.0,
            book: book.into(),
            quantity,
            side,
        }
    }

    #[test]
    fn test_buys_add_sells_subtract() {
        let service = PositionService::new();
        service.process_add(&trade("1", "TRSY1", 1_000_000, Side::Buy));
        service.process_add(&trade("2", "TRSY2", 3_000_000, Side::Buy));
        service.process_add(&trade("3", "TRSY1", 400_000, Side::Sell));

        let position = service.get_data(&"9128283J7".to_string()).unwrap();
        assert_eq!(position.position("TRSY1"), 600_000);
        assert_eq!(position.position("TRSY2"), 3_000_000);
        assert_eq!(position.position("TRSY3"), 0);
        assert_eq!(position.aggregate_position(), 3_600_000);
    }

    #[test]
    fn test_persist_fields_list_books() {
        let mut position = Position::new("9128283J7");
        position.add_position("TRSY2", -5);
        position.add_position("TRSY1", 10);
        assert_eq!(
            position.persist_fields(),
            vec!["9128283J7", "TRSY1", "10", "TRSY2", "-5"]
        );
    }

    #[test]
    fn test_extreme_quantities_saturate() {
        let service = PositionService::new();
        service.process_add(&trade("1", "TRSY1", i64::MAX, Side::Buy));
        service.process_add(&trade("2", "TRSY1", 1, Side::Buy));
        service.process_add(&trade("3", "TRSY2", i64::MAX, Side::Buy));

        let position = service.get_data(&"9128283J7".to_string()).unwrap();
        assert_eq!(position.position("TRSY1"), i64::MAX);
        assert_eq!(position.aggregate_position(), i64::MAX);

        let mut short = Position::new("9128283J7");
        short.add_position("TRSY1", i64::MIN);
        short.add_position("TRSY1", -1);
        assert_eq!(short.aggregate_position(), i64::MIN);
    }
}
