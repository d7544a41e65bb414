//! PV01 risk per product and per bucketed sector.

use std::rc::Rc;

use bond_core::reference::{cusip_for_ticker, get_pv01_value};
use bond_soa::{Keyed, KeyedStore, ListenerRef, ServiceListener};
use tracing::debug;

use crate::historical::Persistable;
use crate::macros::keyed_service;
use crate::position::Position;

/// PV01 of a product scaled by the position held.
#[derive(Debug, Clone, PartialEq)]
pub struct Pv01 {
    /// CUSIP
    pub product_id: String,
    /// Per-unit PV01 from reference data
    pub pv01: f64,
    /// Aggregate position
    pub quantity: i64,
}

impl Pv01 {
    /// `pv01 * quantity`.
    pub fn total(&self) -> f64 {
        self.pv01 * self.quantity as f64
    }
}

impl Keyed for Pv01 {
    type Key = String;

    fn key(&self) -> String {
        self.product_id.clone()
    }
}

impl Persistable for Pv01 {
    fn persist_fields(&self) -> Vec<String> {
        vec![
            self.product_id.clone(),
            format!("{:.8}", self.pv01),
            self.quantity.to_string(),
        ]
    }
}

/// Named group of products risk is aggregated over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketedSector {
    /// Sector name
    pub name: String,
    /// CUSIPs in the sector
    pub products: Vec<String>,
}

impl BucketedSector {
    /// New sector.
    pub fn new(name: impl Into<String>, products: Vec<String>) -> Self {
        Self {
            name: name.into(),
            products,
        }
    }

    /// FrontEnd (2Y, 3Y), Belly (5Y, 7Y, 10Y) and LongEnd (30Y).
    pub fn standard() -> Vec<BucketedSector> {
        let sector = |name: &str, tickers: &[&str]| {
            BucketedSector::new(
                name,
                tickers
                    .iter()
                    .filter_map(|t| cusip_for_ticker(t))
                    .map(str::to_string)
                    .collect(),
            )
        };
        vec![
            sector("FrontEnd", &["US2Y", "US3Y"]),
            sector("Belly", &["US5Y", "US7Y", "US10Y"]),
            sector("LongEnd", &["US30Y"]),
        ]
    }
}

/// Computes PV01 on every position change.
#[derive(Debug)]
pub struct RiskService {
    store: KeyedStore<Pv01>,
}

impl RiskService {
    /// Empty service.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            store: KeyedStore::new("risk"),
        })
    }

    /// Listener to register on the position service.
    pub fn get_listener(self: &Rc<Self>) -> ListenerRef<Position> {
        self.clone()
    }

    /// Publishes the PV01 implied by `position`.
    pub fn add_position(&self, position: &Position) {
        let risk = Pv01 {
            product_id: position.product_id.clone(),
            pv01: get_pv01_value(&position.product_id),
            quantity: position.aggregate_position(),
        };
        debug!(cusip = %risk.product_id, total = risk.total(), "Risk");
        self.store.publish(risk);
    }

    /// Sum of `pv01 * quantity` over the sector's products.
    pub fn bucketed_risk(&self, sector: &BucketedSector) -> f64 {
        sector
            .products
            .iter()
            .filter_map(|id| self.store.get(id))
            .map(|risk| risk.total())
            .sum()
    }

    /// `(sector name, bucketed risk)` for the standard sectors.
    pub fn sector_report(&self) -> Vec<(String, f64)> {
        BucketedSector::standard()
            .into_iter()
            .map(|sector| {
                let risk = self.bucketed_risk(&sector);
                (sector.name, risk)
            })
            .collect()
    }
}

keyed_service!(RiskService, Pv01);

impl ServiceListener<Position> for RiskService {
    fn process_add(&self, data: &Position) {
        self.add_position(data);
    }
}
