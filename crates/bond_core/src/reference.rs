//! Static US Treasury reference data.
//!
//! Two immutable CUSIP-keyed tables: bond attributes and PV01 sensitivities.
//! Both lookups are pure functions of the CUSIP. A miss is not an error:
//! [`get_bond`] returns the sentinel [`Bond::default`] and
//! [`get_pv01_value`] returns `0.0`.

use chrono::NaiveDate;

use crate::types::{Bond, BondIdType};

struct BondReference {
    cusip: &'static str,
    ticker: &'static str,
    coupon: f64,
    maturity: (i32, u32, u32),
    pv01: f64,
}

const TREASURIES: [BondReference; 6] = [
    BondReference {
        cusip: "9128283H1",
        ticker: "US2Y",
        coupon: 0.01750,
        maturity: (2019, 11, 30),
        pv01: 0.01948992,
    },
    BondReference {
        cusip: "9128283L2",
        ticker: "US3Y",
        coupon: 0.01875,
        maturity: (2020, 12, 15),
        pv01: 0.02865304,
    },
    BondReference {
        cusip: "912828M80",
        ticker: "US5Y",
        coupon: 0.02000,
        maturity: (2022, 11, 30),
        pv01: 0.04581119,
    },
    BondReference {
        cusip: "9128283J7",
        ticker: "US7Y",
        coupon: 0.02125,
        maturity: (2024, 11, 30),
        pv01: 0.06127718,
    },
    BondReference {
        cusip: "9128283F5",
        ticker: "US10Y",
        coupon: 0.02250,
        maturity: (2027, 12, 15),
        pv01: 0.08161449,
    },
    BondReference {
        cusip: "912810RZ3",
        ticker: "US30Y",
        coupon: 0.02750,
        maturity: (2047, 12, 15),
        pv01: 0.15013155,
    },
];

fn find(cusip: &str) -> Option<&'static BondReference> {
    TREASURIES.iter().find(|r| r.cusip == cusip)
}

/// Looks up Treasury reference data by CUSIP.
///
/// # Examples
///
/// ```
/// use bond_core::reference::get_bond;
/// use chrono::NaiveDate;
///
/// let bond = get_bond("9128283H1");
/// assert_eq!(bond.coupon(), 0.01750);
/// assert_eq!(bond.maturity(), NaiveDate::from_ymd_opt(2019, 11, 30));
///
/// assert!(get_bond("UNKNOWN").is_unknown());
/// ```
pub fn get_bond(cusip: &str) -> Bond {
    match find(cusip) {
        Some(r) => {
            let (y, m, d) = r.maturity;
            Bond::new(
                r.cusip,
                BondIdType::Cusip,
                r.ticker,
                r.coupon,
                NaiveDate::from_ymd_opt(y, m, d),
            )
        }
        None => Bond::default(),
    }
}

/// PV01 (price value of one basis point) per unit of face for a CUSIP.
///
/// ```
/// use bond_core::reference::get_pv01_value;
///
/// assert_eq!(get_pv01_value("912810RZ3"), 0.15013155);
/// assert_eq!(get_pv01_value("UNKNOWN"), 0.0);
/// ```
pub fn get_pv01_value(cusip: &str) -> f64 {
    find(cusip).map(|r| r.pv01).unwrap_or(0.0)
}

/// CUSIPs covered by the reference tables, shortest maturity first.
pub fn known_cusips() -> impl Iterator<Item = &'static str> {
    TREASURIES.iter().map(|r| r.cusip)
}

/// Finds the CUSIP for a display ticker such as `US5Y`.
pub fn cusip_for_ticker(ticker: &str) -> Option<&'static str> {
    TREASURIES.iter().find(|r| r.ticker == ticker).map(|r| r.cusip)
}
