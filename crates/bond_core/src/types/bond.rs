//! US Treasury bond product type.
//!
//! A [`Bond`] is immutable reference data. Instances are normally obtained
//! from [`crate::reference::get_bond`]; an unrecognised CUSIP yields the
//! sentinel empty bond returned by [`Bond::default`].

use chrono::NaiveDate;
use std::fmt;

/// Identifier scheme used for a bond's product id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BondIdType {
    /// 9-character CUSIP (US securities)
    #[default]
    Cusip,
    /// 12-character ISIN
    Isin,
}

/// US Treasury bond reference data.
///
/// # Examples
///
/// ```
/// use bond_core::types::{Bond, BondIdType};
/// use chrono::NaiveDate;
///
/// let bond = Bond::new(
///     "9128283H1",
///     BondIdType::Cusip,
///     "US2Y",
///     0.01750,
///     NaiveDate::from_ymd_opt(2019, 11, 30),
/// );
/// assert_eq!(bond.product_id(), "9128283H1");
/// assert!(!bond.is_unknown());
/// assert!(Bond::default().is_unknown());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bond {
    product_id: String,
    id_type: BondIdType,
    ticker: String,
    coupon: f64,
    maturity: Option<NaiveDate>,
}

impl Bond {
    /// Creates a bond from its reference attributes.
    pub fn new(
        product_id: impl Into<String>,
        id_type: BondIdType,
        ticker: impl Into<String>,
        coupon: f64,
        maturity: Option<NaiveDate>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            id_type,
            ticker: ticker.into(),
            coupon,
            maturity,
        }
    }

    /// Product identifier (the CUSIP for Treasuries).
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Identifier scheme of [`Bond::product_id`].
    #[inline]
    pub fn id_type(&self) -> BondIdType {
        self.id_type
    }

    /// Display ticker, e.g. `US10Y`.
    #[inline]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Annual coupon rate as a decimal (0.0175 = 1.75%).
    #[inline]
    pub fn coupon(&self) -> f64 {
        self.coupon
    }

    /// Maturity date, `None` for the sentinel bond.
    #[inline]
    pub fn maturity(&self) -> Option<NaiveDate> {
        self.maturity
    }

    /// True for the sentinel returned on a reference-data miss.
    pub fn is_unknown(&self) -> bool {
        self.product_id.is_empty()
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return write!(f, "<unknown bond>");
        }
        match self.maturity {
            Some(maturity) => write!(
                f,
                "{} {} {:.3}% {}",
                self.ticker,
                self.product_id,
                self.coupon * 100.0,
                maturity
            ),
            None => write!(f, "{} {}", self.ticker, self.product_id),
        }
    }
}
