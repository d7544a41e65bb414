//! Order-book sides and trade directions.

use std::fmt;
use std::str::FromStr;

use super::error::SideParseError;

/// Side of a quote or order-book level.
///
/// # Examples
///
/// ```
/// use bond_core::types::PricingSide;
///
/// let side: PricingSide = "OFFER".parse().unwrap();
/// assert_eq!(side, PricingSide::Offer);
/// assert_eq!(side.opposite(), PricingSide::Bid);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PricingSide {
    /// Bid (buy interest)
    Bid,
    /// Offer (sell interest)
    Offer,
}

impl PricingSide {
    /// Feed/persistence code: `BID` or `OFFER`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingSide::Bid => "BID",
            PricingSide::Offer => "OFFER",
        }
    }

    /// The other side of the book.
    pub fn opposite(&self) -> Self {
        match self {
            PricingSide::Bid => PricingSide::Offer,
            PricingSide::Offer => PricingSide::Bid,
        }
    }
}

impl fmt::Display for PricingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingSide {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BID" => Ok(PricingSide::Bid),
            "OFFER" => Ok(PricingSide::Offer),
            other => Err(SideParseError(other.to_string())),
        }
    }
}

/// Direction of a trade or client inquiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// We buy
    Buy,
    /// We sell
    Sell,
}

impl Side {
    /// Feed/persistence code: `BUY` or `SELL`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// +1 for buys, -1 for sells.
    pub fn sign(&self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(SideParseError(other.to_string())),
        }
    }
}
