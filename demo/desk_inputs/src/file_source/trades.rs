//! Trade feed generator: `cusip,trade_id,price,book,quantity,side`.

use bond_core::id::IdGenerator;
use bond_core::price::to_fractional;
use bond_core::reference::known_cusips;
use bond_core::Side;

use super::FeedGenerator;

/// Books trades are spread across.
pub const TRADE_BOOKS: [&str; 3] = ["TRSY1", "TRSY2", "TRSY3"];

/// Alternating BUY at 99 and SELL at 100, quantities cycling 1M to 5M.
#[derive(Debug, Clone, Copy)]
pub struct TradeGenerator {
    per_product: usize,
    seed: u64,
}

impl TradeGenerator {
    /// Generator writing `per_product` trades per known CUSIP with trade ids
    /// drawn from `seed`.
    pub fn new(per_product: usize, seed: u64) -> Self {
        Self { per_product, seed }
    }
}

impl FeedGenerator for TradeGenerator {
    fn file_name(&self) -> &'static str {
        "trades.txt"
    }

    fn generate(&self) -> String {
        let mut ids = IdGenerator::from_seed(self.seed);
        let mut feed = String::new();
        for cusip in known_cusips() {
            for n in 0..self.per_product {
                let (side, price) = if n % 2 == 0 {
                    (Side::Buy, 99.0)
                } else {
                    (Side::Sell, 100.0)
                };
                feed.push_str(&format!(
                    "{},{},{},{},{},{}\n",
                    cusip,
                    ids.next_id(),
                    to_fractional(price),
                    TRADE_BOOKS[n % TRADE_BOOKS.len()],
                    (n % 5 + 1) * 1_000_000,
                    side
                ));
            }
        }
        feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_lines() {
        let feed = TradeGenerator::new(6, 3).generate();
        let rows: Vec<Vec<&str>> = feed.lines().map(|l| l.split(',').collect()).collect();
        assert_eq!(rows.len(), 36);

        assert_eq!(rows[0][2], "99-000");
        assert_eq!(rows[0][3], "TRSY1");
        assert_eq!(rows[0][4], "1000000");
        assert_eq!(rows[0][5], "BUY");
        assert_eq!(rows[1][2], "100-000");
        assert_eq!(rows[1][5], "SELL");
        assert_eq!(rows[3][3], "TRSY1");
        assert_eq!(rows[5][4], "1000000");
        assert!(rows.iter().all(|r| r[1].len() == 12));
    }

    #[test]
    fn test_same_seed_same_feed() {
        assert_eq!(
            TradeGenerator::new(4, 11).generate(),
            TradeGenerator::new(4, 11).generate()
        );
        assert_ne!(
            TradeGenerator::new(4, 11).generate(),
            TradeGenerator::new(4, 12).generate()
        );
    }
}
