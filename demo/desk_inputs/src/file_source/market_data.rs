//! Market data feed generator: `cusip,price,quantity,side`.
//!
//! Every book is `2 * depth` lines, alternating BID and OFFER from the top
//! level down.

use bond_core::price::{to_fractional, TICK};
use bond_core::reference::known_cusips;
use bond_core::PricingSide;

use super::{oscillating_mid, FeedGenerator};

/// Top-of-book spread in ticks: 1/128 widening to 4/128 and back.
const TOP_SPREAD_TICKS: [i64; 6] = [2, 4, 6, 8, 6, 4];

/// Size at the top level; each deeper level adds the same again.
const LEVEL_QUANTITY: i64 = 10_000_000;

/// Order books around an oscillating mid.
#[derive(Debug, Clone, Copy)]
pub struct MarketDataGenerator {
    books_per_product: usize,
    depth: usize,
}

impl MarketDataGenerator {
    /// Generator writing `books_per_product` books of `depth` levels per side.
    pub fn new(books_per_product: usize, depth: usize) -> Self {
        Self {
            books_per_product,
            depth: depth.max(1),
        }
    }
}

impl FeedGenerator for MarketDataGenerator {
    fn file_name(&self) -> &'static str {
        "marketdata.txt"
    }

    fn generate(&self) -> String {
        let mut feed = String::new();
        for cusip in known_cusips() {
            for step in 0..self.books_per_product {
                let mid = oscillating_mid(step);
                let half_spread = TOP_SPREAD_TICKS[step % TOP_SPREAD_TICKS.len()] / 2;
                for level in 0..self.depth {
                    let offset = (half_spread + level as i64) as f64 * TICK;
                    let quantity = (level as i64 + 1) * LEVEL_QUANTITY;
                    for (price, side) in [
                        (mid - offset, PricingSide::Bid),
                        (mid + offset, PricingSide::Offer),
                    ] {
                        feed.push_str(&format!(
                            "{},{},{},{}\n",
                            cusip,
                            to_fractional(price),
                            quantity,
                            side
                        ));
                    }
                }
            }
        }
        feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_layout() {
        let feed = MarketDataGenerator::new(2, 2).generate();
        let lines: Vec<&str> = feed.lines().collect();
        assert_eq!(lines.len(), 6 * 2 * 4);
        assert_eq!(
            &lines[..4],
            &[
                "9128283H1,98-317,10000000,BID",
                "9128283H1,99-001,10000000,OFFER",
                "9128283H1,98-316,20000000,BID",
                "9128283H1,99-002,20000000,OFFER",
            ]
        );
        // Second book: mid 99 + 1 tick, top spread 4 ticks
        assert_eq!(lines[4], "9128283H1,98-317,10000000,BID");
        assert_eq!(lines[5], "9128283H1,99-003,10000000,OFFER");
    }

    #[test]
    fn test_top_spreads_cycle() {
        let feed = MarketDataGenerator::new(7, 1).generate();
        let prices: Vec<f64> = feed
            .lines()
            .take(14)
            .map(|l| bond_core::price::from_fractional(l.split(',').nth(1).unwrap()).unwrap())
            .collect();
        let spreads: Vec<f64> = prices.chunks(2).map(|p| (p[1] - p[0]) * 256.0).collect();
        assert_eq!(spreads, vec![2.0, 4.0, 6.0, 8.0, 6.0, 4.0, 2.0]);
    }
}
