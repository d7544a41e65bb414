//! Price feed generator: `cusip,bid,offer`.

use bond_core::price::to_fractional;
use bond_core::reference::known_cusips;

use super::{oscillating_mid, FeedGenerator};

/// Two-way prices oscillating between 99 and 101, spread alternating
/// 1/128 and 1/64.
#[derive(Debug, Clone, Copy)]
pub struct PriceGenerator {
    per_product: usize,
}

impl PriceGenerator {
    /// Generator writing `per_product` lines per known CUSIP.
    pub fn new(per_product: usize) -> Self {
        Self { per_product }
    }
}

impl FeedGenerator for PriceGenerator {
    fn file_name(&self) -> &'static str {
        "prices.txt"
    }

    fn generate(&self) -> String {
        let mut feed = String::new();
        for cusip in known_cusips() {
            for step in 0..self.per_product {
                let mid = oscillating_mid(step);
                let spread = if step % 2 == 0 { 1.0 / 128.0 } else { 1.0 / 64.0 };
                feed.push_str(&format!(
                    "{},{},{}\n",
                    cusip,
                    to_fractional(mid - spread / 2.0),
                    to_fractional(mid + spread / 2.0)
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
    fn test_first_lines() {
        let feed = PriceGenerator::new(3).generate();
        let lines: Vec<&str> = feed.lines().collect();
        assert_eq!(lines.len(), 18);
        assert_eq!(lines[0], "9128283H1,98-317,99-001");
        assert_eq!(lines[1], "9128283H1,98-317,99-003");
        assert_eq!(lines[3], "9128283L2,98-317,99-001");
    }
}
