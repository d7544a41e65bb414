//! Inquiry feed generator: `inquiry_id,cusip,side,quantity,price,state`.

use bond_core::id::IdGenerator;
use bond_core::price::{to_fractional, TICK};
use bond_core::reference::known_cusips;
use bond_core::rng::UniformGenerator;
use bond_core::Side;

use super::{uniform_seed, FeedGenerator, PRICE_FLOOR, PRICE_RANGE_TICKS};

/// RECEIVED inquiries with alternating sides and prices sampled between
/// 99 and 101.
#[derive(Debug, Clone, Copy)]
pub struct InquiryGenerator {
    per_product: usize,
    seed: u64,
}

impl InquiryGenerator {
    /// Generator writing `per_product` inquiries per known CUSIP.
    pub fn new(per_product: usize, seed: u64) -> Self {
        Self { per_product, seed }
    }
}

impl FeedGenerator for InquiryGenerator {
    fn file_name(&self) -> &'static str {
        "inquiries.txt"
    }

    fn generate(&self) -> String {
        let mut ids = IdGenerator::from_seed(self.seed.wrapping_add(1));
        let mut uniform = UniformGenerator::new(uniform_seed(self.seed));
        let mut feed = String::new();
        for cusip in known_cusips() {
            for n in 0..self.per_product {
                let side = if n % 2 == 0 { Side::Buy } else { Side::Sell };
                let ticks = uniform.next_index(PRICE_RANGE_TICKS as usize + 1);
                let price = PRICE_FLOOR + ticks as f64 * TICK;
                feed.push_str(&format!(
                    "{},{},{},{},{},RECEIVED\n",
                    ids.next_id(),
                    cusip,
                    side,
                    (n % 5 + 1) * 1_000_000,
                    to_fractional(price)
                ));
            }
        }
        feed
    }
}
