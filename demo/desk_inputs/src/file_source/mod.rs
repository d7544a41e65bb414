//! Feed file generators.
//!
//! Each generator renders one of the four desk input feeds in the line
//! grammar the desk's inbound connectors read: comma separated, no header.
//! Output depends only on the generator's settings.

mod inquiries;
mod market_data;
mod prices;
mod trades;

pub use inquiries::InquiryGenerator;
pub use market_data::MarketDataGenerator;
pub use prices::PriceGenerator;
pub use trades::TradeGenerator;

use std::path::{Path, PathBuf};

use bond_core::price::TICK;
use bond_core::rng::MODULUS;
use tracing::info;

/// Lowest generated mid price.
pub const PRICE_FLOOR: f64 = 99.0;

/// Ticks between [`PRICE_FLOOR`] and the highest generated mid (101).
pub const PRICE_RANGE_TICKS: i64 = 512;

/// Trait for feed file generators
pub trait FeedGenerator: Send + Sync {
    /// Standard file name of the feed
    fn file_name(&self) -> &'static str;

    /// Generate file content as string
    fn generate(&self) -> String;

    /// Write to file
    fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.generate())
    }
}

/// Sizes and seed for a full set of sample feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Seed for identifiers and sampled prices
    pub seed: u64,
    /// Price lines per product
    pub prices_per_product: usize,
    /// Trades per product
    pub trades_per_product: usize,
    /// Order books per product
    pub books_per_product: usize,
    /// Levels per side of each order book
    pub book_depth: usize,
    /// Inquiries per product
    pub inquiries_per_product: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: 1,
            prices_per_product: 1_000,
            trades_per_product: 10,
            books_per_product: 1_000,
            book_depth: 5,
            inquiries_per_product: 10,
        }
    }
}

/// Writes all four feeds into `dir`, creating it if needed. Returns the
/// written paths in processing order.
pub fn write_all(dir: &Path, settings: &GeneratorSettings) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let generators: [Box<dyn FeedGenerator>; 4] = [
        Box::new(PriceGenerator::new(settings.prices_per_product)),
        Box::new(TradeGenerator::new(settings.trades_per_product, settings.seed)),
        Box::new(MarketDataGenerator::new(
            settings.books_per_product,
            settings.book_depth,
        )),
        Box::new(InquiryGenerator::new(
            settings.inquiries_per_product,
            settings.seed,
        )),
    ];

    let mut written = Vec::with_capacity(generators.len());
    for generator in &generators {
        let path = dir.join(generator.file_name());
        generator.write_to_file(&path)?;
        info!(path = %path.display(), "Feed written");
        written.push(path);
    }
    Ok(written)
}

/// Mid price for step `step` of a triangle wave between 99 and 101 moving
/// one tick per step.
pub(crate) fn oscillating_mid(step: usize) -> f64 {
    let period = 2 * PRICE_RANGE_TICKS as usize;
    let phase = (step % period) as i64;
    let ticks = if phase <= PRICE_RANGE_TICKS {
        phase
    } else {
        2 * PRICE_RANGE_TICKS - phase
    };
    PRICE_FLOOR + ticks as f64 * TICK
}

/// Maps any seed onto the valid range of the uniform generator.
pub(crate) fn uniform_seed(seed: u64) -> i64 {
    (seed % (MODULUS as u64 - 1)) as i64 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oscillation_bounds() {
        assert_eq!(oscillating_mid(0), 99.0);
        assert_eq!(oscillating_mid(512), 101.0);
        assert_eq!(oscillating_mid(513), 101.0 - TICK);
        assert_eq!(oscillating_mid(1024), 99.0);
        assert!((0..3000).all(|i| (99.0..=101.0).contains(&oscillating_mid(i))));
    }

    #[test]
    fn test_uniform_seed_is_never_zero() {
        assert_eq!(uniform_seed(0), 1);
        assert!(uniform_seed(u64::MAX) > 0);
        assert!(uniform_seed(u64::MAX) < MODULUS);
    }

    #[test]
    fn test_write_all() {
        let dir = tempfile::tempdir().unwrap();
        let settings = GeneratorSettings {
            prices_per_product: 2,
            trades_per_product: 2,
            books_per_product: 2,
            inquiries_per_product: 2,
            ..GeneratorSettings::default()
        };
        let written = write_all(&dir.path().join("data"), &settings).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["prices.txt", "trades.txt", "marketdata.txt", "inquiries.txt"]
        );
        assert!(written.iter().all(|p| p.exists()));
    }
}
